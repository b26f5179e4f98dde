//! tweetmunger - extract, filter and flatten tweets from tar archives.
//!
//! The crate is a thin streaming pipeline: [`archive`] walks a tar file and
//! incrementally decompresses its `.json.bz2` members, [`record`] decodes
//! one NDJSON line into a [`Tweet`], [`filter`] applies the three-stage
//! accept/reject rule, [`project`] flattens an accepted tweet into the fixed
//! 7-column [`Row`], and [`pipeline`] ties it all to a CSV sink.

pub mod archive;
pub mod cli;
pub mod filter;
pub mod pipeline;
pub mod project;
pub mod record;

pub use filter::{FilterConfig, Rejection};
pub use pipeline::Pipeline;
pub use project::{project, Row};
pub use record::Tweet;
