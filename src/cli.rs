//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;

/// Extract, filter and flatten tweets from tar archives of
/// bzip2-compressed JSON, writing CSV to stdout.
#[derive(Debug, Parser)]
#[command(name = "tweetmunger", version, about)]
pub struct Cli {
    /// Two-letter country code; only tweets whose place carries this code
    /// are kept. Empty disables the geographic check.
    #[arg(long, default_value = "")]
    pub country: String,

    /// Regex the tweet text must match.
    #[arg(long = "search-expr", value_name = "REGEX", default_value = ".*")]
    pub search_expr: String,

    /// Regex the author's location must match.
    #[arg(long = "location-expr", value_name = "REGEX", default_value = ".*")]
    pub location_expr: String,

    /// Tar archives to process, in order.
    #[arg(value_name = "ARCHIVE")]
    pub archives: Vec<PathBuf>,
}
