//! Streaming access to tar archives of bzip2-compressed NDJSON members.
//!
//! An archive is an ordered sequence of named entries; only entries whose
//! name ends in [`MEMBER_SUFFIX`] are decompressed, everything else is
//! skipped without being read. Decompression is incremental: a member is
//! exposed as a [`std::io::Read`] chained through [`BzDecoder`], so the first
//! line of a member is available before the rest of it has been inflated.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use bzip2::read::BzDecoder;
use tar::{Archive, Entry};

/// Only members with this suffix carry tweet payloads.
pub const MEMBER_SUFFIX: &str = ".json.bz2";

/// A tar archive opened for a single sequential pass.
pub struct ArchiveReader {
    inner: Archive<File>,
}

impl ArchiveReader {
    /// Opens the archive at `path`. Failure here is fatal to the run.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open archive {}", path.display()))?;
        Ok(Self {
            inner: Archive::new(file),
        })
    }

    /// Iterates the compressed payload members in archive order.
    pub fn members(&mut self) -> Result<Members<'_>> {
        let entries = self
            .inner
            .entries()
            .context("failed to read archive entries")?;
        Ok(Members { entries })
    }
}

/// Iterator over the members selected by [`MEMBER_SUFFIX`].
pub struct Members<'a> {
    entries: tar::Entries<'a, File>,
}

impl<'a> Iterator for Members<'a> {
    type Item = Result<Member<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    return Some(
                        Err(err).context("failed to advance to the next archive entry"),
                    )
                }
            };

            let name = match entry.path() {
                Ok(path) => path.to_string_lossy().into_owned(),
                Err(err) => return Some(Err(err).context("archive entry has an unreadable name")),
            };

            if !name.ends_with(MEMBER_SUFFIX) {
                continue;
            }

            return Some(Ok(Member {
                name,
                reader: BzDecoder::new(entry),
            }));
        }
    }
}

/// One selected archive member, readable exactly once.
pub struct Member<'a> {
    name: String,
    reader: BzDecoder<Entry<'a, File>>,
}

impl<'a> Member<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Consumes the member into its stream of non-empty text lines.
    pub fn lines(self) -> Lines<BufReader<BzDecoder<Entry<'a, File>>>> {
        Lines::new(BufReader::new(self.reader))
    }
}

/// Lazy, non-restartable sequence of newline-delimited text lines.
/// Zero-length lines are silently dropped.
pub struct Lines<B> {
    inner: io::Lines<B>,
}

impl<B: BufRead> Lines<B> {
    pub fn new(reader: B) -> Self {
        Self {
            inner: reader.lines(),
        }
    }
}

impl<B: BufRead> Iterator for Lines<B> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next() {
                Some(Ok(line)) if line.is_empty() => continue,
                other => return other,
            }
        }
    }
}
