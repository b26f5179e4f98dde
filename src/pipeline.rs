//! The decode-filter-emit pass over one or more archives.
//!
//! The driver owns the CSV sink. Per archive it walks the compressed
//! members, decodes their lines, and for every line: parse, filter, project,
//! emit. Each emitted row is flushed immediately so output is visible while
//! large archives are still being read. Processing is fully sequential, so
//! rows appear in archive-then-member-then-line order and repeated runs over
//! the same input produce byte-identical output.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::archive::ArchiveReader;
use crate::filter::FilterConfig;
use crate::project::{project, Row};
use crate::record::Tweet;

/// Column names, written once before any archive is processed.
pub const HEADER: [&str; 7] = [
    "tweet_id",
    "tweet_created_at_ts",
    "user_screen_name",
    "user_location",
    "tweet_place_name",
    "tweet_place_country_code",
    "tweet_text",
];

/// Wires the archive reader, filter and projector into one pass per archive.
pub struct Pipeline<W: Write> {
    writer: csv::Writer<W>,
    config: FilterConfig,
}

impl<W: Write> Pipeline<W> {
    pub fn new(config: FilterConfig, sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
            config,
        }
    }

    /// Processes the given archives in order. The header row is written
    /// once, before the first archive is opened.
    pub fn run<P: AsRef<Path>>(&mut self, archives: &[P]) -> Result<()> {
        self.write_header()?;
        for path in archives {
            self.process_archive(path.as_ref())?;
        }
        Ok(())
    }

    fn write_header(&mut self) -> Result<()> {
        self.writer
            .write_record(HEADER)
            .context("failed to write CSV header")?;
        self.writer.flush().context("failed to flush CSV header")?;
        Ok(())
    }

    /// One pass over a single archive. Failure to open the archive or to
    /// read a member is fatal; rows already written stay written.
    pub fn process_archive(&mut self, path: &Path) -> Result<()> {
        let mut reader = ArchiveReader::open(path)?;
        for member in reader.members()? {
            let member = member.with_context(|| format!("in archive {}", path.display()))?;
            let name = member.name().to_string();
            debug!(member = %name, "processing member");
            for line in member.lines() {
                let line = line.with_context(|| {
                    format!("failed to read member {} of {}", name, path.display())
                })?;
                self.process_line(&line)?;
            }
        }
        Ok(())
    }

    fn process_line(&mut self, line: &str) -> Result<()> {
        let tweet = match Tweet::parse(line) {
            Ok(tweet) => tweet,
            Err(err) => {
                debug!(%err, "skipping malformed line");
                return Ok(());
            }
        };

        if let Err(reason) = self.config.accept(&tweet) {
            debug!(id = tweet.id, %reason, "rejected");
            return Ok(());
        }

        if !tweet.is_valid() {
            debug!("skipping record with zero id");
            return Ok(());
        }

        match project(&tweet) {
            Ok(row) => self.emit(&row),
            Err(err) => {
                warn!(id = tweet.id, %err, "skipping record");
                Ok(())
            }
        }
    }

    fn emit(&mut self, row: &Row) -> Result<()> {
        self.writer
            .write_record(row.fields())
            .context("failed to write output row")?;
        // flush per row, output must be visible incrementally
        self.writer.flush().context("failed to flush output row")?;
        Ok(())
    }

    /// Finishes the pipeline and hands back the underlying sink.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| anyhow::anyhow!("failed to finish CSV output: {}", err.error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write as _;
    use std::path::PathBuf;

    use bzip2::write::BzEncoder;
    use bzip2::Compression;
    use tempfile::NamedTempFile;

    const HEADER_LINE: &str = "tweet_id,tweet_created_at_ts,user_screen_name,user_location,tweet_place_name,tweet_place_country_code,tweet_text\n";

    fn bz2(content: &str) -> Vec<u8> {
        let mut encoder = BzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    fn write_archive(members: &[(&str, &str)]) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        let mut builder = tar::Builder::new(file.reopen().unwrap());
        for (name, content) in members {
            let data = bz2(content);
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, data.as_slice())
                .unwrap();
        }
        builder.finish().unwrap();
        file
    }

    fn run(config: FilterConfig, members: &[(&str, &str)]) -> String {
        let archive = write_archive(members);
        let mut pipeline = Pipeline::new(config, Vec::new());
        pipeline.run(&[archive.path()]).unwrap();
        String::from_utf8(pipeline.into_inner().unwrap()).unwrap()
    }

    fn match_all() -> FilterConfig {
        FilterConfig::new("", ".*", ".*").unwrap()
    }

    const SAMPLE: &str = r#"{"id":42,"created_at":"Mon Jan 02 15:04:05 +0000 2021","text":"hello world","user":{"id":1,"screen_name":"bob","location":"NY"}}"#;

    #[test]
    fn single_record_end_to_end() {
        let output = run(match_all(), &[("data.json.bz2", &format!("{SAMPLE}\n"))]);
        assert_eq!(
            output,
            format!("{HEADER_LINE}42,1609599845,bob,NY,,,hello world\n")
        );
    }

    #[test]
    fn header_is_written_even_without_archives() {
        let mut pipeline = Pipeline::new(match_all(), Vec::new());
        pipeline.run::<PathBuf>(&[]).unwrap();
        let output = String::from_utf8(pipeline.into_inner().unwrap()).unwrap();
        assert_eq!(output, HEADER_LINE);
    }

    #[test]
    fn blank_and_malformed_lines_are_skipped() {
        let content = format!("\n{SAMPLE}\n\n{{not json\n");
        let output = run(match_all(), &[("data.json.bz2", &content)]);
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn zero_id_emits_no_row() {
        let content = r#"{"id":0,"created_at":"Mon Jan 02 15:04:05 +0000 2021","text":"hi","user":{"screen_name":"x"}}"#;
        let output = run(match_all(), &[("data.json.bz2", &format!("{content}\n"))]);
        assert_eq!(output, HEADER_LINE);
    }

    #[test]
    fn rejected_record_emits_no_row() {
        let config = FilterConfig::new("", "snow", ".*").unwrap();
        let output = run(config, &[("data.json.bz2", &format!("{SAMPLE}\n"))]);
        assert_eq!(output, HEADER_LINE);
    }

    #[test]
    fn unparseable_timestamp_is_skipped_not_fatal() {
        let bad = r#"{"id":7,"created_at":"not a date","text":"hi","user":{"screen_name":"x"}}"#;
        let content = format!("{bad}\n{SAMPLE}\n");
        let output = run(match_all(), &[("data.json.bz2", &content)]);
        assert_eq!(
            output,
            format!("{HEADER_LINE}42,1609599845,bob,NY,,,hello world\n")
        );
    }

    #[test]
    fn rows_follow_member_order() {
        let first = r#"{"id":1,"created_at":"Mon Jan 02 15:04:05 +0000 2021","text":"a","user":{"screen_name":"u"}}"#;
        let second = r#"{"id":2,"created_at":"Mon Jan 02 15:04:05 +0000 2021","text":"b","user":{"screen_name":"u"}}"#;
        let output = run(
            match_all(),
            &[
                ("day1.json.bz2", &format!("{first}\n")),
                ("day2.json.bz2", &format!("{second}\n")),
            ],
        );
        let rows: Vec<&str> = output.lines().skip(1).collect();
        assert!(rows[0].starts_with("1,"));
        assert!(rows[1].starts_with("2,"));
    }

    #[test]
    fn fields_with_delimiters_are_quoted() {
        let record = r#"{"id":9,"created_at":"Mon Jan 02 15:04:05 +0000 2021","text":"hello, comma","user":{"screen_name":"u","location":"NY"}}"#;
        let output = run(match_all(), &[("data.json.bz2", &format!("{record}\n"))]);
        assert!(output.contains("\"hello, comma\""));
    }

    #[test]
    fn missing_archive_is_fatal() {
        let mut pipeline = Pipeline::new(match_all(), Vec::new());
        assert!(pipeline.run(&[Path::new("/no/such/archive.tar")]).is_err());
    }
}
