//! Projection of an accepted tweet onto the fixed 7-field output row.

use chrono::DateTime;

use crate::record::Tweet;

/// `created_at` layout after the leading weekday token, chrono-style.
const CREATED_AT_FORMAT: &str = "%b %d %H:%M:%S %z %Y";

/// A `created_at` value that did not parse. The pipeline logs and skips the
/// record instead of aborting the run.
#[derive(Debug, thiserror::Error)]
#[error("unparseable created_at {value:?}: {source}")]
pub struct TimestampError {
    value: String,
    #[source]
    source: chrono::ParseError,
}

/// The flat output row, one per accepted tweet. Field order is the column
/// order of the CSV output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub tweet_id: i64,
    pub created_at_ts: i64,
    pub screen_name: String,
    pub user_location: String,
    pub place_name: String,
    pub place_country_code: String,
    pub text: String,
}

impl Row {
    /// The seven fields in output order, ready for the CSV writer.
    pub fn fields(&self) -> [String; 7] {
        [
            self.tweet_id.to_string(),
            self.created_at_ts.to_string(),
            self.screen_name.clone(),
            self.user_location.clone(),
            self.place_name.clone(),
            self.place_country_code.clone(),
            self.text.clone(),
        ]
    }
}

/// Maps a tweet to its output row.
///
/// Fallback rules: place fields are empty strings when no place is attached;
/// the text column carries the extended text when an `extended_tweet` is
/// present, the primary text otherwise.
pub fn project(tweet: &Tweet) -> Result<Row, TimestampError> {
    let (place_name, place_country_code) = match &tweet.place {
        Some(place) => (place.name.clone(), place.country_code.clone()),
        None => (String::new(), String::new()),
    };

    let text = match &tweet.extended_tweet {
        Some(extended) => extended.full_text.clone(),
        None => tweet.text.clone(),
    };

    Ok(Row {
        tweet_id: tweet.id,
        created_at_ts: parse_created_at(&tweet.created_at)?,
        screen_name: tweet.user.screen_name.clone(),
        user_location: tweet.user.location.clone(),
        place_name,
        place_country_code,
        text,
    })
}

/// Converts a `created_at` value like `Sat Jan 02 15:04:05 +0000 2021` to
/// Unix epoch seconds.
///
/// The weekday token is dropped before parsing: source data occasionally
/// carries a weekday inconsistent with the date, and chrono rejects that
/// combination while the rest of the value is perfectly usable.
pub fn parse_created_at(value: &str) -> Result<i64, TimestampError> {
    let without_weekday = match value.split_once(' ') {
        Some((_, rest)) => rest,
        None => value,
    };

    DateTime::parse_from_str(without_weekday, CREATED_AT_FORMAT)
        .map(|dt| dt.timestamp())
        .map_err(|source| TimestampError {
            value: value.to_string(),
            source,
        })
}
