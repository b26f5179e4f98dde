//! Wire format of one tweet record.
//!
//! Each line of a decompressed archive member is a JSON object in the shape
//! the streaming API emitted it. Only the fields the pipeline needs are
//! modeled; everything else is ignored on decode. Optional sub-objects
//! (`geo`, `place`, `extended_tweet`) are `Option` so that absence keeps its
//! meaning instead of collapsing into empty defaults.

use serde::Deserialize;

/// The tweet author.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub screen_name: String,
    pub location: String,
}

/// Geographic point attached to a tweet, when the client reported one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Geo {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

/// Structured geographic annotation (city, POI, ...).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Place {
    pub id: String,
    pub place_type: String,
    pub name: String,
    pub full_name: String,
    pub country_code: String,
    pub country: String,
}

/// Carrier for text longer than the classic 140-character field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtendedTweet {
    pub full_text: String,
}

/// One decoded tweet with its nested author/geo/place/extended-text data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Tweet {
    pub id: i64,
    pub created_at: String,
    pub text: String,
    pub user: User,
    pub geo: Option<Geo>,
    pub place: Option<Place>,
    pub extended_tweet: Option<ExtendedTweet>,
}

impl Tweet {
    /// Decodes a single NDJSON line.
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    /// An id of zero marks a record the source never filled in; it must
    /// never reach the output.
    pub fn is_valid(&self) -> bool {
        self.id != 0
    }
}
