//! The three-stage accept/reject rule applied to every decoded tweet.

use regex::Regex;

use crate::record::Tweet;

/// Why a tweet was rejected. The pipeline only needs the boolean outcome;
/// the reason is kept for diagnostic logging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("no text match")]
    NoTextMatch,

    #[error("no user location match")]
    NoLocationMatch,

    #[error("no place")]
    NoPlace,

    #[error("no country code match")]
    NoCountryMatch,
}

/// Immutable filter configuration, built once from the CLI flags.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    country_code: String,
    search_expr: Regex,
    location_expr: Regex,
}

impl FilterConfig {
    /// Compiles the two patterns and normalizes the country code to
    /// uppercase. An empty country code disables the geographic check.
    pub fn new(country_code: &str, search_expr: &str, location_expr: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            country_code: country_code.to_uppercase(),
            search_expr: Regex::new(search_expr)?,
            location_expr: Regex::new(location_expr)?,
        })
    }

    /// Evaluates the filter stages in order, short-circuiting on the first
    /// failure:
    ///
    /// 1. tweet text must match the search pattern
    /// 2. author location must match the location pattern
    /// 3. with a country code configured, the tweet must carry a place whose
    ///    country code equals it exactly (case-sensitive)
    ///
    /// A tweet without a place is rejected when country filtering is active,
    /// not treated as a wildcard.
    pub fn accept(&self, tweet: &Tweet) -> Result<(), Rejection> {
        if !self.search_expr.is_match(&tweet.text) {
            return Err(Rejection::NoTextMatch);
        }

        if !self.location_expr.is_match(&tweet.user.location) {
            return Err(Rejection::NoLocationMatch);
        }

        if self.country_code.is_empty() {
            return Ok(());
        }

        let place = tweet.place.as_ref().ok_or(Rejection::NoPlace)?;
        if place.country_code != self.country_code {
            return Err(Rejection::NoCountryMatch);
        }

        Ok(())
    }
}
