use std::{fmt, str::FromStr};

use serde::Deserialize;

/// A user rating, always within `Rating::MIN..=Rating::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Rating(f64);

impl Rating {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;

    pub fn new(value: f64) -> Result<Self, RatingError> {
        if !value.is_finite() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(RatingError::OutOfRange);
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl FromStr for Rating {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RatingError::Missing);
        }
        let value: f64 = s.parse().map_err(|_| RatingError::NotANumber)?;
        Self::new(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("Rating is required.")]
    Missing,
    #[error("Rating must be a number, e.g. 7.5.")]
    NotANumber,
    #[error("Rating must be between 0 and 10.")]
    OutOfRange,
}

/// A TMDB search result offered to the user before anything is stored.
#[derive(Clone, Debug, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl Candidate {
    pub fn year(&self) -> Option<i32> {
        self.release_date.as_deref().and_then(release_year)
    }
}

/// Everything needed to insert a movie into the collection.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieDetails {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub img_url: String,
}

/// Year of a TMDB `YYYY-MM-DD` release date.
pub fn release_year(date: &str) -> Option<i32> {
    let date: jiff::civil::Date = date.trim().parse().ok()?;
    Some(i32::from(date.year()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_accepts_bounds_and_fractions() {
        assert_eq!("0".parse::<Rating>().unwrap().value(), 0.0);
        assert_eq!("10".parse::<Rating>().unwrap().value(), 10.0);
        assert_eq!(" 7.5 ".parse::<Rating>().unwrap().value(), 7.5);
    }

    #[test]
    fn rating_rejects_bad_input() {
        assert_eq!("".parse::<Rating>(), Err(RatingError::Missing));
        assert_eq!("great".parse::<Rating>(), Err(RatingError::NotANumber));
        assert_eq!("10.5".parse::<Rating>(), Err(RatingError::OutOfRange));
        assert_eq!("-1".parse::<Rating>(), Err(RatingError::OutOfRange));
        assert_eq!("NaN".parse::<Rating>(), Err(RatingError::OutOfRange));
        assert_eq!("inf".parse::<Rating>(), Err(RatingError::OutOfRange));
    }

    #[test]
    fn release_year_takes_the_year_of_the_date() {
        assert_eq!(release_year("2010-07-16"), Some(2010));
        assert_eq!(release_year(""), None);
        assert_eq!(release_year("soon"), None);
    }

    #[test]
    fn candidate_tolerates_missing_optional_fields() {
        let candidate: Candidate =
            serde_json::from_str(r#"{"id": 27205, "title": "Inception"}"#).unwrap();
        assert_eq!(candidate.year(), None);
        assert!(candidate.poster_path.is_none());
    }
}
