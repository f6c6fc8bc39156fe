//! Display helpers shared by every front end: ratings, dates, runtimes and
//! poster URLs.

use super::error::RatingError;
use chrono::NaiveDate;

pub const MIN_RATING: f32 = 0.0;
pub const MAX_RATING: f32 = 10.0;

/// Longest accepted rating input ("10.0").
const MAX_RATING_INPUT_LEN: usize = 4;

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Parse a rating typed by the user.
///
/// The length limit applies to the raw text, surrounding whitespace
/// included; the number itself may be padded.
pub fn parse_rating_input(input: &str) -> Result<f32, RatingError> {
    if input.chars().count() > MAX_RATING_INPUT_LEN {
        return Err(RatingError::TooLong);
    }
    let value: f32 = input.trim().parse().map_err(|_| RatingError::NotANumber)?;
    validate_rating(value)
}

/// Check the range and round to one decimal place.
pub fn validate_rating(value: f32) -> Result<f32, RatingError> {
    if !value.is_finite() {
        return Err(RatingError::NotANumber);
    }
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(RatingError::OutOfRange(value));
    }
    Ok((value * 10.0).round() / 10.0)
}

pub fn format_rating(rating: f32) -> String {
    format!("{rating:.1}")
}

/// Colour band used for the rating ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingBand {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
}

impl RatingBand {
    pub fn for_rating(rating: f32) -> Self {
        match rating {
            r if r < 3.0 => Self::Red,
            r if r < 5.0 => Self::Orange,
            r if r < 7.0 => Self::Yellow,
            r if r < 9.0 => Self::Green,
            _ => Self::Blue,
        }
    }
}

/// `2023-07-04` becomes `Jul 4, 2023`. Missing or malformed dates read
/// `Unknown`.
pub fn format_release_date(date: Option<&str>) -> String {
    date.filter(|d| !d.trim().is_empty())
        .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

pub fn format_runtime(minutes: Option<u32>) -> String {
    match minutes {
        None | Some(0) => "Unknown".to_string(),
        Some(m) if m < 60 => format!("{m}m"),
        Some(m) if m % 60 == 0 => format!("{}h", m / 60),
        Some(m) => format!("{}h {}m", m / 60, m % 60),
    }
}

pub fn poster_url(poster_path: &str) -> String {
    format!("{POSTER_BASE_URL}{poster_path}")
}
