//! Error types for time-scale conversions.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from time conversion, leap-second tables, or EOP lookup.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TimeError {
    /// LSK file parsing failed.
    LskParse(String),
    /// IERS EOP file parsing failed.
    EopParse(String),
    /// Requested epoch is outside the EOP table range.
    EopOutOfRange { mjd: f64 },
    /// I/O error.
    Io(String),
    /// One of the two Julian date parts is NaN or infinite.
    NonFiniteDate,
    /// Julian date cannot be expressed as a Gregorian calendar date.
    DateOutOfRange { jd: f64 },
    /// Calendar fields are invalid (month 13, day 0, ...).
    InvalidCalendar { year: i32, month: u32, day: u32 },
    /// Text is not an ISO-8601 UTC timestamp.
    InvalidTimestamp(String),
    /// Day fraction outside `0..=1`.
    InvalidDayFraction { fraction: f64 },
    /// UTC date precedes the first entry of the leap-second table.
    PreUtcDate { year: i32 },
}

impl Display for TimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LskParse(msg) => write!(f, "LSK parse error: {msg}"),
            Self::EopParse(msg) => write!(f, "EOP parse error: {msg}"),
            Self::EopOutOfRange { mjd } => write!(f, "MJD {mjd} outside EOP table range"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::NonFiniteDate => write!(f, "Julian date is not finite"),
            Self::DateOutOfRange { jd } => {
                write!(f, "JD {jd} is outside the supported calendar range")
            }
            Self::InvalidCalendar { year, month, day } => {
                write!(f, "invalid calendar date {year:04}-{month:02}-{day:02}")
            }
            Self::InvalidTimestamp(text) => write!(f, "invalid UTC timestamp '{text}'"),
            Self::InvalidDayFraction { fraction } => {
                write!(f, "day fraction {fraction} outside [0, 1]")
            }
            Self::PreUtcDate { year } => {
                write!(f, "UTC is not defined for year {year} (tables start in 1960)")
            }
        }
    }
}

impl Error for TimeError {}

impl From<std::io::Error> for TimeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
