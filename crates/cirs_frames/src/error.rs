//! Error type for the precession-nutation model.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FrameError {
    /// One of the epoch parts is NaN or infinite.
    NonFiniteEpoch,
    /// Epoch is too far from J2000.0 for the series to be meaningful.
    OutsideValidity { centuries: f64 },
    /// The model produced a non-finite quantity.
    NonFiniteResult(&'static str),
    /// A nutation coefficient file could not be read.
    Io(String),
    /// A nutation coefficient file is malformed.
    SeriesParse { line: usize, reason: String },
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteEpoch => write!(f, "epoch is not finite"),
            Self::OutsideValidity { centuries } => write!(
                f,
                "epoch is {centuries:.2} Julian centuries from J2000.0, outside the model range"
            ),
            Self::NonFiniteResult(what) => write!(f, "model produced non-finite {what}"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::SeriesParse { line, reason } => {
                write!(f, "nutation table line {line}: {reason}")
            }
        }
    }
}

impl Error for FrameError {}

impl From<std::io::Error> for FrameError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
