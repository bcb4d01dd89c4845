//! Error types for the CIRS → GCRS transform.

use std::error::Error;
use std::fmt::{Display, Formatter};

use cirs_frames::FrameError;
use cirs_time::{JulianDate, TimeError};

/// Problems with the shape or content of caller-supplied data.
///
/// All of these are detected before any astronomical computation runs.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum InputError {
    /// Vector dimension other than 3 or 6.
    BadDimension(usize),
    /// Flat data length is not a multiple of the vector dimension.
    RaggedBatch { len: usize, dim: usize },
    /// Explicit pole offsets must be exactly two values.
    BadPoleOffsetShape(usize),
    /// The EOP source answered without usable dX/dY.
    MalformedEopResponse(&'static str),
    /// Output buffer length differs from the input batch.
    OutputLength { expected: usize, actual: usize },
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadDimension(dim) => {
                write!(f, "vector dimension must be 3 or 6, got {dim}")
            }
            Self::RaggedBatch { len, dim } => {
                write!(f, "{len} values do not divide into vectors of dimension {dim}")
            }
            Self::BadPoleOffsetShape(n) => {
                write!(f, "pole offsets must be exactly 2 values (dX, dY), got {n}")
            }
            Self::MalformedEopResponse(msg) => write!(f, "malformed EOP response: {msg}"),
            Self::OutputLength { expected, actual } => {
                write!(f, "output buffer holds {actual} values, expected {expected}")
            }
        }
    }
}

impl Error for InputError {}

/// Errors from [`Converter`](crate::Converter) and the free transform
/// functions. Any of these aborts the whole call; no partial output is
/// produced.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TransformError {
    /// Caller data has the wrong shape or the EOP response is unusable.
    CallerInput(InputError),
    /// TT → UTC failed or the date is outside the UTC tables.
    DateResolution(TimeError),
    /// Date resolved as dubious while the converter runs in strict mode.
    DubiousDate { utc: JulianDate },
    /// The EOP source could not serve the requested date.
    EopLookup(TimeError),
    /// Offsets must be looked up but no EOP source is configured.
    MissingEopSource,
    /// The precession-nutation model failed.
    Computation(FrameError),
    /// Leap-second or EOP tables could not be loaded.
    TableLoad(TimeError),
    /// IERS nutation coefficient tables could not be loaded.
    NutationTableLoad(FrameError),
    /// Configuration rejected before loading.
    InvalidConfig(&'static str),
}

impl Display for TransformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CallerInput(e) => write!(f, "invalid input: {e}"),
            Self::DateResolution(e) => write!(f, "date resolution failed: {e}"),
            Self::DubiousDate { utc } => {
                write!(f, "UTC date {utc} is beyond the leap-second table horizon")
            }
            Self::EopLookup(e) => write!(f, "EOP lookup failed: {e}"),
            Self::MissingEopSource => {
                write!(f, "pole offsets not given and no EOP source configured")
            }
            Self::Computation(e) => write!(f, "rotation computation failed: {e}"),
            Self::TableLoad(e) => write!(f, "failed to load table: {e}"),
            Self::NutationTableLoad(e) => write!(f, "failed to load nutation tables: {e}"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl Error for TransformError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CallerInput(e) => Some(e),
            Self::DateResolution(e) | Self::EopLookup(e) | Self::TableLoad(e) => Some(e),
            Self::Computation(e) | Self::NutationTableLoad(e) => Some(e),
            Self::DubiousDate { .. } | Self::MissingEopSource | Self::InvalidConfig(_) => None,
        }
    }
}

impl From<InputError> for TransformError {
    fn from(e: InputError) -> Self {
        Self::CallerInput(e)
    }
}

impl From<FrameError> for TransformError {
    fn from(e: FrameError) -> Self {
        Self::Computation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_exposes_wrapped_error() {
        let err = TransformError::EopLookup(TimeError::EopOutOfRange { mjd: 70_000.0 });
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("MJD 70000 outside EOP table range"));
        assert!(TransformError::MissingEopSource.source().is_none());
    }

    #[test]
    fn conversions_pick_the_right_variant() {
        let e: TransformError = InputError::BadDimension(4).into();
        assert!(matches!(e, TransformError::CallerInput(InputError::BadDimension(4))));
        let e: TransformError = FrameError::NonFiniteEpoch.into();
        assert!(matches!(e, TransformError::Computation(_)));
    }

    #[test]
    fn display_mentions_details() {
        let e = TransformError::CallerInput(InputError::BadPoleOffsetShape(3));
        assert!(e.to_string().contains("got 3"));
    }
}
