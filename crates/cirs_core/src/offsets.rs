//! Celestial pole offsets and how they are obtained.

use cirs_time::{DateQuality, EopProvider, JulianDate, LeapSecondTable, tt_to_utc};

use crate::error::{InputError, TransformError};

/// Corrections dX, dY to the model CIP, radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoleOffset {
    pub dx: f64,
    pub dy: f64,
}

impl PoleOffset {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Offsets from a caller slice, which must hold exactly `[dX, dY]`.
    pub fn from_slice(values: &[f64]) -> Result<Self, InputError> {
        match *values {
            [dx, dy] => Ok(Self { dx, dy }),
            _ => Err(InputError::BadPoleOffsetShape(values.len())),
        }
    }
}

/// Where the pole offsets for a call come from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PoleOffsetSource {
    /// Use these values; no EOP lookup happens.
    Explicit(PoleOffset),
    /// Look dX, dY up at the UTC equivalent of the epoch.
    #[default]
    LookupFromEop,
}

impl From<PoleOffset> for PoleOffsetSource {
    fn from(offset: PoleOffset) -> Self {
        Self::Explicit(offset)
    }
}

/// Offsets ready for the rotation builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedOffset {
    pub offset: PoleOffset,
    /// UTC date used for the lookup; `None` for explicit offsets.
    pub utc: Option<JulianDate>,
    pub quality: DateQuality,
}

/// Turn a [`PoleOffsetSource`] into concrete offsets for the TT epoch `tt`.
///
/// Lookups convert TT → TAI → UTC first. A dubious UTC date is logged and
/// reported through [`ResolvedOffset::quality`]; deciding whether to
/// proceed is left to the caller.
pub fn resolve_pole_offset(
    source: PoleOffsetSource,
    tt: JulianDate,
    leap_seconds: &LeapSecondTable,
    eop: Option<&dyn EopProvider>,
) -> Result<ResolvedOffset, TransformError> {
    match source {
        PoleOffsetSource::Explicit(offset) => Ok(ResolvedOffset {
            offset,
            utc: None,
            quality: DateQuality::Reliable,
        }),
        PoleOffsetSource::LookupFromEop => {
            let eop = eop.ok_or(TransformError::MissingEopSource)?;
            lookup(tt, leap_seconds, eop)
        }
    }
}

fn lookup(
    tt: JulianDate,
    leap_seconds: &LeapSecondTable,
    eop: &dyn EopProvider,
) -> Result<ResolvedOffset, TransformError> {
    let utc = tt_to_utc(tt, leap_seconds).map_err(TransformError::DateResolution)?;
    if utc.quality.is_dubious() {
        log::warn!(
            "UTC {} is past the leap-second table (valid to {}); EOP lookup may be off",
            utc.value,
            leap_seconds.validity_year()
        );
    }
    log::debug!("EOP lookup at UTC {}", utc.value);

    let response = eop.lookup(utc.value).map_err(TransformError::EopLookup)?;
    let (dx, dy) = match (response.dx, response.dy) {
        (Some(dx), Some(dy)) => (dx, dy),
        _ => return Err(InputError::MalformedEopResponse("dX/dY missing").into()),
    };
    if !(dx.is_finite() && dy.is_finite()) {
        return Err(InputError::MalformedEopResponse("dX/dY not finite").into());
    }
    log::debug!("pole offsets from EOP: dX = {dx:e} rad, dY = {dy:e} rad");

    Ok(ResolvedOffset {
        offset: PoleOffset { dx, dy },
        utc: Some(utc.value),
        quality: utc.quality,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirs_time::{EopResponse, FixedEop, TimeError};

    const TT_2006: JulianDate = JulianDate::new(2_400_000.5, 53_736.0);

    #[test]
    fn slice_must_have_two_values() {
        assert_eq!(PoleOffset::from_slice(&[1e-9, 2e-9]), Ok(PoleOffset::new(1e-9, 2e-9)));
        assert_eq!(
            PoleOffset::from_slice(&[1.0, 2.0, 3.0]),
            Err(InputError::BadPoleOffsetShape(3))
        );
        assert_eq!(PoleOffset::from_slice(&[]), Err(InputError::BadPoleOffsetShape(0)));
    }

    #[test]
    fn explicit_offsets_skip_lookup() {
        let table = LeapSecondTable::builtin();
        let source = PoleOffsetSource::from(PoleOffset::new(1e-9, -1e-9));
        let resolved = resolve_pole_offset(source, TT_2006, &table, None).unwrap();
        assert_eq!(resolved.offset, PoleOffset::new(1e-9, -1e-9));
        assert_eq!(resolved.utc, None);
    }

    #[test]
    fn lookup_needs_a_source() {
        let table = LeapSecondTable::builtin();
        let err = resolve_pole_offset(PoleOffsetSource::LookupFromEop, TT_2006, &table, None);
        assert_eq!(err, Err(TransformError::MissingEopSource));
    }

    #[test]
    fn lookup_uses_utc_date() {
        let table = LeapSecondTable::builtin();
        let seen = |utc: JulianDate| {
            // 2006-01-01 0h TT is 64.184 s earlier in UTC.
            let lag_s = (TT_2006.total() - utc.total()) * 86_400.0;
            assert!((lag_s - 64.184).abs() < 1e-3, "lag {lag_s}");
            Ok::<_, TimeError>(EopResponse::pole_offsets(2e-10, 3e-10))
        };
        let resolved =
            resolve_pole_offset(PoleOffsetSource::LookupFromEop, TT_2006, &table, Some(&seen))
                .unwrap();
        assert_eq!(resolved.offset, PoleOffset::new(2e-10, 3e-10));
        assert_eq!(resolved.quality, DateQuality::Reliable);
        assert!(resolved.utc.is_some());
    }

    #[test]
    fn missing_or_nan_offsets_are_malformed() {
        let table = LeapSecondTable::builtin();
        let missing = FixedEop(EopResponse {
            x_pole: 0.0,
            y_pole: 0.0,
            dx: None,
            dy: Some(0.0),
        });
        let err = resolve_pole_offset(PoleOffsetSource::LookupFromEop, TT_2006, &table, Some(&missing));
        assert!(matches!(
            err,
            Err(TransformError::CallerInput(InputError::MalformedEopResponse(_)))
        ));

        let nan = FixedEop(EopResponse::pole_offsets(f64::NAN, 0.0));
        let err = resolve_pole_offset(PoleOffsetSource::LookupFromEop, TT_2006, &table, Some(&nan));
        assert!(matches!(
            err,
            Err(TransformError::CallerInput(InputError::MalformedEopResponse(_)))
        ));
    }

    #[test]
    fn lookup_failure_is_eop_error() {
        let table = LeapSecondTable::builtin();
        let failing =
            |utc: JulianDate| Err::<EopResponse, _>(TimeError::EopOutOfRange { mjd: utc.mjd() });
        let err =
            resolve_pole_offset(PoleOffsetSource::LookupFromEop, TT_2006, &table, Some(&failing));
        assert!(matches!(err, Err(TransformError::EopLookup(TimeError::EopOutOfRange { .. }))));
    }

    #[test]
    fn pre_1960_is_date_resolution_error() {
        let table = LeapSecondTable::builtin();
        let eop = FixedEop(EopResponse::pole_offsets(0.0, 0.0));
        let tt = JulianDate::from_mjd(30_000.0);
        let err = resolve_pole_offset(PoleOffsetSource::LookupFromEop, tt, &table, Some(&eop));
        assert!(matches!(
            err,
            Err(TransformError::DateResolution(TimeError::PreUtcDate { .. }))
        ));
    }
}
