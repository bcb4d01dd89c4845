//! Precession-nutation model and rotation matrices for CIRS ↔ GCRS.
//!
//! This crate provides:
//! - a row-major [`RotationMatrix`] value type
//! - IAU 2006 precession (Fukushima-Williams angles) and IAU 2000B nutation
//! - IAU 2000A nutation from the IERS coefficient tables ([`NutationSeries`])
//! - the CIP coordinates X, Y and CIO locator s at a TT epoch ([`cip_xys`],
//!   [`cip_xys_iau2000a`])
//! - the GCRS → CIRS matrix from (X, Y, s) ([`gcrs_to_cirs_matrix`])

pub mod cio;
pub mod error;
pub mod fundamental;
pub mod matrix;
pub mod nutation;
pub mod precession;
pub mod series;

use cirs_time::JulianDate;

pub use cio::{cio_locator, cip_from_npb, gcrs_to_cirs_matrix};
pub use error::FrameError;
pub use matrix::RotationMatrix;
pub use nutation::{Nutation, nutation_2000b, nutation_2006};
pub use precession::{FwAngles, mean_obliquity};
pub use series::{NutationSeries, SeriesTerm};

/// Series are not used beyond this many Julian centuries from J2000.0.
pub const VALIDITY_CENTURIES: f64 = 20.0;

/// CIP coordinates and CIO locator, radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CipXys {
    pub x: f64,
    pub y: f64,
    pub s: f64,
}

impl CipXys {
    /// Add celestial pole offsets to X and Y; `s` is left unchanged.
    pub fn with_pole_offsets(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            s: self.s,
        }
    }

    /// GCRS → CIRS matrix for these coordinates.
    pub fn gcrs_to_cirs(&self) -> RotationMatrix {
        gcrs_to_cirs_matrix(self.x, self.y, self.s)
    }
}

/// X, Y and s at a TT epoch from IAU 2006 precession and IAU 2000B
/// nutation.
pub fn cip_xys(tt: JulianDate) -> Result<CipXys, FrameError> {
    cip_xys_with(tt, nutation_2006)
}

/// X, Y and s at a TT epoch from IAU 2006 precession and IAU 2000A
/// nutation summed from `series`.
pub fn cip_xys_iau2000a(tt: JulianDate, series: &NutationSeries) -> Result<CipXys, FrameError> {
    cip_xys_with(tt, |t| series.nutation_2006(t))
}

fn cip_xys_with(
    tt: JulianDate,
    nutation: impl FnOnce(f64) -> Nutation,
) -> Result<CipXys, FrameError> {
    if !tt.is_finite() {
        return Err(FrameError::NonFiniteEpoch);
    }
    let t = tt.centuries_since_j2000();
    if t.abs() > VALIDITY_CENTURIES {
        return Err(FrameError::OutsideValidity { centuries: t });
    }

    let npb = FwAngles::at(t).npb_matrix(nutation(t));
    let (x, y) = cip_from_npb(&npb);
    let s = cio_locator(t, x, y);

    if !(x.is_finite() && y.is_finite()) {
        return Err(FrameError::NonFiniteResult("CIP coordinates"));
    }
    if !s.is_finite() {
        return Err(FrameError::NonFiniteResult("CIO locator"));
    }
    log::trace!("CIP at t = {t:.9}: X = {x:e}, Y = {y:e}, s = {s:e}");
    Ok(CipXys { x, y, s })
}
