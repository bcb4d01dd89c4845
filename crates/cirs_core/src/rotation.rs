//! Building the CIRS ↔ GCRS rotation for an epoch.

use cirs_frames::{CipXys, FrameError, NutationSeries, RotationMatrix};
use cirs_time::JulianDate;

use crate::offsets::PoleOffset;

/// Source of CIP coordinates and CIO locator.
///
/// Implementations must be pure functions of the epoch.
pub trait PrecessionNutation: Send + Sync {
    fn cip_xys(&self, tt: JulianDate) -> Result<CipXys, FrameError>;
}

/// IAU 2006 precession with IAU 2000B nutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Iau2006Model;

impl PrecessionNutation for Iau2006Model {
    fn cip_xys(&self, tt: JulianDate) -> Result<CipXys, FrameError> {
        cirs_frames::cip_xys(tt)
    }
}

/// IAU 2006 precession with IAU 2000A nutation from the IERS tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Iau2006aModel {
    series: NutationSeries,
}

impl Iau2006aModel {
    pub fn new(series: NutationSeries) -> Self {
        Self { series }
    }

    pub fn series(&self) -> &NutationSeries {
        &self.series
    }
}

impl PrecessionNutation for Iau2006aModel {
    fn cip_xys(&self, tt: JulianDate) -> Result<CipXys, FrameError> {
        cirs_frames::cip_xys_iau2000a(tt, &self.series)
    }
}

/// The rotation at one epoch, with the quantities it was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirsRotation {
    /// TT epoch.
    pub epoch: JulianDate,
    /// Offsets applied to the model pole.
    pub offset: PoleOffset,
    /// X, Y (offsets included) and s.
    pub cip: CipXys,
    gcrs_to_cirs: RotationMatrix,
}

impl CirsRotation {
    /// Matrix taking GCRS vectors to CIRS.
    pub fn gcrs_to_cirs(&self) -> RotationMatrix {
        self.gcrs_to_cirs
    }

    /// Matrix taking CIRS vectors to GCRS: exactly the transpose of
    /// [`gcrs_to_cirs`](Self::gcrs_to_cirs).
    pub fn cirs_to_gcrs(&self) -> RotationMatrix {
        self.gcrs_to_cirs.transpose()
    }
}

/// Computes [`CirsRotation`]s from a precession-nutation model.
pub struct RotationBuilder<'m> {
    model: &'m dyn PrecessionNutation,
}

impl RotationBuilder<'static> {
    /// Builder on the built-in IAU 2006/2000B model.
    pub fn iau2006() -> Self {
        Self { model: &Iau2006Model }
    }
}

impl Default for RotationBuilder<'static> {
    fn default() -> Self {
        Self::iau2006()
    }
}

impl<'m> RotationBuilder<'m> {
    pub fn new(model: &'m dyn PrecessionNutation) -> Self {
        Self { model }
    }

    /// Evaluate the model at `tt`, add `offset` to X and Y and build the
    /// matrix.
    pub fn build(&self, tt: JulianDate, offset: PoleOffset) -> Result<CirsRotation, FrameError> {
        let cip = self
            .model
            .cip_xys(tt)?
            .with_pole_offsets(offset.dx, offset.dy);
        let gcrs_to_cirs = cip.gcrs_to_cirs();
        if !gcrs_to_cirs.is_finite() {
            return Err(FrameError::NonFiniteResult("rotation matrix"));
        }
        Ok(CirsRotation {
            epoch: tt,
            offset,
            cip,
            gcrs_to_cirs,
        })
    }
}

impl std::fmt::Debug for RotationBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotationBuilder").finish_non_exhaustive()
    }
}
