//! IAU 2006 precession in the Fukushima-Williams parameterization.
//!
//! The four angles include the frame bias, so the matrix built from them
//! (with nutation added) is the full GCRS → true-of-date NPB matrix.
//!
//! Source: Hilton et al. 2006, Celestial Mechanics and Dynamical
//! Astronomy 94, 351-367; IERS Conventions 2010, Chapter 5.
//! Public domain (IAU standard).

use crate::fundamental::{ARCSEC_TO_RAD, horner};
use crate::matrix::RotationMatrix;
use crate::nutation::Nutation;

/// Fukushima-Williams angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FwAngles {
    /// γ̄: GCRS right ascension of the intersection of the ecliptic of
    /// date with the GCRS equator.
    pub gamb: f64,
    /// φ̄: obliquity of the ecliptic of date on the GCRS equator.
    pub phib: f64,
    /// ψ̄: precession angle plus bias in longitude along the ecliptic.
    pub psib: f64,
    /// ε_A: mean obliquity of date.
    pub epsa: f64,
}

#[allow(clippy::excessive_precision)]
const GAMB: [f64; 6] = [-0.052928, 10.556378, 0.4932044, -0.00031238, -0.000002788, 0.0000000260];
#[allow(clippy::excessive_precision)]
const PHIB: [f64; 6] = [84381.412819, -46.811016, 0.0511268, 0.00053289, -0.000000440, -0.0000000176];
#[allow(clippy::excessive_precision)]
const PSIB: [f64; 6] = [-0.041775, 5038.481484, 1.5584175, -0.00018522, -0.000026452, -0.0000000148];
#[allow(clippy::excessive_precision)]
const EPSA: [f64; 6] = [84381.406, -46.836769, -0.0001831, 0.00200340, -0.000000576, -0.0000000434];

/// IAU 2006 mean obliquity of the ecliptic, radians.
pub fn mean_obliquity(t: f64) -> f64 {
    horner(t, &EPSA) * ARCSEC_TO_RAD
}

impl FwAngles {
    /// Angles at `t` TT Julian centuries since J2000.0.
    pub fn at(t: f64) -> Self {
        Self {
            gamb: horner(t, &GAMB) * ARCSEC_TO_RAD,
            phib: horner(t, &PHIB) * ARCSEC_TO_RAD,
            psib: horner(t, &PSIB) * ARCSEC_TO_RAD,
            epsa: mean_obliquity(t),
        }
    }

    /// Bias-precession matrix (no nutation).
    pub fn bias_precession_matrix(&self) -> RotationMatrix {
        fw_matrix(self.gamb, self.phib, self.psib, self.epsa)
    }

    /// Bias-precession-nutation matrix: `R1(−(ε_A+Δε)) · R3(−(ψ̄+Δψ)) · R1(φ̄) · R3(γ̄)`.
    pub fn npb_matrix(&self, nutation: Nutation) -> RotationMatrix {
        fw_matrix(
            self.gamb,
            self.phib,
            self.psib + nutation.dpsi,
            self.epsa + nutation.deps,
        )
    }
}

fn fw_matrix(gamb: f64, phib: f64, psi: f64, eps: f64) -> RotationMatrix {
    RotationMatrix::IDENTITY
        .rotate_z(gamb)
        .rotate_x(phib)
        .rotate_z(-psi)
        .rotate_x(-eps)
}
