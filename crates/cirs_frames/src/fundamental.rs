//! Fundamental arguments of the luni-solar and planetary series.
//!
//! `t` is always TT Julian centuries since J2000.0. Results are radians.
//!
//! Source: IERS Conventions 2003/2010, Chapter 5 (Simon et al. 1994 for
//! the Delaunay arguments, Souchay et al. 1999 for the planetary ones).
//! Public domain (IAU standard).

use std::f64::consts::TAU;

/// Arcseconds to radians.
pub const ARCSEC_TO_RAD: f64 = TAU / 1_296_000.0;

/// Arcseconds in a full circle.
const TURN_ARCSEC: f64 = 1_296_000.0;

/// Horner evaluation of `c[0] + c[1] t + c[2] t² + ...`.
#[inline]
pub(crate) fn horner(t: f64, coeffs: &[f64]) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * t + c)
}

#[inline]
fn arcsec_angle(t: f64, coeffs: &[f64]) -> f64 {
    (horner(t, coeffs) % TURN_ARCSEC) * ARCSEC_TO_RAD
}

/// Delaunay arguments `[l, l', F, D, Ω]` with the full quartic
/// polynomials.
///
/// - `l`  mean anomaly of the Moon
/// - `l'` mean anomaly of the Sun
/// - `F`  mean longitude of the Moon minus that of its node
/// - `D`  mean elongation of the Moon from the Sun
/// - `Ω`  mean longitude of the Moon's ascending node
#[allow(clippy::excessive_precision)]
pub fn delaunay(t: f64) -> [f64; 5] {
    [
        arcsec_angle(t, &[485_868.249036, 1_717_915_923.2178, 31.8792, 0.051635, -0.00024470]),
        arcsec_angle(t, &[1_287_104.793048, 129_596_581.0481, -0.5532, 0.000136, -0.00001149]),
        arcsec_angle(t, &[335_779.526232, 1_739_527_262.8478, -12.7512, -0.001037, 0.00000417]),
        arcsec_angle(t, &[1_072_260.703692, 1_602_961_601.2090, -6.3706, 0.006593, -0.00003169]),
        arcsec_angle(t, &[450_160.398036, -6_962_890.5431, 7.4722, 0.007702, -0.00005939]),
    ]
}

/// Delaunay arguments truncated to linear terms, as used by the IAU 2000B
/// nutation series.
#[allow(clippy::excessive_precision)]
pub fn delaunay_linear(t: f64) -> [f64; 5] {
    [
        arcsec_angle(t, &[485_868.249036, 1_717_915_923.2178]),
        arcsec_angle(t, &[1_287_104.79305, 129_596_581.0481]),
        arcsec_angle(t, &[335_779.526232, 1_739_527_262.8478]),
        arcsec_angle(t, &[1_072_260.70369, 1_602_961_601.2090]),
        arcsec_angle(t, &[450_160.398036, -6_962_890.5431]),
    ]
}

/// Mean longitude of Mercury.
#[allow(clippy::excessive_precision)]
pub fn mercury_longitude(t: f64) -> f64 {
    (4.402608842 + 2608.7903141574 * t) % TAU
}

/// Mean longitude of Venus.
#[allow(clippy::excessive_precision)]
pub fn venus_longitude(t: f64) -> f64 {
    (3.176146697 + 1021.3285546211 * t) % TAU
}

/// Mean longitude of the Earth.
#[allow(clippy::excessive_precision)]
pub fn earth_longitude(t: f64) -> f64 {
    (1.753470314 + 628.3075849991 * t) % TAU
}

/// Mean longitude of Mars.
#[allow(clippy::excessive_precision)]
pub fn mars_longitude(t: f64) -> f64 {
    (6.203480913 + 334.0612426700 * t) % TAU
}

#[allow(clippy::excessive_precision)]
pub fn jupiter_longitude(t: f64) -> f64 {
    (0.599546497 + 52.9690962641 * t) % TAU
}

#[allow(clippy::excessive_precision)]
pub fn saturn_longitude(t: f64) -> f64 {
    (0.874016757 + 21.3299104960 * t) % TAU
}

#[allow(clippy::excessive_precision)]
pub fn uranus_longitude(t: f64) -> f64 {
    (5.481293872 + 7.4781598567 * t) % TAU
}

#[allow(clippy::excessive_precision)]
pub fn neptune_longitude(t: f64) -> f64 {
    (5.311886287 + 3.8133035638 * t) % TAU
}

/// The fourteen arguments of the IERS nutation tables, in column order:
/// the Delaunay arguments, the planetary longitudes Mercury to Neptune and
/// the general precession.
pub fn nutation_arguments(t: f64) -> [f64; 14] {
    let [l, lp, f, d, om] = delaunay(t);
    [
        l,
        lp,
        f,
        d,
        om,
        mercury_longitude(t),
        venus_longitude(t),
        earth_longitude(t),
        mars_longitude(t),
        jupiter_longitude(t),
        saturn_longitude(t),
        uranus_longitude(t),
        neptune_longitude(t),
        general_precession(t),
    ]
}

/// General accumulated precession in longitude.
#[allow(clippy::excessive_precision)]
pub fn general_precession(t: f64) -> f64 {
    (0.024381750 + 0.00000538691 * t) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horner_matches_expanded_polynomial() {
        let t = 0.37;
        let c = [1.0, -2.0, 0.5, 3.0];
        let expanded = 1.0 - 2.0 * t + 0.5 * t * t + 3.0 * t * t * t;
        assert!((horner(t, &c) - expanded).abs() < 1e-15);
    }

    #[test]
    fn j2000_values() {
        let fa = delaunay(0.0);
        assert!((fa[0] - 485_868.249036 * ARCSEC_TO_RAD).abs() < 1e-15);
        assert!((fa[4] - 450_160.398036 * ARCSEC_TO_RAD).abs() < 1e-15);
    }

    #[test]
    fn linear_and_full_agree_near_j2000() {
        // The quadratic terms only matter at the milliarcsecond level
        // after a few years.
        let full = delaunay(0.01);
        let linear = delaunay_linear(0.01);
        for (a, b) in full.iter().zip(linear) {
            assert!((a - b).abs() < 1e-7);
        }
    }

    #[test]
    fn node_regresses() {
        // Ω decreases by ~1934° per century.
        let om0 = delaunay(0.0)[4];
        let om1 = delaunay(0.001)[4];
        assert!(om1 < om0);
    }

    #[test]
    fn planetary_terms() {
        assert!((venus_longitude(0.0) - 3.176146697).abs() < 1e-15);
        assert!((earth_longitude(0.0) - 1.753470314).abs() < 1e-15);
        assert_eq!(general_precession(0.0), 0.0);
        assert!(general_precession(1.0) > 0.024);
    }

    #[test]
    fn argument_columns() {
        let t = 0.123;
        let args = nutation_arguments(t);
        assert_eq!(&args[..5], &delaunay(t));
        assert_eq!(args[6], venus_longitude(t));
        assert_eq!(args[12], neptune_longitude(t));
        assert_eq!(args[13], general_precession(t));
        // Outer planets move slowest.
        assert!(mercury_longitude(0.01) - mercury_longitude(0.0) > 26.0);
        assert!(neptune_longitude(0.01) - neptune_longitude(0.0) < 0.04);
    }
}
