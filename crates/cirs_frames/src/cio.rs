//! CIP coordinates, the CIO locator and the GCRS ↔ CIRS rotation.
//!
//! The CIO locator `s` places the Celestial Intermediate Origin on the CIP
//! equator. It is evaluated from the IAU 2006 series for `s + XY/2`
//! (66 periodic terms over five powers of `t`) minus `XY/2`.
//!
//! Sources: Capitaine et al. 2003, A&A 400, 1145-1154; IERS Conventions
//! 2010, Chapter 5. Public domain (IAU standard).

use crate::fundamental::{
    ARCSEC_TO_RAD, delaunay, earth_longitude, general_precession, venus_longitude,
};
use crate::matrix::RotationMatrix;

/// One periodic term: multipliers of `[l, l', F, D, Ω, L_Ve, L_E, p_A]`
/// and sine/cosine amplitudes in microarcseconds.
#[derive(Clone, Copy)]
struct SeriesTerm {
    args: [i8; 8],
    sin: f64,
    cos: f64,
}

const fn term(args: [i8; 8], sin: f64, cos: f64) -> SeriesTerm {
    SeriesTerm { args, sin, cos }
}

/// Polynomial part of `s + XY/2`, microarcseconds, `t⁰` to `t⁵`.
#[allow(clippy::excessive_precision)]
const POLY: [f64; 6] = [94.00, 3808.65, -122.68, -72574.11, 27.98, 15.62];

#[rustfmt::skip]
const T0: [SeriesTerm; 33] = [
    term([ 0,  0,  0,  0,  1,  0,  0,  0], -2640.73,   0.39),
    term([ 0,  0,  0,  0,  2,  0,  0,  0],   -63.53,   0.02),
    term([ 0,  0,  2, -2,  3,  0,  0,  0],   -11.75,  -0.01),
    term([ 0,  0,  2, -2,  1,  0,  0,  0],   -11.21,  -0.01),
    term([ 0,  0,  2, -2,  2,  0,  0,  0],     4.57,   0.00),
    term([ 0,  0,  2,  0,  3,  0,  0,  0],    -2.02,   0.00),
    term([ 0,  0,  2,  0,  1,  0,  0,  0],    -1.98,   0.00),
    term([ 0,  0,  0,  0,  3,  0,  0,  0],     1.72,   0.00),
    term([ 0,  1,  0,  0,  1,  0,  0,  0],     1.41,   0.01),
    term([ 0,  1,  0,  0, -1,  0,  0,  0],     1.26,   0.01),
    term([ 1,  0,  0,  0, -1,  0,  0,  0],     0.63,   0.00),
    term([ 1,  0,  0,  0,  1,  0,  0,  0],     0.63,   0.00),
    term([ 0,  1,  2, -2,  3,  0,  0,  0],    -0.46,   0.00),
    term([ 0,  1,  2, -2,  1,  0,  0,  0],    -0.45,   0.00),
    term([ 0,  0,  4, -4,  4,  0,  0,  0],    -0.36,   0.00),
    term([ 0,  0,  1, -1,  1, -8, 12,  0],     0.24,   0.12),
    term([ 0,  0,  2,  0,  0,  0,  0,  0],    -0.32,   0.00),
    term([ 0,  0,  2,  0,  2,  0,  0,  0],    -0.28,   0.00),
    term([ 1,  0,  2,  0,  3,  0,  0,  0],    -0.27,   0.00),
    term([ 1,  0,  2,  0,  1,  0,  0,  0],    -0.26,   0.00),
    term([ 0,  0,  2, -2,  0,  0,  0,  0],     0.21,   0.00),
    term([ 0,  1, -2,  2, -3,  0,  0,  0],    -0.19,   0.00),
    term([ 0,  1, -2,  2, -1,  0,  0,  0],    -0.18,   0.00),
    term([ 0,  0,  0,  0,  0,  8, -13, -1],     0.10,  -0.05),
    term([ 0,  0,  0,  2,  0,  0,  0,  0],    -0.15,   0.00),
    term([ 2,  0, -2,  0, -1,  0,  0,  0],     0.14,   0.00),
    term([ 0,  1,  2, -2,  2,  0,  0,  0],     0.14,   0.00),
    term([ 1,  0,  0, -2,  1,  0,  0,  0],    -0.14,   0.00),
    term([ 1,  0,  0, -2, -1,  0,  0,  0],    -0.14,   0.00),
    term([ 0,  0,  4, -2,  4,  0,  0,  0],    -0.13,   0.00),
    term([ 0,  0,  2, -2,  4,  0,  0,  0],     0.11,   0.00),
    term([ 1,  0, -2,  0, -3,  0,  0,  0],    -0.11,   0.00),
    term([ 1,  0, -2,  0, -1,  0,  0,  0],    -0.11,   0.00),
];

#[rustfmt::skip]
const T1: [SeriesTerm; 3] = [
    term([ 0,  0,  0,  0,  2,  0,  0,  0],    -0.07,   3.57),
    term([ 0,  0,  0,  0,  1,  0,  0,  0],     1.73,  -0.03),
    term([ 0,  0,  2, -2,  3,  0,  0,  0],     0.00,   0.48),
];

#[rustfmt::skip]
const T2: [SeriesTerm; 25] = [
    term([ 0,  0,  0,  0,  1,  0,  0,  0],   743.52,  -0.17),
    term([ 0,  0,  2, -2,  2,  0,  0,  0],    56.91,   0.06),
    term([ 0,  0,  2,  0,  2,  0,  0,  0],     9.84,  -0.01),
    term([ 0,  0,  0,  0,  2,  0,  0,  0],    -8.85,   0.01),
    term([ 0,  1,  0,  0,  0,  0,  0,  0],    -6.38,  -0.05),
    term([ 1,  0,  0,  0,  0,  0,  0,  0],    -3.07,   0.00),
    term([ 0,  1,  2, -2,  2,  0,  0,  0],     2.23,   0.00),
    term([ 0,  0,  2,  0,  1,  0,  0,  0],     1.67,   0.00),
    term([ 1,  0,  2,  0,  2,  0,  0,  0],     1.30,   0.00),
    term([ 0,  1, -2,  2, -2,  0,  0,  0],     0.93,   0.00),
    term([ 1,  0,  0, -2,  0,  0,  0,  0],     0.68,   0.00),
    term([ 0,  0,  2, -2,  1,  0,  0,  0],    -0.55,   0.00),
    term([ 1,  0, -2,  0, -2,  0,  0,  0],     0.53,   0.00),
    term([ 0,  0,  0,  2,  0,  0,  0,  0],    -0.27,   0.00),
    term([ 1,  0,  0,  0,  1,  0,  0,  0],    -0.27,   0.00),
    term([ 1,  0, -2, -2, -2,  0,  0,  0],    -0.26,   0.00),
    term([ 1,  0,  0,  0, -1,  0,  0,  0],    -0.25,   0.00),
    term([ 1,  0,  2,  0,  1,  0,  0,  0],     0.22,   0.00),
    term([ 2,  0,  0, -2,  0,  0,  0,  0],    -0.21,   0.00),
    term([ 2,  0, -2,  0, -1,  0,  0,  0],     0.20,   0.00),
    term([ 0,  0,  2,  2,  2,  0,  0,  0],     0.17,   0.00),
    term([ 2,  0,  2,  0,  2,  0,  0,  0],     0.13,   0.00),
    term([ 2,  0,  0,  0,  0,  0,  0,  0],    -0.13,   0.00),
    term([ 1,  0,  2, -2,  2,  0,  0,  0],    -0.12,   0.00),
    term([ 0,  0,  2,  0,  0,  0,  0,  0],    -0.11,   0.00),
];

#[rustfmt::skip]
const T3: [SeriesTerm; 4] = [
    term([ 0,  0,  0,  0,  1,  0,  0,  0],     0.30, -23.42),
    term([ 0,  0,  2, -2,  2,  0,  0,  0],    -0.03,  -1.46),
    term([ 0,  0,  2,  0,  2,  0,  0,  0],    -0.01,  -0.25),
    term([ 0,  0,  0,  0,  2,  0,  0,  0],     0.00,   0.23),
];

#[rustfmt::skip]
const T4: [SeriesTerm; 1] = [
    term([ 0,  0,  0,  0,  1,  0,  0,  0],    -0.26,  -0.01),
];

/// `s + XY/2` in radians.
fn series_s_plus_half_xy(t: f64) -> f64 {
    let [l, lp, f, d, om] = delaunay(t);
    let fa = [
        l,
        lp,
        f,
        d,
        om,
        venus_longitude(t),
        earth_longitude(t),
        general_precession(t),
    ];

    let sum = |terms: &[SeriesTerm]| -> f64 {
        terms.iter().rev().fold(0.0, |acc, term| {
            let arg: f64 = term
                .args
                .iter()
                .zip(&fa)
                .map(|(&n, &a)| f64::from(n) * a)
                .sum();
            let (s, c) = arg.sin_cos();
            acc + term.sin * s + term.cos * c
        })
    };

    let w = [
        POLY[0] + sum(&T0),
        POLY[1] + sum(&T1),
        POLY[2] + sum(&T2),
        POLY[3] + sum(&T3),
        POLY[4] + sum(&T4),
        POLY[5],
    ];
    let micro_arcsec = w[0] + (w[1] + (w[2] + (w[3] + (w[4] + w[5] * t) * t) * t) * t) * t;
    micro_arcsec * 1e-6 * ARCSEC_TO_RAD
}

/// CIO locator `s` in radians, given the CIP coordinates at the same date.
pub fn cio_locator(t: f64, x: f64, y: f64) -> f64 {
    series_s_plus_half_xy(t) - 0.5 * x * y
}

/// CIP `(X, Y)` from a bias-precession-nutation matrix: the GCRS
/// components of the CIP unit vector, i.e. the bottom row.
pub fn cip_from_npb(npb: &RotationMatrix) -> (f64, f64) {
    (npb[(2, 0)], npb[(2, 1)])
}

/// GCRS → CIRS rotation from CIP coordinates and CIO locator:
/// `R3(−(E+s)) · R2(d) · R3(E)`.
///
/// `E = atan2(Y, X)` (zero at the pole) and `d = atan(√(r²/(1−r²)))`
/// with `r² = X² + Y²`.
pub fn gcrs_to_cirs_matrix(x: f64, y: f64, s: f64) -> RotationMatrix {
    let r2 = x * x + y * y;
    let e = if r2 > 0.0 { y.atan2(x) } else { 0.0 };
    let d = (r2 / (1.0 - r2)).sqrt().atan();

    RotationMatrix::IDENTITY
        .rotate_z(e)
        .rotate_y(d)
        .rotate_z(-(e + s))
}
