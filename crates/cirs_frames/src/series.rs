//! IAU 2000A nutation evaluated from the IERS coefficient tables.
//!
//! The full MHB2000 luni-solar and planetary series is read from the IERS
//! Conventions 2010 files `tab5.3a.txt` (Δψ) and `tab5.3b.txt` (Δε)
//! instead of being compiled in. Each data row is
//!
//! ```text
//! i  a_sin  a_cos  l l' F D Ω  L_Me L_Ve L_E L_Ma L_J L_Sa L_U L_Ne p_A
//! ```
//!
//! with amplitudes in µas. A `j = N` header line starts the block whose
//! terms are multiplied by `t^N`. Anything else (titles, rulers, blank
//! lines) is skipped.
//!
//! Source: IERS Conventions 2010, Chapter 5, eqs. 5.35 and 5.43-5.44.

use std::f64::consts::TAU;
use std::path::Path;

use crate::error::FrameError;
use crate::fundamental::{ARCSEC_TO_RAD, nutation_arguments};
use crate::nutation::Nutation;

const MICROARCSEC_TO_RAD: f64 = ARCSEC_TO_RAD / 1e6;

/// Columns in a data row: index, two amplitudes, fourteen multipliers.
const ROW_WIDTH: usize = 17;

/// One periodic term, amplitudes in µas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesTerm {
    /// Multipliers of `[l, l', F, D, Ω, L_Me, …, L_Ne, p_A]`.
    pub multipliers: [i8; 14],
    pub sin: f64,
    pub cos: f64,
}

impl SeriesTerm {
    #[inline]
    fn value(&self, args: &[f64; 14]) -> f64 {
        let arg = self
            .multipliers
            .iter()
            .zip(args)
            .map(|(&n, &a)| f64::from(n) * a)
            .sum::<f64>()
            % TAU;
        let (s, c) = arg.sin_cos();
        self.sin * s + self.cos * c
    }
}

/// Δψ and Δε series, each split by power of `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct NutationSeries {
    longitude: Vec<Vec<SeriesTerm>>,
    obliquity: Vec<Vec<SeriesTerm>>,
}

impl NutationSeries {
    /// Read `tab5.3a.txt` (longitude) and `tab5.3b.txt` (obliquity).
    pub fn load(longitude: &Path, obliquity: &Path) -> Result<Self, FrameError> {
        let psi = std::fs::read_to_string(longitude)?;
        let eps = std::fs::read_to_string(obliquity)?;
        Self::parse(&psi, &eps)
    }

    /// Build from the text of the two tables.
    pub fn parse(longitude: &str, obliquity: &str) -> Result<Self, FrameError> {
        let series = Self {
            longitude: parse_table(longitude)?,
            obliquity: parse_table(obliquity)?,
        };
        log::debug!(
            "nutation tables: {} longitude terms, {} obliquity terms",
            count(&series.longitude),
            count(&series.obliquity)
        );
        Ok(series)
    }

    /// Total number of terms in both tables.
    pub fn term_count(&self) -> usize {
        count(&self.longitude) + count(&self.obliquity)
    }

    /// IAU 2000A nutation at `t` TT Julian centuries since J2000.0.
    pub fn evaluate(&self, t: f64) -> Nutation {
        let args = nutation_arguments(t);
        Nutation {
            dpsi: polynomial_sum(&self.longitude, &args, t) * MICROARCSEC_TO_RAD,
            deps: polynomial_sum(&self.obliquity, &args, t) * MICROARCSEC_TO_RAD,
        }
    }

    /// IAU 2000A nutation with the IAU 2006 adjustment.
    pub fn nutation_2006(&self, t: f64) -> Nutation {
        self.evaluate(t).adjusted_for_2006(t)
    }
}

fn count(blocks: &[Vec<SeriesTerm>]) -> usize {
    blocks.iter().map(Vec::len).sum()
}

/// `Σ_j t^j Σ_i term_i`, smallest terms first within each block.
fn polynomial_sum(blocks: &[Vec<SeriesTerm>], args: &[f64; 14], t: f64) -> f64 {
    blocks.iter().rev().fold(0.0, |acc, terms| {
        let block: f64 = terms.iter().rev().map(|term| term.value(args)).sum();
        acc * t + block
    })
}

fn parse_table(content: &str) -> Result<Vec<Vec<SeriesTerm>>, FrameError> {
    let mut blocks: Vec<Vec<SeriesTerm>> = vec![Vec::new()];
    let mut power = 0;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        let bad = |reason: String| FrameError::SeriesParse {
            line: idx + 1,
            reason,
        };

        if let Some(rest) = line.strip_prefix('j') {
            if let Some(value) = rest.trim_start().strip_prefix('=') {
                let digits = value.split_whitespace().next().unwrap_or_default();
                power = digits
                    .parse::<usize>()
                    .map_err(|_| bad(format!("bad power of t {digits:?}")))?;
                if blocks.len() <= power {
                    blocks.resize_with(power + 1, Vec::new);
                }
                continue;
            }
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != ROW_WIDTH || fields[0].parse::<u32>().is_err() {
            continue;
        }
        let amplitude = |s: &str| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| bad(format!("bad amplitude {s:?}")))
        };
        let sin = amplitude(fields[1])?;
        let cos = amplitude(fields[2])?;
        let mut multipliers = [0i8; 14];
        for (slot, field) in multipliers.iter_mut().zip(&fields[3..]) {
            *slot = field
                .parse()
                .map_err(|_| bad(format!("bad multiplier {field:?}")))?;
        }
        blocks[power].push(SeriesTerm {
            multipliers,
            sin,
            cos,
        });
    }

    if count(&blocks) == 0 {
        return Err(FrameError::SeriesParse {
            line: 0,
            reason: "no terms found".into(),
        });
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fundamental::{earth_longitude, venus_longitude};
    use crate::nutation::{LUNI_SOLAR, nutation_2000b};

    /// A data row in the IERS layout.
    fn row(i: usize, sin: f64, cos: f64, multipliers: &[i64]) -> String {
        let mut cols: Vec<String> = multipliers.iter().map(|n| format!("{n:4}")).collect();
        cols.resize(14, format!("{:4}", 0));
        format!("{i:6} {sin:16.2} {cos:12.2} {}\n", cols.join(" "))
    }

    /// The IAU 2000B terms written out as IERS tables, its fixed planetary
    /// offsets carried as zero-frequency terms.
    fn tables_2000b() -> (String, String) {
        let header = "  Table 5.3a (excerpt)\n  Units: microarcsecond\n\n";
        let mut psi = format!("{header}j = 0  Number of terms = 78\n\n");
        let mut eps = format!("{header}j = 0  Number of terms = 78\n\n");
        for (i, r) in LUNI_SOLAR.iter().enumerate() {
            let r = r.map(|v| v as f64);
            psi.push_str(&row(i + 1, r[5] / 10.0, r[7] / 10.0, &LUNI_SOLAR[i][..5]));
            eps.push_str(&row(i + 1, r[10] / 10.0, r[8] / 10.0, &LUNI_SOLAR[i][..5]));
        }
        psi.push_str(&row(78, 0.0, -135.0, &[]));
        eps.push_str(&row(78, 0.0, 388.0, &[]));

        psi.push_str("\n-----\nj = 1  Number of terms = 77\n\n");
        eps.push_str("\n-----\nj = 1  Number of terms = 77\n\n");
        for (i, r) in LUNI_SOLAR.iter().enumerate() {
            let r = r.map(|v| v as f64);
            psi.push_str(&row(i + 79, r[6] / 10.0, 0.0, &LUNI_SOLAR[i][..5]));
            eps.push_str(&row(i + 79, 0.0, r[9] / 10.0, &LUNI_SOLAR[i][..5]));
        }
        (psi, eps)
    }

    #[test]
    fn reproduces_2000b_from_its_own_terms() {
        let (psi, eps) = tables_2000b();
        let series = NutationSeries::parse(&psi, &eps).unwrap();
        assert_eq!(series.term_count(), 2 * (78 + 77));

        // At J2000 the full and linear Delaunay arguments coincide.
        let a = series.evaluate(0.0);
        let b = nutation_2000b(0.0);
        assert!((a.dpsi - b.dpsi).abs() < 1e-15);
        assert!((a.deps - b.deps).abs() < 1e-15);

        // Elsewhere they differ by the quadratic argument terms only.
        let t = 0.06;
        let a = series.evaluate(t);
        let b = nutation_2000b(t);
        assert!((a.dpsi - b.dpsi).abs() < 1e-10);
        assert!((a.deps - b.deps).abs() < 1e-10);
    }

    #[test]
    fn planetary_columns_follow_delaunay_columns() {
        // One term on 2 L_Ve - 3 L_E, longitude only.
        let psi = format!("j = 0\n{}", row(1, 10.0, -4.0, &[0, 0, 0, 0, 0, 0, 2, -3]));
        let eps = format!("j = 0\n{}", row(1, 0.0, 0.0, &[]));
        let series = NutationSeries::parse(&psi, &eps).unwrap();

        let t = 0.2;
        let arg = (2.0 * venus_longitude(t) - 3.0 * earth_longitude(t)) % TAU;
        let expected = (10.0 * arg.sin() - 4.0 * arg.cos()) * MICROARCSEC_TO_RAD;
        let n = series.evaluate(t);
        assert!((n.dpsi - expected).abs() < 1e-20);
        assert_eq!(n.deps, 0.0);
    }

    #[test]
    fn higher_powers_scale_with_t() {
        let psi = format!("j = 2\n{}", row(1, 0.0, 1_000.0, &[]));
        let eps = format!("j = 0\n{}", row(1, 0.0, 0.0, &[]));
        let series = NutationSeries::parse(&psi, &eps).unwrap();
        let n = series.evaluate(0.5);
        assert!((n.dpsi - 250.0 * MICROARCSEC_TO_RAD).abs() < 1e-20);
    }

    #[test]
    fn adjustment_matches_builtin_model() {
        let (psi, eps) = tables_2000b();
        let series = NutationSeries::parse(&psi, &eps).unwrap();
        let raw = series.evaluate(0.0);
        assert_eq!(series.nutation_2006(0.0).deps, raw.deps);
        assert!((series.nutation_2006(0.0).dpsi / raw.dpsi - 1.0 - 0.4697e-6).abs() < 1e-15);
    }

    #[test]
    fn malformed_rows_report_their_line() {
        let good = format!("j = 0\n{}", row(1, 1.0, 2.0, &[1]));
        let bad_amp = "title\nj = 0\n  1  1.0x  2.0  0 0 0 0 1 0 0 0 0 0 0 0 0 0\n";
        let err = NutationSeries::parse(bad_amp, &good).unwrap_err();
        assert!(matches!(err, FrameError::SeriesParse { line: 3, .. }));

        let bad_mult = "j = 0\n  1  1.0  2.0  0 0 0 0 999 0 0 0 0 0 0 0 0 0\n";
        let err = NutationSeries::parse(&good, bad_mult).unwrap_err();
        assert!(matches!(err, FrameError::SeriesParse { line: 2, .. }));

        let err = NutationSeries::parse(&good, "j = one\n").unwrap_err();
        assert!(matches!(err, FrameError::SeriesParse { line: 1, .. }));
    }

    #[test]
    fn empty_table_rejected() {
        let good = format!("j = 0\n{}", row(1, 1.0, 2.0, &[1]));
        let err = NutationSeries::parse(&good, "Table 5.3b\n\n----\n").unwrap_err();
        assert!(matches!(err, FrameError::SeriesParse { line: 0, .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let missing = Path::new("/nonexistent/tab5.3a.txt");
        let err = NutationSeries::load(missing, missing).unwrap_err();
        assert!(matches!(err, FrameError::Io(_)));
    }
}
