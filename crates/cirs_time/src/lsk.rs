//! NAIF Leapseconds Kernel (LSK) reader.
//!
//! Only the two variables that matter for TT/TAI/UTC are extracted from the
//! `\begindata` blocks: `DELTET/DELTA_T_A` (TT − TAI) and the
//! `DELTET/DELTA_AT` pairs of ΔAT and effective date.
//!
//! Reference: NAIF Time Required Reading (public domain).

use std::collections::HashMap;

use crate::error::TimeError;
use crate::julian::{MJD_ZERO, calendar_to_jd, month_from_abbrev};

/// Leap-second data read from an LSK file.
#[derive(Debug, Clone, PartialEq)]
pub struct LskData {
    /// TT − TAI in seconds.
    pub delta_t_a: f64,
    /// `(ΔAT seconds, MJD of 0h UTC on the effective date)`, ascending.
    pub leap_seconds: Vec<(f64, f64)>,
}

/// Parse an LSK from its text content.
pub fn parse_lsk(content: &str) -> Result<LskData, TimeError> {
    let pool = parse_kernel_pool(&data_lines(content)?)?;

    let delta_t_a = scalar(&pool, "DELTET/DELTA_T_A")?;
    let flat = pool
        .get("DELTET/DELTA_AT")
        .ok_or_else(|| TimeError::LskParse("missing DELTET/DELTA_AT".into()))?;
    if flat.is_empty() || flat.len() % 2 != 0 {
        return Err(TimeError::LskParse(
            "DELTET/DELTA_AT must hold (delta, date) pairs".into(),
        ));
    }

    let mut leap_seconds: Vec<(f64, f64)> =
        flat.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect();
    leap_seconds.sort_by(|a, b| a.1.total_cmp(&b.1));

    log::debug!("LSK: {} leap-second entries", leap_seconds.len());
    Ok(LskData {
        delta_t_a,
        leap_seconds,
    })
}

type KernelPool = HashMap<String, Vec<f64>>;

/// Lines inside `\begindata` ... `\begintext` blocks.
fn data_lines(content: &str) -> Result<Vec<&str>, TimeError> {
    let mut in_data = false;
    let mut lines = Vec::new();
    for line in content.lines() {
        match line.trim() {
            t if t.eq_ignore_ascii_case("\\begindata") => in_data = true,
            t if t.eq_ignore_ascii_case("\\begintext") => in_data = false,
            t if in_data && !t.is_empty() => lines.push(t),
            _ => {}
        }
    }
    if lines.is_empty() {
        return Err(TimeError::LskParse("no \\begindata section found".into()));
    }
    Ok(lines)
}

/// Collect `NAME = value` and `NAME = ( v1 v2 ... )` assignments, where an
/// array may continue over several lines.
fn parse_kernel_pool(lines: &[&str]) -> Result<KernelPool, TimeError> {
    let mut pool = KernelPool::new();
    let mut current: Option<String> = None;
    let mut open_paren = false;

    for line in lines {
        let rhs = match line.split_once('=') {
            Some((name, rhs)) => {
                let name = name.trim().to_string();
                pool.insert(name.clone(), Vec::new());
                current = Some(name);
                let rhs = rhs.trim();
                open_paren = rhs.starts_with('(');
                rhs.trim_start_matches('(')
            }
            None if open_paren => line,
            None => continue,
        };

        let rhs = match rhs.trim_end().strip_suffix(')') {
            Some(inner) => {
                open_paren = false;
                inner
            }
            None => rhs,
        };

        if let Some(values) = current.as_ref().and_then(|name| pool.get_mut(name)) {
            parse_values(rhs, values)?;
        }
    }
    Ok(pool)
}

/// Numbers (with Fortran `D` exponents) and `@YYYY-MON-DD` date literals.
fn parse_values(text: &str, out: &mut Vec<f64>) -> Result<(), TimeError> {
    for token in text.split([' ', ',', '\t']).filter(|t| !t.is_empty()) {
        let value = match token.strip_prefix('@') {
            Some(date) => date_literal_mjd(date)?,
            None => token
                .replace(['D', 'd'], "E")
                .parse()
                .map_err(|e| TimeError::LskParse(format!("bad number '{token}': {e}")))?,
        };
        out.push(value);
    }
    Ok(())
}

/// MJD of a NAIF date literal such as `1972-JAN-1`.
fn date_literal_mjd(s: &str) -> Result<f64, TimeError> {
    let bad = || TimeError::LskParse(format!("bad date literal @{s}"));
    let mut parts = s.splitn(3, '-');
    let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(bad());
    };
    let year: i32 = y.parse().map_err(|_| bad())?;
    let month = month_from_abbrev(m).ok_or_else(bad)?;
    let day: f64 = d.parse().map_err(|_| bad())?;
    Ok(calendar_to_jd(year, month, day) - MJD_ZERO)
}

fn scalar(pool: &KernelPool, name: &str) -> Result<f64, TimeError> {
    pool.get(name)
        .and_then(|v| v.first().copied())
        .ok_or_else(|| TimeError::LskParse(format!("missing {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LSK: &str = r#"
\begintext
Leap seconds kernel excerpt.
\begindata

DELTET/DELTA_T_A       =   32.184
DELTET/K               =    1.657D-3
DELTET/M               = (  6.239996   1.99096871D-7  )

DELTET/DELTA_AT        = ( 10,   @1972-JAN-1
                           11,   @1972-JUL-1
                           37,   @2017-JAN-1  )

\begintext
"#;

    #[test]
    fn parse_sample_lsk() {
        let data = parse_lsk(SAMPLE_LSK).unwrap();
        assert_eq!(data.delta_t_a, 32.184);
        assert_eq!(data.leap_seconds.len(), 3);
        assert_eq!(data.leap_seconds[0], (10.0, 41_317.0));
        assert_eq!(data.leap_seconds[1], (11.0, 41_499.0));
        assert_eq!(data.leap_seconds[2], (37.0, 57_754.0));
    }

    #[test]
    fn fortran_exponent() {
        let mut out = Vec::new();
        parse_values("1.657D-3 2d2", &mut out).unwrap();
        assert_eq!(out, vec![1.657e-3, 200.0]);
    }

    #[test]
    fn missing_data_section() {
        assert!(matches!(
            parse_lsk("\\begintext\nnothing here\n"),
            Err(TimeError::LskParse(_))
        ));
    }

    #[test]
    fn odd_delta_at_rejected() {
        let text = "\\begindata\nDELTET/DELTA_T_A = 32.184\nDELTET/DELTA_AT = ( 10, @1972-JAN-1, 11 )\n";
        assert!(parse_lsk(text).is_err());
    }

    #[test]
    fn bad_date_literal() {
        assert!(date_literal_mjd("1972-FOO-1").is_err());
        assert!(date_literal_mjd("1972").is_err());
    }
}
