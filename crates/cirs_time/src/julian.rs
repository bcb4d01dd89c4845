//! Two-part Julian dates and Gregorian calendar conversions.
//!
//! Dates are carried as `jd1 + jd2` so that the fractional day keeps full
//! precision when one part holds the large day number. Calendar arithmetic
//! uses the integer algorithm of Fliegel & Van Flandern (1968), valid for
//! every Gregorian date from −4799-03-01 onward.

use crate::error::TimeError;

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Offset between Julian Date and Modified Julian Date.
pub const MJD_ZERO: f64 = 2_400_000.5;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Earliest Julian Date accepted by [`split_to_calendar`].
const JD_MIN: f64 = -68_569.5;
/// Latest Julian Date accepted by [`split_to_calendar`].
const JD_MAX: f64 = 1e9;

/// A Julian Date split into two parts; the represented date is `jd1 + jd2`.
///
/// Any split is allowed. Conversions that shift the date (for example
/// TT → TAI) adjust the part with the smaller magnitude so the day number
/// held in the larger part stays exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JulianDate {
    pub jd1: f64,
    pub jd2: f64,
}

impl JulianDate {
    pub const fn new(jd1: f64, jd2: f64) -> Self {
        Self { jd1, jd2 }
    }

    /// Single-part Julian Date.
    pub const fn from_jd(jd: f64) -> Self {
        Self::new(jd, 0.0)
    }

    /// Modified Julian Date, stored as `(2400000.5, mjd)`.
    pub const fn from_mjd(mjd: f64) -> Self {
        Self::new(MJD_ZERO, mjd)
    }

    /// J2000.0.
    pub const fn j2000() -> Self {
        Self::new(J2000_JD, 0.0)
    }

    /// The date as a single `f64` (loses precision below ~20 µs).
    pub fn total(self) -> f64 {
        self.jd1 + self.jd2
    }

    /// Modified Julian Date.
    pub fn mjd(self) -> f64 {
        (self.jd1 - MJD_ZERO) + self.jd2
    }

    /// Julian centuries since J2000.0.
    pub fn centuries_since_j2000(self) -> f64 {
        ((self.jd1 - J2000_JD) + self.jd2) / DAYS_PER_JULIAN_CENTURY
    }

    pub fn is_finite(self) -> bool {
        self.jd1.is_finite() && self.jd2.is_finite()
    }

    /// Shift the date by `days`, applied to the smaller-magnitude part.
    pub fn add_days(self, days: f64) -> Self {
        if self.jd1.abs() > self.jd2.abs() {
            Self::new(self.jd1, self.jd2 + days)
        } else {
            Self::new(self.jd1 + days, self.jd2)
        }
    }
}

impl std::fmt::Display for JulianDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JD {} + {}", self.jd1, self.jd2)
    }
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a Gregorian month, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    const DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let idx = month.checked_sub(1)? as usize;
    let base = *DAYS.get(idx)?;
    if month == 2 && is_leap_year(i64::from(year)) {
        Some(29)
    } else {
        Some(base)
    }
}

/// Integer MJD of 0h on a Gregorian date. Division truncates toward zero.
fn civil_to_mjd(year: i64, month: i64, day: i64) -> i64 {
    let my = (month - 14) / 12;
    let iypmy = year + my;
    (1461 * (iypmy + 4800)) / 4 + (367 * (month - 2 - 12 * my)) / 12
        - (3 * ((iypmy + 4900) / 100)) / 4
        + day
        - 2_432_076
}

/// Modified Julian Date at 0h of a Gregorian calendar date.
///
/// Rejects years before −4799, months outside 1–12 and days outside the
/// month.
pub fn calendar_to_mjd(year: i32, month: u32, day: u32) -> Result<f64, TimeError> {
    let invalid = TimeError::InvalidCalendar { year, month, day };
    if year < -4799 {
        return Err(invalid);
    }
    let ndays = days_in_month(year, month).ok_or(invalid.clone())?;
    if day < 1 || day > ndays {
        return Err(invalid);
    }
    Ok(civil_to_mjd(i64::from(year), i64::from(month), i64::from(day)) as f64)
}

/// Julian Date of a calendar date with fractional day (`day = 1.5` is noon
/// on the first). Fields are not validated.
pub fn calendar_to_jd(year: i32, month: u32, day: f64) -> f64 {
    let whole = day.floor();
    let mjd = civil_to_mjd(i64::from(year), i64::from(month), whole as i64) as f64;
    MJD_ZERO + mjd + (day - whole)
}

/// Gregorian calendar date and day fraction of a two-part Julian Date.
///
/// Returns `(year, month, day, fraction)` with `0 <= fraction < 1`.
pub fn split_to_calendar(date: JulianDate) -> Result<(i32, u32, u32, f64), TimeError> {
    if !date.is_finite() {
        return Err(TimeError::NonFiniteDate);
    }
    let jd = date.total();
    if !(JD_MIN..=JD_MAX).contains(&jd) {
        return Err(TimeError::DateOutOfRange { jd });
    }

    // Separate each part into whole days and a fraction in [-0.5, 0.5].
    let d1 = date.jd1.round();
    let d2 = date.jd2.round();
    let mut day_number = d1 as i64 + d2 as i64;
    let mut frac = 0.5 + (date.jd1 - d1) + (date.jd2 - d2);
    while frac < 0.0 {
        frac += 1.0;
        day_number -= 1;
    }
    while frac >= 1.0 {
        frac -= 1.0;
        day_number += 1;
    }

    let mut l = day_number + 68_569;
    let n = (4 * l) / 146_097;
    l -= (146_097 * n + 3) / 4;
    let i = (4000 * (l + 1)) / 1_461_001;
    l -= (1461 * i) / 4 - 31;
    let k = (80 * l) / 2447;
    let day = l - (2447 * k) / 80;
    l = k / 11;
    let month = k + 2 - 12 * l;
    let year = 100 * (n - 49) + i + l;

    Ok((year as i32, month as u32, day as u32, frac))
}

/// Month number (1–12) from a three-letter English abbreviation.
pub fn month_from_abbrev(abbrev: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    ];
    let upper = abbrev.to_ascii_uppercase();
    MONTHS
        .iter()
        .position(|m| *m == upper)
        .map(|idx| idx as u32 + 1)
}
