//! ΔAT (TAI − UTC) lookup.
//!
//! The built-in table runs from 1960-01-01 to the 2017-01-01 leap second.
//! Entries before 1972 carry the linear drift terms of the original
//! "rubber second" UTC definition.

use std::path::Path;

use crate::error::TimeError;
use crate::julian::{JulianDate, calendar_to_mjd, split_to_calendar};
use crate::lsk::{LskData, parse_lsk};
use crate::{DateQuality, Qualified};

/// Last year the built-in table is known to be complete.
pub const BUILTIN_VALIDITY_YEAR: i32 = 2024;

/// Dates more than this many years past the validity year are dubious.
const DUBIOUS_MARGIN_YEARS: i32 = 5;

/// First month of integer leap seconds; earlier entries use drift terms.
const INTEGER_ERA: (i32, u32) = (1972, 1);

/// One step of the ΔAT table, effective from 0h UTC on the first of the month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeapEntry {
    pub year: i32,
    pub month: u32,
    /// TAI − UTC in seconds (at the drift reference epoch for pre-1972 entries).
    pub delta_at: f64,
    /// `(reference MJD, seconds per day)` for pre-1972 entries.
    pub drift: Option<(f64, f64)>,
}

const fn step(year: i32, month: u32, delta_at: f64) -> LeapEntry {
    LeapEntry {
        year,
        month,
        delta_at,
        drift: None,
    }
}

const fn drifting(year: i32, month: u32, delta_at: f64, mjd: f64, rate: f64) -> LeapEntry {
    LeapEntry {
        year,
        month,
        delta_at,
        drift: Some((mjd, rate)),
    }
}

#[rustfmt::skip]
const BUILTIN: [LeapEntry; 42] = [
    drifting(1960, 1, 1.417_818_0, 37_300.0, 0.001_296_0),
    drifting(1961, 1, 1.422_818_0, 37_300.0, 0.001_296_0),
    drifting(1961, 8, 1.372_818_0, 37_300.0, 0.001_296_0),
    drifting(1962, 1, 1.845_858_0, 37_665.0, 0.001_123_2),
    drifting(1963, 11, 1.945_858_0, 37_665.0, 0.001_123_2),
    drifting(1964, 1, 3.240_130_0, 38_761.0, 0.001_296_0),
    drifting(1964, 4, 3.340_130_0, 38_761.0, 0.001_296_0),
    drifting(1964, 9, 3.440_130_0, 38_761.0, 0.001_296_0),
    drifting(1965, 1, 3.540_130_0, 38_761.0, 0.001_296_0),
    drifting(1965, 3, 3.640_130_0, 38_761.0, 0.001_296_0),
    drifting(1965, 7, 3.740_130_0, 38_761.0, 0.001_296_0),
    drifting(1965, 9, 3.840_130_0, 38_761.0, 0.001_296_0),
    drifting(1966, 1, 4.313_170_0, 39_126.0, 0.002_592_0),
    drifting(1968, 2, 4.213_170_0, 39_126.0, 0.002_592_0),
    step(1972, 1, 10.0),
    step(1972, 7, 11.0),
    step(1973, 1, 12.0),
    step(1974, 1, 13.0),
    step(1975, 1, 14.0),
    step(1976, 1, 15.0),
    step(1977, 1, 16.0),
    step(1978, 1, 17.0),
    step(1979, 1, 18.0),
    step(1980, 1, 19.0),
    step(1981, 7, 20.0),
    step(1982, 7, 21.0),
    step(1983, 7, 22.0),
    step(1985, 7, 23.0),
    step(1988, 1, 24.0),
    step(1990, 1, 25.0),
    step(1991, 1, 26.0),
    step(1992, 7, 27.0),
    step(1993, 7, 28.0),
    step(1994, 7, 29.0),
    step(1996, 1, 30.0),
    step(1997, 7, 31.0),
    step(1999, 1, 32.0),
    step(2006, 1, 33.0),
    step(2009, 1, 34.0),
    step(2012, 7, 35.0),
    step(2015, 7, 36.0),
    step(2017, 1, 37.0),
];

/// ΔAT table with its validity horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct LeapSecondTable {
    entries: Vec<LeapEntry>,
    validity_year: i32,
}

impl Default for LeapSecondTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LeapSecondTable {
    /// The compiled-in table.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN.to_vec(),
            validity_year: BUILTIN_VALIDITY_YEAR,
        }
    }

    /// Built-in pre-1972 entries followed by the integer leap seconds of
    /// an LSK.
    ///
    /// The validity year becomes the later of the built-in one and the
    /// year of the last LSK entry.
    pub fn from_lsk(data: &LskData) -> Result<Self, TimeError> {
        let mut entries: Vec<LeapEntry> = BUILTIN
            .iter()
            .copied()
            .filter(|e| e.drift.is_some())
            .collect();

        for &(delta_at, mjd) in &data.leap_seconds {
            let (year, month, day, _) = split_to_calendar(JulianDate::from_mjd(mjd))?;
            if day != 1 {
                return Err(TimeError::LskParse(format!(
                    "leap second on {year:04}-{month:02}-{day:02} is not on the first of a month"
                )));
            }
            if (year, month) < INTEGER_ERA {
                continue;
            }
            entries.push(step(year, month, delta_at));
        }

        let last_year = entries.last().map_or(BUILTIN_VALIDITY_YEAR, |e| e.year);
        Ok(Self {
            entries,
            validity_year: BUILTIN_VALIDITY_YEAR.max(last_year),
        })
    }

    /// Load a table from an LSK file on disk.
    pub fn load_lsk(path: &Path) -> Result<Self, TimeError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_lsk(&content)
    }

    /// Build a table from LSK text.
    pub fn parse_lsk(content: &str) -> Result<Self, TimeError> {
        Self::from_lsk(&parse_lsk(content)?)
    }

    pub fn entries(&self) -> &[LeapEntry] {
        &self.entries
    }

    pub fn validity_year(&self) -> i32 {
        self.validity_year
    }

    /// TAI − UTC in seconds for a UTC calendar date and day fraction.
    ///
    /// Years before the first entry are rejected; years far past the
    /// validity year are answered from the last entry but marked dubious.
    pub fn delta_at(
        &self,
        year: i32,
        month: u32,
        day: u32,
        fraction: f64,
    ) -> Result<Qualified<f64>, TimeError> {
        let mjd = calendar_to_mjd(year, month, day)?;
        if !(0.0..=1.0).contains(&fraction) {
            return Err(TimeError::InvalidDayFraction { fraction });
        }

        let key = (year, month);
        let idx = self
            .entries
            .partition_point(|e| (e.year, e.month) <= key)
            .checked_sub(1)
            .ok_or(TimeError::PreUtcDate { year })?;
        let entry = &self.entries[idx];

        let delta_at = match entry.drift {
            Some((mjd_ref, rate)) => entry.delta_at + (mjd + fraction - mjd_ref) * rate,
            None => entry.delta_at,
        };

        let quality = if year > self.validity_year + DUBIOUS_MARGIN_YEARS {
            DateQuality::Dubious
        } else {
            DateQuality::Reliable
        };
        Ok(Qualified::new(delta_at, quality))
    }
}
