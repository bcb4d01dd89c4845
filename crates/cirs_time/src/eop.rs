//! IERS Earth Orientation Parameters: polar motion, UT1−UTC and celestial
//! pole offsets.
//!
//! Parses the IERS finals2000A fixed-width format and interpolates linearly
//! between daily rows. Only the Bulletin A columns are read.
//!
//! Data file: IERS finals2000A.all (public domain), from
//! <https://datacenter.iers.org/> or <https://maia.usno.navy.mil/ser7/>.
//!
//! Relevant columns (1-indexed):
//! - Col   8-15: Modified Julian Date (F8.2)
//! - Col  19-27: polar motion x (arcsec, F9.6)
//! - Col  38-46: polar motion y (arcsec, F9.6)
//! - Col  59-68: UT1−UTC (seconds, F10.7)
//! - Col  98-106: dX w.r.t. IAU 2000A (milliarcseconds, F9.3)
//! - Col 117-125: dY w.r.t. IAU 2000A (milliarcseconds, F9.3)

use std::f64::consts::PI;
use std::path::Path;

use crate::error::TimeError;
use crate::julian::JulianDate;

const ARCSEC_TO_RAD: f64 = PI / (180.0 * 3600.0);
const MAS_TO_RAD: f64 = ARCSEC_TO_RAD / 1000.0;

/// One daily row of the EOP table, in file units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EopRecord {
    pub mjd: f64,
    /// Polar motion x, arcseconds.
    pub x_pole: f64,
    /// Polar motion y, arcseconds.
    pub y_pole: f64,
    /// UT1 − UTC, seconds.
    pub dut1: f64,
    /// Celestial pole offset dX, milliarcseconds. Absent on rows past the
    /// end of the published series.
    pub dx: Option<f64>,
    /// Celestial pole offset dY, milliarcseconds.
    pub dy: Option<f64>,
}

impl EopRecord {
    fn lerp(&self, other: &Self, frac: f64, mjd: f64) -> Self {
        let mix = |a: f64, b: f64| a + frac * (b - a);
        let mix_opt = |a: Option<f64>, b: Option<f64>| Some(mix(a?, b?));
        Self {
            mjd,
            x_pole: mix(self.x_pole, other.x_pole),
            y_pole: mix(self.y_pole, other.y_pole),
            dut1: mix(self.dut1, other.dut1),
            dx: mix_opt(self.dx, other.dx),
            dy: mix_opt(self.dy, other.dy),
        }
    }

    /// The record as an [`EopResponse`] in radians.
    pub fn to_response(&self) -> EopResponse {
        EopResponse {
            x_pole: self.x_pole * ARCSEC_TO_RAD,
            y_pole: self.y_pole * ARCSEC_TO_RAD,
            dx: self.dx.map(|v| v * MAS_TO_RAD),
            dy: self.dy.map(|v| v * MAS_TO_RAD),
        }
    }
}

/// Earth orientation at one UTC instant, angles in radians.
///
/// `dx`/`dy` are optional because a source may not publish them for every
/// date; consumers decide whether a missing offset is acceptable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EopResponse {
    pub x_pole: f64,
    pub y_pole: f64,
    pub dx: Option<f64>,
    pub dy: Option<f64>,
}

impl EopResponse {
    /// Response carrying only celestial pole offsets.
    pub fn pole_offsets(dx: f64, dy: f64) -> Self {
        Self {
            x_pole: 0.0,
            y_pole: 0.0,
            dx: Some(dx),
            dy: Some(dy),
        }
    }
}

/// Source of Earth orientation parameters keyed by UTC date.
pub trait EopProvider: Send + Sync {
    fn lookup(&self, utc: JulianDate) -> Result<EopResponse, TimeError>;
}

impl<F> EopProvider for F
where
    F: Fn(JulianDate) -> Result<EopResponse, TimeError> + Send + Sync,
{
    fn lookup(&self, utc: JulianDate) -> Result<EopResponse, TimeError> {
        self(utc)
    }
}

/// Provider that answers every date with the same response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedEop(pub EopResponse);

impl EopProvider for FixedEop {
    fn lookup(&self, _utc: JulianDate) -> Result<EopResponse, TimeError> {
        Ok(self.0)
    }
}

/// Fixed-width field, 1-indexed inclusive columns; `None` when blank,
/// short or unparseable.
fn column(line: &str, first: usize, last: usize) -> Option<f64> {
    line.get(first - 1..last)?.trim().parse().ok()
}

/// Parsed EOP table, sorted by MJD.
#[derive(Debug, Clone)]
pub struct EopData {
    records: Vec<EopRecord>,
}

impl EopData {
    /// Parse IERS finals2000A fixed-width text.
    ///
    /// Rows without MJD, polar motion or UT1−UTC are skipped. Rows with
    /// those but without dX/dY are kept with the offsets absent.
    pub fn parse_finals(content: &str) -> Result<Self, TimeError> {
        let mut records: Vec<EopRecord> = content
            .lines()
            .filter_map(|line| {
                Some(EopRecord {
                    mjd: column(line, 8, 15)?,
                    x_pole: column(line, 19, 27)?,
                    y_pole: column(line, 38, 46)?,
                    dut1: column(line, 59, 68)?,
                    dx: column(line, 98, 106),
                    dy: column(line, 117, 125),
                })
            })
            .collect();

        if records.is_empty() {
            return Err(TimeError::EopParse("no valid EOP rows found".to_string()));
        }

        records.sort_by(|a, b| a.mjd.total_cmp(&b.mjd));
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EopRecord] {
        &self.records
    }

    /// MJD range covered by the table: (first, last).
    pub fn range(&self) -> (f64, f64) {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => (first.mjd, last.mjd),
            _ => (f64::NAN, f64::NAN),
        }
    }

    /// All fields at `mjd`, linearly interpolated between daily rows.
    pub fn at_mjd(&self, mjd: f64) -> Result<EopRecord, TimeError> {
        let (start, end) = self.range();
        if !(start..=end).contains(&mjd) {
            return Err(TimeError::EopOutOfRange { mjd });
        }

        let idx = self
            .records
            .partition_point(|r| r.mjd < mjd)
            .saturating_sub(1);
        let lo = &self.records[idx];
        let Some(hi) = self.records.get(idx + 1) else {
            return Ok(*lo);
        };
        if hi.mjd - lo.mjd < 1e-12 {
            return Ok(*lo);
        }
        Ok(lo.lerp(hi, (mjd - lo.mjd) / (hi.mjd - lo.mjd), mjd))
    }

    /// DUT1 (UT1−UTC) in seconds at `mjd`.
    pub fn dut1_at_mjd(&self, mjd: f64) -> Result<f64, TimeError> {
        Ok(self.at_mjd(mjd)?.dut1)
    }
}

/// A loaded finals2000A file, usable as an [`EopProvider`].
#[derive(Debug, Clone)]
pub struct EopKernel {
    data: EopData,
}

impl EopKernel {
    /// Load a finals2000A file from disk.
    pub fn load(path: &Path) -> Result<Self, TimeError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse finals2000A text.
    pub fn parse(content: &str) -> Result<Self, TimeError> {
        let data = EopData::parse_finals(content)?;
        let (start, end) = data.range();
        log::debug!("EOP table: {} rows, MJD {start}..{end}", data.len());
        Ok(Self { data })
    }

    pub fn data(&self) -> &EopData {
        &self.data
    }
}

impl EopProvider for EopKernel {
    fn lookup(&self, utc: JulianDate) -> Result<EopResponse, TimeError> {
        Ok(self.data.at_mjd(utc.mjd())?.to_response())
    }
}
