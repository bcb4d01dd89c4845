//! UTC calendar date/time with sub-second precision.
//!
//! `UtcTime` parses and prints ISO-8601 (`2024-03-20T12:30:45.5Z`) and
//! converts to and from the two-part quasi-JD representation of UTC.

use std::str::FromStr;

use crate::error::TimeError;
use crate::julian::{JulianDate, MJD_ZERO, SECONDS_PER_DAY, calendar_to_mjd, split_to_calendar};
use crate::leap::LeapSecondTable;

/// UTC calendar date with sub-second precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtcTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl UtcTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Two-part UTC Julian Date `(2400000.5, mjd + fraction)`.
    ///
    /// On a day that ends with a leap second the fraction is computed over
    /// the longer day, so `23:59:60.5` is still inside the day.
    pub fn to_julian(&self, table: &LeapSecondTable) -> Result<JulianDate, TimeError> {
        let mjd = calendar_to_mjd(self.year, self.month, self.day)?;
        if self.hour > 23 || self.minute > 59 || !(0.0..61.0).contains(&self.second) {
            return Err(TimeError::InvalidCalendar {
                year: self.year,
                month: self.month,
                day: self.day,
            });
        }

        let day_length = day_length(table, self.year, self.month, self.day, mjd)?;
        let seconds = f64::from(self.hour * 3600 + self.minute * 60) + self.second;
        if seconds >= day_length {
            return Err(TimeError::InvalidCalendar {
                year: self.year,
                month: self.month,
                day: self.day,
            });
        }
        Ok(JulianDate::new(MJD_ZERO, mjd + seconds / day_length))
    }

    /// Calendar form of a two-part UTC Julian Date.
    ///
    /// The day fraction is scaled by the true length of that UTC day, so a
    /// date inside a leap second comes back as `23:59:60.x`. Seconds are
    /// rounded to the microsecond before the fields are split.
    pub fn from_julian(utc: JulianDate, table: &LeapSecondTable) -> Result<Self, TimeError> {
        let (year, month, day, frac) = split_to_calendar(utc)?;
        let mjd = calendar_to_mjd(year, month, day)?;
        let day_length = day_length(table, year, month, day, mjd)?;

        let micros = (frac * day_length * 1e6).round() as u64;
        if micros >= (day_length * 1e6).round() as u64 {
            let (year, month, day, _) = split_to_calendar(JulianDate::new(MJD_ZERO, mjd + 1.5))?;
            return Ok(Self::new(year, month, day, 0, 0, 0.0));
        }

        const HOUR: u64 = 3_600_000_000;
        const MINUTE: u64 = 60_000_000;
        // A leap second leaves the clock at 23:59 with 60 <= second < 61.
        let hour = (micros / HOUR).min(23);
        let minute = ((micros - hour * HOUR) / MINUTE).min(59);
        let second = (micros - hour * HOUR - minute * MINUTE) as f64 / 1e6;
        Ok(Self::new(year, month, day, hour as u32, minute as u32, second))
    }
}

/// Length in SI seconds of the UTC day starting at `mjd`.
fn day_length(
    table: &LeapSecondTable,
    year: i32,
    month: u32,
    day: u32,
    mjd: f64,
) -> Result<f64, TimeError> {
    let today = table.delta_at(year, month, day, 0.0)?.value;
    let (ny, nm, nd, _) = split_to_calendar(JulianDate::new(MJD_ZERO, mjd + 1.5))?;
    let tomorrow = table.delta_at(ny, nm, nd, 0.0)?.value;
    // Only whole-second steps lengthen the day.
    let step = tomorrow - today;
    Ok(if step.abs() >= 0.5 {
        SECONDS_PER_DAY + step
    } else {
        SECONDS_PER_DAY
    })
}

impl std::fmt::Display for UtcTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.second.trunc();
        if (self.second - whole).abs() < 1e-9 {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
                self.year, self.month, self.day, self.hour, self.minute, whole as u32
            )
        } else {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:09.6}Z",
                self.year, self.month, self.day, self.hour, self.minute, self.second
            )
        }
    }
}

impl FromStr for UtcTime {
    type Err = TimeError;

    /// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.fff][Z]` and a space in
    /// place of the `T`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TimeError::InvalidTimestamp(s.to_string());
        let s = s.trim();
        let s = s.strip_suffix('Z').unwrap_or(s);
        let (date, time) = match s.split_once(['T', ' ']) {
            Some((d, t)) => (d, Some(t)),
            None => (s, None),
        };

        let mut dparts = date.splitn(3, '-');
        let (Some(y), Some(mo), Some(d)) = (dparts.next(), dparts.next(), dparts.next()) else {
            return Err(bad());
        };
        let year: i32 = y.parse().map_err(|_| bad())?;
        let month: u32 = mo.parse().map_err(|_| bad())?;
        let day: u32 = d.parse().map_err(|_| bad())?;

        let (hour, minute, second) = match time {
            None => (0, 0, 0.0),
            Some(t) => {
                let mut tparts = t.splitn(3, ':');
                let (Some(h), Some(mi)) = (tparts.next(), tparts.next()) else {
                    return Err(bad());
                };
                let sec = match tparts.next() {
                    Some(sec) => sec.parse::<f64>().map_err(|_| bad())?,
                    None => 0.0,
                };
                (
                    h.parse::<u32>().map_err(|_| bad())?,
                    mi.parse::<u32>().map_err(|_| bad())?,
                    sec,
                )
            }
        };

        Ok(Self::new(year, month, day, hour, minute, second))
    }
}
