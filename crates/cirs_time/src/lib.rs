//! Time scales and Earth orientation data for the CIRS → GCRS transform.
//!
//! This crate provides:
//! - two-part Julian dates and Gregorian calendar conversions
//! - the ΔAT leap-second table, optionally extended from a NAIF LSK
//! - the TT ↔ TAI ↔ UTC chain with reliable/dubious date quality
//! - IERS finals2000A parsing and the [`EopProvider`] seam

pub mod eop;
pub mod error;
pub mod julian;
pub mod leap;
pub mod lsk;
pub mod scales;
pub mod utc_time;

pub use eop::{EopData, EopKernel, EopProvider, EopRecord, EopResponse, FixedEop};
pub use error::TimeError;
pub use julian::{
    DAYS_PER_JULIAN_CENTURY, J2000_JD, JulianDate, MJD_ZERO, SECONDS_PER_DAY, calendar_to_jd,
    calendar_to_mjd, split_to_calendar,
};
pub use leap::{LeapEntry, LeapSecondTable};
pub use lsk::LskData;
pub use scales::{TT_MINUS_TAI_S, tai_to_tt, tai_to_utc, tt_to_tai, tt_to_utc, utc_to_tai, utc_to_tt};
pub use utc_time::UtcTime;

/// How far a converted date can be trusted.
///
/// `Dubious` means the date lies beyond the horizon of the leap-second
/// table: the answer uses the last known ΔAT and may be off by whole
/// seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateQuality {
    #[default]
    Reliable,
    Dubious,
}

impl DateQuality {
    pub fn is_dubious(self) -> bool {
        self == Self::Dubious
    }
}

/// A value tagged with the quality of the date it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Qualified<T> {
    pub value: T,
    pub quality: DateQuality,
}

impl<T> Qualified<T> {
    pub fn new(value: T, quality: DateQuality) -> Self {
        Self { value, quality }
    }

    pub fn reliable(value: T) -> Self {
        Self::new(value, DateQuality::Reliable)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Qualified<U> {
        Qualified::new(f(self.value), self.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_map_keeps_quality() {
        let q = Qualified::new(2.0_f64, DateQuality::Dubious).map(|v| v * 2.0);
        assert_eq!(q.value, 4.0);
        assert!(q.quality.is_dubious());
        assert!(!Qualified::reliable(1).quality.is_dubious());
    }
}
