//! TT ↔ TAI ↔ UTC conversions on two-part Julian dates.
//!
//! UTC is represented the quasi-JD way: days with a leap second are
//! stretched so that the fraction still runs 0..1 over the whole day.

use crate::error::TimeError;
use crate::julian::{JulianDate, MJD_ZERO, SECONDS_PER_DAY, calendar_to_mjd, split_to_calendar};
use crate::leap::LeapSecondTable;
use crate::{DateQuality, Qualified};

/// TT − TAI in seconds.
pub const TT_MINUS_TAI_S: f64 = 32.184;

const TT_MINUS_TAI_DAYS: f64 = TT_MINUS_TAI_S / SECONDS_PER_DAY;

/// Number of fixed-point refinements in [`tai_to_utc`].
const UTC_ITERATIONS: usize = 3;

/// TT → TAI. Fails only on non-finite input.
pub fn tt_to_tai(tt: JulianDate) -> Result<JulianDate, TimeError> {
    if !tt.is_finite() {
        return Err(TimeError::NonFiniteDate);
    }
    Ok(tt.add_days(-TT_MINUS_TAI_DAYS))
}

/// TAI → TT. Fails only on non-finite input.
pub fn tai_to_tt(tai: JulianDate) -> Result<JulianDate, TimeError> {
    if !tai.is_finite() {
        return Err(TimeError::NonFiniteDate);
    }
    Ok(tai.add_days(TT_MINUS_TAI_DAYS))
}

/// Split into (larger, smaller) magnitude parts, remembering the order.
fn by_magnitude(date: JulianDate) -> (f64, f64, bool) {
    if date.jd1.abs() >= date.jd2.abs() {
        (date.jd1, date.jd2, false)
    } else {
        (date.jd2, date.jd1, true)
    }
}

fn restore_order(big: f64, small: f64, swapped: bool) -> JulianDate {
    if swapped {
        JulianDate::new(small, big)
    } else {
        JulianDate::new(big, small)
    }
}

fn worst(a: DateQuality, b: DateQuality) -> DateQuality {
    if a.is_dubious() || b.is_dubious() {
        DateQuality::Dubious
    } else {
        DateQuality::Reliable
    }
}

/// UTC → TAI.
///
/// ΔAT is taken at 0h of the UTC day. On a day that ends with a leap
/// second (or, before 1972, a drift step) the day fraction is rescaled to
/// the true length of the day.
pub fn utc_to_tai(
    utc: JulianDate,
    table: &LeapSecondTable,
) -> Result<Qualified<JulianDate>, TimeError> {
    let (u1, u2, swapped) = by_magnitude(utc);

    let (year, month, day, mut fraction) = split_to_calendar(JulianDate::new(u1, u2))?;
    let dat0 = table.delta_at(year, month, day, 0.0)?;
    let dat12 = table.delta_at(year, month, day, 0.5)?;

    let (next_year, next_month, next_day, _) =
        split_to_calendar(JulianDate::new(u1 + 1.5, u2 - fraction))?;
    let dat24 = table.delta_at(next_year, next_month, next_day, 0.0)?;

    // Length-of-day change from drift, and any step at midnight.
    let dlod = 2.0 * (dat12.value - dat0.value);
    let dleap = dat24.value - (dat0.value + dlod);

    fraction *= (SECONDS_PER_DAY + dleap) / SECONDS_PER_DAY;
    fraction *= (SECONDS_PER_DAY + dlod) / SECONDS_PER_DAY;

    let day_start = calendar_to_mjd(year, month, day)?;
    let small = ((MJD_ZERO - u1) + day_start) + fraction + dat0.value / SECONDS_PER_DAY;

    let quality = worst(worst(dat0.quality, dat12.quality), dat24.quality);
    Ok(Qualified::new(restore_order(u1, small, swapped), quality))
}

/// TAI → UTC by fixed-point iteration of [`utc_to_tai`].
pub fn tai_to_utc(
    tai: JulianDate,
    table: &LeapSecondTable,
) -> Result<Qualified<JulianDate>, TimeError> {
    if !tai.is_finite() {
        return Err(TimeError::NonFiniteDate);
    }
    let (a1, a2, swapped) = by_magnitude(tai);

    let mut u2 = a2;
    let mut quality = DateQuality::Reliable;
    for _ in 0..UTC_ITERATIONS {
        let guess = utc_to_tai(JulianDate::new(a1, u2), table)?;
        u2 += a1 - guess.value.jd1;
        u2 += a2 - guess.value.jd2;
        quality = guess.quality;
    }

    Ok(Qualified::new(restore_order(a1, u2, swapped), quality))
}

/// TT → UTC, the chain used to key EOP lookups.
pub fn tt_to_utc(
    tt: JulianDate,
    table: &LeapSecondTable,
) -> Result<Qualified<JulianDate>, TimeError> {
    tai_to_utc(tt_to_tai(tt)?, table)
}

/// UTC → TT.
pub fn utc_to_tt(
    utc: JulianDate,
    table: &LeapSecondTable,
) -> Result<Qualified<JulianDate>, TimeError> {
    let tai = utc_to_tai(utc, table)?;
    Ok(Qualified::new(tai_to_tt(tai.value)?, tai.quality))
}
