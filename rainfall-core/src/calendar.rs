//! Temporal group keys and the fixed 365-slot day-of-year calendar.
//!
//! Rasters are bucketed for averaging by a [`GroupKey`]: either the calendar
//! month (1-12) or a day-of-year slot. Day-of-year slots are zero-based
//! (Jan 1 = 0) and leap-normalized so that a given calendar date maps to the
//! same slot in every year:
//!
//! - February 29 is dropped entirely before grouping.
//! - In a leap year, raw day-of-year values greater than 58 (i.e. dates after
//!   February 28) are decremented by one.
//!
//! Every year therefore contributes exactly 365 slots, 0 through 364.

use crate::errors::{RainfallError, RainfallResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Last day-of-year slot unaffected by the leap shift (February 28, zero-based).
pub const LEAP_SHIFT_THRESHOLD: u32 = 58;

/// Number of day-of-year slots after leap normalization.
pub const SLOTS_PER_YEAR: u32 = 365;

/// How rasters are assigned a group key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyScheme {
    /// Calendar month, 1-12.
    Month,
    /// Leap-adjusted day-of-year slot, 0-364.
    DayOfYear,
}

/// Integer label used to bucket rasters for averaging.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupKey {
    Month(u32),
    DayOfYear(u32),
}

impl GroupKey {
    /// The raw integer value of the key, independent of scheme.
    pub fn value(&self) -> u32 {
        match self {
            GroupKey::Month(m) => *m,
            GroupKey::DayOfYear(d) => *d,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Month(m) => write!(f, "month {}", m),
            GroupKey::DayOfYear(d) => write!(f, "doy {}", d),
        }
    }
}

/// Whether `year` is a leap year in the proleptic Gregorian calendar.
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Zero-based ordinal day within the year (Jan 1 = 0), unadjusted.
pub fn day_of_year(year: i32, month: u32, day: u32) -> RainfallResult<u32> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(RainfallError::InvalidDate { year, month, day })?;
    Ok(date.ordinal0())
}

/// Leap-adjusted day-of-year slot for a calendar date.
///
/// February 29 has no slot and is rejected; callers drop leap days before
/// assigning keys.
pub fn adjusted_day_of_year(year: i32, month: u32, day: u32) -> RainfallResult<u32> {
    if month == 2 && day == 29 {
        return Err(RainfallError::InvalidDate { year, month, day });
    }
    let raw = day_of_year(year, month, day)?;
    if is_leap_year(year) && raw > LEAP_SHIFT_THRESHOLD {
        Ok(raw - 1)
    } else {
        Ok(raw)
    }
}
