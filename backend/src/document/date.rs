//! Spreadsheet date serials (1900 date system).
//!
//! Serial 1 is 1900-01-01. Serials from 61 on are offset by the phantom
//! 1900-02-29 that spreadsheets count, so they are measured from 1899-12-30.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// First serial counted after the phantom leap day.
const LEAP_BUG_SERIAL: f64 = 61.0;

fn epoch(before_leap_bug: bool) -> Option<NaiveDateTime> {
    let day = if before_leap_bug { 31 } else { 30 };
    NaiveDate::from_ymd_opt(1899, 12, day).and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn leap_bug_cutoff() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1900, 3, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Interpret a serial as a calendar date-time, to the millisecond.
///
/// Returns `None` for negative or non-finite serials and for values past
/// what `chrono` can represent.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let base = epoch(serial < LEAP_BUG_SERIAL)?;
    let millis = (serial * MILLIS_PER_DAY).round();
    if millis > i64::MAX as f64 {
        return None;
    }
    let delta = TimeDelta::try_milliseconds(millis as i64)?;
    base.checked_add_signed(delta)
}

/// Serial of a calendar date-time.
pub fn datetime_to_serial(datetime: NaiveDateTime) -> f64 {
    let before_leap_bug = leap_bug_cutoff().is_some_and(|cutoff| datetime < cutoff);
    match epoch(before_leap_bug) {
        Some(base) => (datetime - base).num_milliseconds() as f64 / MILLIS_PER_DAY,
        None => 0.0,
    }
}
