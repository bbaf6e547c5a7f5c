// src/tests/common.rs

//! Common values and helpers for tests.

#![allow(non_upper_case_globals)]

use crate::common::FPath;
use crate::data::datetime::{
    DateTimeL,
    FixedOffset,
    FormatOptions,
    TimeZone,
};

use ::lazy_static::lazy_static;

lazy_static! {
    pub static ref FO_0: FixedOffset = FixedOffset::east_opt(0).unwrap();
    pub static ref FO_P1: FixedOffset = FixedOffset::east_opt(3600).unwrap();
    pub static ref FO_M8: FixedOffset = FixedOffset::west_opt(8 * 3600).unwrap();
    /// a fixed "now" for tests of timestamps without a year
    pub static ref NOW_2024_06: DateTimeL = ymdhms(&FO_0, 2024, 6, 15, 12, 0, 0);
    /// a fixed "now" early in a year
    pub static ref NOW_2024_01: DateTimeL = ymdhms(&FO_0, 2024, 1, 2, 0, 0, 0);
}

/// Create a `DateTimeL`.
pub fn ymdhms(
    fo: &FixedOffset,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTimeL {
    fo.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}

/// Create a `DateTimeL` with milliseconds.
pub fn ymdhmsm(
    fo: &FixedOffset,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
    milli: i64,
) -> DateTimeL {
    ymdhms(fo, year, month, day, hour, min, sec) + chrono::Duration::milliseconds(milli)
}

/// `FormatOptions` with offset UTC and "now" [`NOW_2024_06`].
pub fn options_utc() -> FormatOptions {
    FormatOptions::new()
        .with_tz_offset(*FO_0)
        .with_now(*NOW_2024_06)
}

/// `Some(ymdhms(UTC, …))` for range bounds.
pub fn dt_opt(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> Option<DateTimeL> {
    Some(ymdhms(&FO_0, year, month, day, hour, min, sec))
}

/// The final path component of `path`.
pub fn basename(path: &FPath) -> FPath {
    let mut riter = path.rsplit(std::path::MAIN_SEPARATOR);

    FPath::from(riter.next().unwrap_or(""))
}
