// src/data/datetime.rs

//! Functions and structs to find a timestamp within a log line and transform
//! it to a chrono [`DateTime`] instance.
//!
//! Finding and decoding a timestamp requires:
//! 1. a [`Timecode`], a strftime-like pattern such as `"%b %d %X"` or the
//!    sentinel [`TIMECODE_TIMESTAMP`]
//! 2. transforming the `Timecode` into a regular expression where each
//!    directive (e.g. `%b`) is a named capture group
//! 3. searching a line for the regular expression and assembling the named
//!    captures into a [`DateTimeL`]
//!
//! A [`TimestampFormat`] does all three. When the `Timecode` of a log is not
//! known, [`TimestampFormat::detect`] tries each of the [`Timecodes`] in order
//! against a sample line.
//!
//! [`DateTime`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html

#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]

use std::collections::HashMap;
use std::fmt;

use crate::common::{FPath, LogscanError, Result, ResultS3};
use crate::debug::printers::buffer_to_String_noraw;

#[doc(hidden)]
pub use ::chrono::{
    DateTime,
    Datelike, // adds method `.year()` onto `DateTime`
    FixedOffset,
    Local,
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
    Offset,
    TimeZone,
    Utc,
};
use ::lazy_static::lazy_static;
use ::regex::bytes::{Captures, Regex};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Timecodes and their capture groups
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A _Year_ in a date
pub type Year = i32;

/// The datetime type used in _logscanlib_.
pub type DateTimeL = DateTime<FixedOffset>;
pub type DateTimeLOpt = Option<DateTimeL>;

/// strftime-like pattern describing how a timestamp is embedded in a line,
/// e.g. `"%Y-%m-%d %H:%M:%S"`. Or the sentinel [`TIMECODE_TIMESTAMP`].
pub type Timecode = String;
pub type Timecode_str = str;

/// Regular expression capture group pattern substituted for one directive.
pub type CaptureGroupPattern = str;

/// Sentinel `Timecode` for a Unix timestamp with three decimal places,
/// e.g. `1700000000.123`.
pub const TIMECODE_TIMESTAMP: &Timecode_str = "timestamp";

/// Built-in `Timecode`s in the order they are tried by
/// [`TimestampFormat::detect`].
pub const TIMECODES_DEFAULT: [&Timecode_str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%b %d %X %Y",
    "%b %d %X",
    TIMECODE_TIMESTAMP,
];

pub const CGP_YEAR: &CaptureGroupPattern = r"(?P<Y>[0-9]{4})";
pub const CGP_YEARy: &CaptureGroupPattern = r"(?P<y>[0-9]{2})";
pub const CGP_MONTHm: &CaptureGroupPattern = r"(?P<m>[0-9]{2})";
pub const CGP_MONTHb: &CaptureGroupPattern = r"(?P<b>[a-zA-Z]{3})";
pub const CGP_MONTHB: &CaptureGroupPattern = r"(?P<B>[a-zA-Z]{3,9})";
pub const CGP_DAYd: &CaptureGroupPattern = r"(?P<d>[ 0-9][0-9])";
pub const CGP_DAYe: &CaptureGroupPattern = r"(?P<e>[ 0-9]?[0-9])";
pub const CGP_DAYj: &CaptureGroupPattern = r"(?P<j>[0-9]{3})";
pub const CGP_WEEKDAYa: &CaptureGroupPattern = r"(?P<a>[a-zA-Z]{3})";
pub const CGP_WEEKDAYA: &CaptureGroupPattern = r"(?P<A>[a-zA-Z]{6,9})";
pub const CGP_WEEKDAYw: &CaptureGroupPattern = r"(?P<w>[0-9])";
pub const CGP_WEEKU: &CaptureGroupPattern = r"(?P<U>[0-9]{2})";
pub const CGP_WEEKW: &CaptureGroupPattern = r"(?P<W>[0-9]{2})";
pub const CGP_HOUR: &CaptureGroupPattern = r"(?P<H>[0-9]{2})";
pub const CGP_HOURI: &CaptureGroupPattern = r"(?P<I>[0-9]{2})";
pub const CGP_AMPM: &CaptureGroupPattern = r"(?P<p>[A-Z]{2})";
pub const CGP_MINUTE: &CaptureGroupPattern = r"(?P<M>[0-9]{2})";
pub const CGP_SECOND: &CaptureGroupPattern = r"(?P<S>[0-9]{2})";
pub const CGP_FRACTIONAL: &CaptureGroupPattern = r"(?P<f>[0-9]{1,9})";
pub const CGP_TZz: &CaptureGroupPattern = r"(?P<z>[+-][0-9]{4})";
/// locale date and time, e.g. `Thu Oct  5 10:00:00 2023`
pub const CGP_LOCALEc: &CaptureGroupPattern =
    r"(?P<c>[a-zA-Z]{3} [a-zA-Z]{3} [ 0-9][0-9] [0-9]{2}:[0-9]{2}:[0-9]{2} [0-9]{4})";
/// locale date, e.g. `10/05/23`
pub const CGP_LOCALEx: &CaptureGroupPattern = r"(?P<x>[0-9]{2}/[0-9]{2}/[0-9]{2})";
/// locale time, e.g. `10:00:00`
pub const CGP_LOCALEX: &CaptureGroupPattern = r"(?P<X>[0-9]{2}:[0-9]{2}:[0-9]{2})";
/// pattern for [`TIMECODE_TIMESTAMP`]
pub const CGP_TIMESTAMP: &CaptureGroupPattern = r"(?P<ts>[0-9]{10}\.[0-9]{3})";

/// Map the character following a `%` to its capture group pattern.
pub const fn directive_to_cgp(directive: char) -> Option<&'static CaptureGroupPattern> {
    match directive {
        'Y' => Some(CGP_YEAR),
        'y' => Some(CGP_YEARy),
        'm' => Some(CGP_MONTHm),
        'b' => Some(CGP_MONTHb),
        'B' => Some(CGP_MONTHB),
        'd' => Some(CGP_DAYd),
        'e' => Some(CGP_DAYe),
        'j' => Some(CGP_DAYj),
        'a' => Some(CGP_WEEKDAYa),
        'A' => Some(CGP_WEEKDAYA),
        'w' => Some(CGP_WEEKDAYw),
        'U' => Some(CGP_WEEKU),
        'W' => Some(CGP_WEEKW),
        'H' => Some(CGP_HOUR),
        'I' => Some(CGP_HOURI),
        'p' => Some(CGP_AMPM),
        'M' => Some(CGP_MINUTE),
        'S' => Some(CGP_SECOND),
        'f' => Some(CGP_FRACTIONAL),
        'z' => Some(CGP_TZz),
        'c' => Some(CGP_LOCALEc),
        'x' => Some(CGP_LOCALEx),
        'X' => Some(CGP_LOCALEX),
        '%' => Some("%"),
        _ => None,
    }
}

/// Transform a `Timecode` into a regular expression pattern.
///
/// Each directive becomes a named capture group, all other text is escaped.
pub fn timecode_to_regex_pattern(timecode: &Timecode_str) -> Result<String> {
    if timecode == TIMECODE_TIMESTAMP {
        return Ok(String::from(CGP_TIMESTAMP));
    }
    let invalid = |reason: String| LogscanError::InvalidTimecode {
        timecode: Timecode::from(timecode),
        reason,
    };
    let mut pattern = String::with_capacity(timecode.len() * 8);
    let mut literal = String::new();
    let mut chars = timecode.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        let directive = match chars.next() {
            Some(d) => d,
            None => return Err(invalid(String::from("trailing '%'"))),
        };
        let cgp = match directive_to_cgp(directive) {
            Some(cgp) => cgp,
            None => return Err(invalid(format!("unknown directive '%{}'", directive))),
        };
        pattern.push_str(&regex::escape(&literal));
        literal.clear();
        pattern.push_str(cgp);
    }
    pattern.push_str(&regex::escape(&literal));

    Ok(pattern)
}

lazy_static! {
    /// Run-time compiled [`Regex`] for each of [`TIMECODES_DEFAULT`].
    static ref TIMECODES_DEFAULT_REGEX: HashMap<&'static Timecode_str, Regex> =
        TIMECODES_DEFAULT
            .iter()
            .filter_map(|timecode| {
                let pattern = timecode_to_regex_pattern(timecode).ok()?;
                let regex = Regex::new(pattern.as_str()).ok()?;
                Some((*timecode, regex))
            })
            .collect();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// registry of candidate Timecodes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Ordered, immutable list of candidate [`Timecode`]s used for detection.
///
/// Built once from [`TIMECODES_DEFAULT`] plus caller additions. Additions
/// are appended after the defaults; exact duplicates are dropped.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Timecodes {
    timecodes: Vec<Timecode>,
}

impl Timecodes {
    /// The built-in `Timecode`s.
    pub fn new() -> Timecodes {
        Timecodes {
            timecodes: TIMECODES_DEFAULT
                .iter()
                .map(|tc| Timecode::from(*tc))
                .collect(),
        }
    }

    /// The built-in `Timecode`s followed by `additions`.
    pub fn with_additions<I, S>(additions: I) -> Timecodes
    where
        I: IntoIterator<Item = S>,
        S: Into<Timecode>,
    {
        let mut timecodes = Timecodes::new();
        for timecode in additions.into_iter() {
            let timecode: Timecode = timecode.into();
            if !timecodes.timecodes.contains(&timecode) {
                timecodes.timecodes.push(timecode);
            }
        }

        timecodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Timecode> {
        self.timecodes.iter()
    }

    pub fn as_slice(&self) -> &[Timecode] {
        self.timecodes.as_slice()
    }

    pub fn len(&self) -> usize {
        self.timecodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timecodes.is_empty()
    }
}

impl Default for Timecodes {
    fn default() -> Self {
        Timecodes::new()
    }
}

/// Everything needed to resolve the [`TimestampFormat`] of a log.
///
/// - `timecode`: a fixed `Timecode` that overrides detection
/// - `timecodes`: candidates for detection
/// - `tz_offset`: offset for timestamps that carry no offset
/// - `now`: reference point for timestamps without a year
#[derive(Clone, Debug)]
pub struct FormatOptions {
    pub timecode: Option<Timecode>,
    pub timecodes: Timecodes,
    pub tz_offset: FixedOffset,
    pub now: DateTimeL,
}

impl FormatOptions {
    /// Default options; local system offset, local "now", no fixed timecode.
    pub fn new() -> FormatOptions {
        let now_local = Local::now();
        let tz_offset: FixedOffset = now_local.offset().fix();

        FormatOptions {
            timecode: None,
            timecodes: Timecodes::new(),
            tz_offset,
            now: now_local.with_timezone(&tz_offset),
        }
    }

    pub fn with_timecode(mut self, timecode: Option<Timecode>) -> FormatOptions {
        self.timecode = timecode;
        self
    }

    pub fn with_timecodes(mut self, timecodes: Timecodes) -> FormatOptions {
        self.timecodes = timecodes;
        self
    }

    pub fn with_tz_offset(mut self, tz_offset: FixedOffset) -> FormatOptions {
        self.tz_offset = tz_offset;
        self
    }

    pub fn with_now(mut self, now: DateTimeL) -> FormatOptions {
        self.now = now;
        self
    }

    /// Create the `TimestampFormat` for a log whose first line is `line`.
    ///
    /// A fixed `timecode` is compiled as-is, otherwise it is detected.
    pub fn resolve(&self, line: &[u8], path: &FPath) -> Result<TimestampFormat> {
        match &self.timecode {
            Some(timecode) => TimestampFormat::new(timecode, self.tz_offset, self.now),
            None => TimestampFormat::detect(self, line, path),
        }
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions::new()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TimestampFormat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// How matched text is decoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimecodeKind {
    /// seconds with millisecond fraction since the Unix epoch
    Timestamp,
    /// assembled from strftime-like directive captures
    Strftime,
}

/// One recognized timestamp encoding: a compiled matcher plus a decoder.
///
/// Immutable after construction.
#[derive(Clone)]
pub struct TimestampFormat {
    timecode: Timecode,
    kind: TimecodeKind,
    regex: Regex,
    tz_offset: FixedOffset,
    now: DateTimeL,
}

impl fmt::Debug for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TimestampFormat")
            .field("timecode", &self.timecode)
            .field("kind", &self.kind)
            .field("regex", &self.regex.as_str())
            .field("tz_offset", &self.tz_offset)
            .finish()
    }
}

/// Decoding failure reason.
pub type DecodeError = String;

/// Return the named capture as a `str`, if it participated in the match.
fn capture_str<'a>(captures: &'a Captures, name: &str) -> Option<&'a str> {
    captures
        .name(name)
        .and_then(|m| std::str::from_utf8(m.as_bytes()).ok())
}

/// Parse a base-10 number, ignoring padding spaces.
fn number(data: &str) -> std::result::Result<u32, DecodeError> {
    data.trim()
        .parse::<u32>()
        .map_err(|err| format!("bad number {:?}: {}", data, err))
}

/// Month number for a month name; only the first three letters are used.
fn month_from_name(data: &str) -> std::result::Result<u32, DecodeError> {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let abbr: String = data
        .chars()
        .take(3)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    match MONTHS.iter().position(|m| *m == abbr) {
        Some(index) => Ok(index as u32 + 1),
        None => Err(format!("bad month name {:?}", data)),
    }
}

/// Two-digit year; POSIX convention, `69`–`99` is 1969–1999, otherwise 20xx.
fn year_from_y(y: u32) -> Year {
    if y >= 69 {
        1900 + y as Year
    } else {
        2000 + y as Year
    }
}

/// Split `HH:MM:SS`.
fn hms(data: &str) -> std::result::Result<(u32, u32, u32), DecodeError> {
    let mut iter = data.split(':');
    match (iter.next(), iter.next(), iter.next()) {
        (Some(h), Some(m), Some(s)) => Ok((number(h)?, number(m)?, number(s)?)),
        _ => Err(format!("bad time {:?}", data)),
    }
}

/// Fractional digits to nanoseconds, e.g. `"25"` is 250000000.
fn fractional_to_nanos(data: &str) -> std::result::Result<u32, DecodeError> {
    let mut digits = String::from(data);
    while digits.len() < 9 {
        digits.push('0');
    }
    number(&digits[..9])
}

/// Parse `±HHMM`.
fn tz_from_z(data: &str) -> std::result::Result<FixedOffset, DecodeError> {
    let bad = || format!("bad timezone offset {:?}", data);
    if data.len() != 5 || !data.is_char_boundary(1) || !data.is_char_boundary(3) {
        return Err(bad());
    }
    let sign: i32 = match &data[..1] {
        "+" => 1,
        "-" => -1,
        _ => return Err(bad()),
    };
    let hours = number(&data[1..3])? as i32;
    let minutes = number(&data[3..5])? as i32;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(bad)
}

/// The calendar fields captured from one match.
#[derive(Debug, Default)]
struct CapturedFields {
    year: Option<Year>,
    month: Option<u32>,
    day: Option<u32>,
    ordinal: Option<u32>,
    hour: u32,
    minute: u32,
    second: u32,
    nanosecond: u32,
    hour12: Option<u32>,
    pm: Option<bool>,
    offset: Option<FixedOffset>,
}

impl CapturedFields {
    fn from_captures(captures: &Captures) -> std::result::Result<CapturedFields, DecodeError> {
        let mut fields = CapturedFields::default();
        let get = |name: &str| capture_str(captures, name);

        if let Some(data) = get("Y") {
            fields.year = Some(number(data)? as Year);
        }
        if let Some(data) = get("y") {
            fields.year = Some(year_from_y(number(data)?));
        }
        if let Some(data) = get("m") {
            fields.month = Some(number(data)?);
        }
        if let Some(data) = get("b").or_else(|| get("B")) {
            fields.month = Some(month_from_name(data)?);
        }
        if let Some(data) = get("d").or_else(|| get("e")) {
            fields.day = Some(number(data)?);
        }
        if let Some(data) = get("j") {
            fields.ordinal = Some(number(data)?);
        }
        if let Some(data) = get("H") {
            fields.hour = number(data)?;
        }
        if let Some(data) = get("I") {
            fields.hour12 = Some(number(data)?);
        }
        if let Some(data) = get("p") {
            fields.pm = match data {
                "AM" => Some(false),
                "PM" => Some(true),
                _ => return Err(format!("bad AM/PM {:?}", data)),
            };
        }
        if let Some(data) = get("M") {
            fields.minute = number(data)?;
        }
        if let Some(data) = get("S") {
            fields.second = number(data)?;
        }
        if let Some(data) = get("f") {
            fields.nanosecond = fractional_to_nanos(data)?;
        }
        if let Some(data) = get("X") {
            (fields.hour, fields.minute, fields.second) = hms(data)?;
        }
        if let Some(data) = get("x") {
            // mm/dd/yy
            let mut iter = data.split('/');
            match (iter.next(), iter.next(), iter.next()) {
                (Some(m), Some(d), Some(y)) => {
                    fields.month = Some(number(m)?);
                    fields.day = Some(number(d)?);
                    fields.year = Some(year_from_y(number(y)?));
                }
                _ => return Err(format!("bad date {:?}", data)),
            }
        }
        if let Some(data) = get("c") {
            // weekday, month, day, time, year
            let parts: Vec<&str> = data.split_ascii_whitespace().collect();
            if parts.len() != 5 {
                return Err(format!("bad locale datetime {:?}", data));
            }
            fields.month = Some(month_from_name(parts[1])?);
            fields.day = Some(number(parts[2])?);
            (fields.hour, fields.minute, fields.second) = hms(parts[3])?;
            fields.year = Some(number(parts[4])? as Year);
        }
        if let Some(data) = get("z") {
            fields.offset = Some(tz_from_z(data)?);
        }
        if let Some(hour12) = fields.hour12 {
            if hour12 == 0 || hour12 > 12 {
                return Err(format!("bad 12-hour clock hour {}", hour12));
            }
            let pm_add: u32 = if fields.pm.unwrap_or(false) { 12 } else { 0 };
            fields.hour = hour12 % 12 + pm_add;
        }

        Ok(fields)
    }

    fn date(&self, year: Year) -> std::result::Result<NaiveDate, DecodeError> {
        let date = match (self.month, self.day, self.ordinal) {
            (None, None, Some(ordinal)) => NaiveDate::from_yo_opt(year, ordinal),
            (month, day, _) => NaiveDate::from_ymd_opt(year, month.unwrap_or(1), day.unwrap_or(1)),
        };
        date.ok_or_else(|| {
            format!(
                "bad date year {} month {:?} day {:?} day-of-year {:?}",
                year, self.month, self.day, self.ordinal
            )
        })
    }

    fn time(&self) -> std::result::Result<NaiveTime, DecodeError> {
        NaiveTime::from_hms_nano_opt(self.hour, self.minute, self.second, self.nanosecond)
            .ok_or_else(|| {
                format!("bad time {:02}:{:02}:{:02}", self.hour, self.minute, self.second)
            })
    }
}

impl TimestampFormat {
    /// Compile `timecode` into a `TimestampFormat`.
    ///
    /// `tz_offset` is used for timestamps without an offset (`%z`).
    /// `now` is the reference point for timestamps without a year.
    pub fn new(
        timecode: &Timecode_str,
        tz_offset: FixedOffset,
        now: DateTimeL,
    ) -> Result<TimestampFormat> {
        defn!("({:?}, {:?}, {:?})", timecode, tz_offset, now);
        let kind = if timecode == TIMECODE_TIMESTAMP {
            TimecodeKind::Timestamp
        } else {
            TimecodeKind::Strftime
        };
        let regex: Regex = match TIMECODES_DEFAULT_REGEX.get(timecode) {
            Some(regex) => regex.clone(),
            None => {
                let pattern = timecode_to_regex_pattern(timecode)?;
                match Regex::new(pattern.as_str()) {
                    Ok(regex) => regex,
                    Err(err) => {
                        defx!("Regex::new({:?}) failed {}", pattern, err);
                        return Err(LogscanError::InvalidTimecode {
                            timecode: Timecode::from(timecode),
                            reason: err.to_string(),
                        });
                    }
                }
            }
        };
        defx!("regex {:?}", regex.as_str());

        Ok(TimestampFormat {
            timecode: Timecode::from(timecode),
            kind,
            regex,
            tz_offset,
            now,
        })
    }

    /// Try each of `options.timecodes` in order against `line`; return the
    /// first `TimestampFormat` that both matches and decodes.
    ///
    /// `path` is only used for the error.
    pub fn detect(
        options: &FormatOptions,
        line: &[u8],
        path: &FPath,
    ) -> Result<TimestampFormat> {
        defn!("({:?}, line {:?})", path, buffer_to_String_noraw(line));
        for timecode in options.timecodes.iter() {
            let format = TimestampFormat::new(timecode, options.tz_offset, options.now)?;
            match format.try_match(line) {
                ResultS3::Found(_dt) => {
                    defx!("timecode {:?} found {:?}", timecode, _dt);
                    return Ok(format);
                }
                ResultS3::Done => {
                    defo!("timecode {:?} not found", timecode);
                }
                ResultS3::Err(_err) => {
                    defo!("timecode {:?} matched but failed: {}", timecode, _err);
                }
            }
        }
        defx!("no timecode found");

        Err(LogscanError::NoFormatDetected { path: path.clone() })
    }

    pub fn timecode(&self) -> &Timecode_str {
        self.timecode.as_str()
    }

    pub fn kind(&self) -> TimecodeKind {
        self.kind
    }

    /// The compiled regular expression pattern.
    pub fn regex_pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn tz_offset(&self) -> &FixedOffset {
        &self.tz_offset
    }

    /// Search `line` for a timestamp.
    ///
    /// - `Found(dt)` the timestamp matched and decoded
    /// - `Done` the timestamp pattern was not found
    /// - `Err(reason)` the pattern was found but could not be decoded
    pub fn try_match(&self, line: &[u8]) -> ResultS3<DateTimeL, DecodeError> {
        let captures = match self.regex.captures(line) {
            Some(captures) => captures,
            None => return ResultS3::Done,
        };
        match self.decode(&captures) {
            Ok(dt) => ResultS3::Found(dt),
            Err(err) => ResultS3::Err(err),
        }
    }

    /// Return the timestamp of `line`.
    ///
    /// A line without a decodable timestamp is
    /// [`LogscanError::TimestampNotFound`].
    pub fn extract(&self, line: &[u8]) -> Result<DateTimeL> {
        match self.try_match(line) {
            ResultS3::Found(dt) => Ok(dt),
            ResultS3::Done | ResultS3::Err(_) => Err(LogscanError::TimestampNotFound {
                timecode: self.timecode.clone(),
                line: buffer_to_String_noraw(line),
            }),
        }
    }

    /// Decode the matched text of `captures` into a `DateTimeL`.
    fn decode(&self, captures: &Captures) -> std::result::Result<DateTimeL, DecodeError> {
        match self.kind {
            TimecodeKind::Timestamp => self.decode_timestamp(captures),
            TimecodeKind::Strftime => self.decode_strftime(captures),
        }
    }

    fn decode_timestamp(&self, captures: &Captures) -> std::result::Result<DateTimeL, DecodeError> {
        let data = match capture_str(captures, "ts") {
            Some(data) => data,
            None => return Err(String::from("no timestamp capture")),
        };
        let (secs, millis) = match data.split_once('.') {
            Some(val) => val,
            None => return Err(format!("bad timestamp {:?}", data)),
        };
        let secs: i64 = secs
            .parse::<i64>()
            .map_err(|err| format!("bad timestamp {:?}: {}", data, err))?;
        let nanos: u32 = number(millis)? * 1_000_000;
        match Utc.timestamp_opt(secs, nanos).single() {
            Some(dt) => Ok(dt.with_timezone(&self.tz_offset)),
            None => Err(format!("timestamp out of range {:?}", data)),
        }
    }

    fn decode_strftime(&self, captures: &Captures) -> std::result::Result<DateTimeL, DecodeError> {
        let fields = CapturedFields::from_captures(captures)?;
        let offset: FixedOffset = fields.offset.unwrap_or(self.tz_offset);
        let time: NaiveTime = fields.time()?;
        let localize = |date: NaiveDate| -> std::result::Result<DateTimeL, DecodeError> {
            offset
                .from_local_datetime(&NaiveDateTime::new(date, time))
                .earliest()
                .ok_or_else(|| format!("cannot localize {:?} {:?}", date, time))
        };

        if let Some(year) = fields.year {
            return localize(fields.date(year)?);
        }

        // no year; assume the year of `now`, unless that is in the future
        let year: Year = self.now.year();
        let dt = fields.date(year).and_then(&localize);
        match dt {
            Ok(dt) if dt <= self.now => Ok(dt),
            _ => {
                defo!("year {} is in the future or invalid; use year {}", year, year - 1);
                localize(fields.date(year - 1)?)
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTime comparisons
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Describe the result of comparing one [`DateTimeL`] to a half-open range
/// `[start, end)`.
#[derive(Debug, Eq, PartialEq)]
pub enum Result_Filter_DateTime2 {
    /// at or after `start` and before `end`
    InRange,
    /// before `start`
    BeforeRange,
    /// at or after `end`
    AfterRange,
}

/// Is `dt` before ([`BeforeRange`]), after ([`AfterRange`]), or in
/// ([`InRange`]) the half-open range `[start, end)`?
///
/// An absent bound is unbounded on that side.
///
/// [`AfterRange`]: Result_Filter_DateTime2::AfterRange
/// [`BeforeRange`]: Result_Filter_DateTime2::BeforeRange
/// [`InRange`]: Result_Filter_DateTime2::InRange
pub fn dt_pass_filters(
    dt: &DateTimeL,
    start: &DateTimeLOpt,
    end: &DateTimeLOpt,
) -> Result_Filter_DateTime2 {
    if let Some(end) = end {
        if dt >= end {
            return Result_Filter_DateTime2::AfterRange;
        }
    }
    if let Some(start) = start {
        if dt < start {
            return Result_Filter_DateTime2::BeforeRange;
        }
    }

    Result_Filter_DateTime2::InRange
}

/// Is the range `[start, end)` empty? Only possible if both are given.
pub fn range_is_empty(
    start: &DateTimeLOpt,
    end: &DateTimeLOpt,
) -> bool {
    match (start, end) {
        (Some(start), Some(end)) => end <= start,
        _ => false,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// user-passed datetimes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// strftime patterns of user-passed datetimes without an offset
const DATETIME_ARG_PATTERNS: [&str; 2] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse a user-passed datetime, e.g. a range bound.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD`
/// (midnight), RFC 3339, or `@` followed by Unix epoch seconds.
/// A datetime without an offset is in `tz_offset`.
pub fn datetime_parse_arg(
    data: &str,
    tz_offset: &FixedOffset,
) -> Option<DateTimeL> {
    defn!("({:?}, {:?})", data, tz_offset);
    let data: &str = data.trim();
    if let Some(secs) = data.strip_prefix('@') {
        let dt = secs
            .parse::<i64>()
            .ok()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .map(|dt| dt.with_timezone(tz_offset));
        defx!("return {:?}", dt);
        return dt;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(data) {
        defx!("return {:?}", dt);
        return Some(dt);
    }
    let mut naive: Option<NaiveDateTime> = None;
    for pattern in DATETIME_ARG_PATTERNS.iter() {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(data, pattern) {
            naive = Some(ndt);
            break;
        }
    }
    if naive.is_none() {
        naive = NaiveDate::parse_from_str(data, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0));
    }
    let dt: DateTimeLOpt = naive.and_then(|ndt| tz_offset.from_local_datetime(&ndt).earliest());
    defx!("return {:?}", dt);

    dt
}
