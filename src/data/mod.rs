// src/data/mod.rs

//! The `data` module is specialized data for timestamps found in log lines.
//!
//! ## Definitions of data
//!
//! ### Timecode
//!
//! A "timecode" is a strftime-like pattern describing how a timestamp is
//! written within a line, e.g. `"%b %d %X"` for `"Oct  5 10:00:00"`.
//! The sentinel `"timestamp"` describes a Unix timestamp with milliseconds,
//! e.g. `"1700000000.123"`.
//!
//! ### TimestampFormat
//!
//! A [`TimestampFormat`] is a compiled timecode; it finds the timestamp within
//! a line and decodes it to a [`DateTimeL`].
//!
//! ### Line
//!
//! A "line" is a sequence of bytes that:
//!
//! * begins after a prior "line" or the beginning of a file.
//! * ends with a newline character `'\n'` or the end of a file.
//!
//! A line is kept as raw bytes, [`LogLine`], including the newline.
//!
//! Also see [_Overview of readers_].
//!
//! [`TimestampFormat`]: crate::data::datetime::TimestampFormat
//! [`DateTimeL`]: crate::data::datetime::DateTimeL
//! [`LogLine`]: crate::common::LogLine
//! [_Overview of readers_]: crate::readers

pub mod datetime;
