// src/readers/mod.rs

//! "Readers" for _logscanlib_.
//!
//! ## Overview of readers
//!
//! * A [`LogChain`] drives one [`LogSegment`] per file of a rotated log,
//!   e.g. `app.log.2.gz`, `app.log.1`, `app.log`, oldest-first.
//! * A `LogSegment` reads one file (or one stream) and derives its first
//!   line, last line, start and end datetimes, and time sections of lines.
//!
//! <br/>
//!
//! * A `LogSegment` only handles `u8` bytes. Lines are never converted to
//!   `str`; timestamps are matched with [`regex::bytes`].
//! * Reads are lazy and cached. The last line of a plain file is found by
//!   reading a growing window at the end of the file.
//!
//! <br/>
//!
//! Also see [_Definitions of data_].
//!
//! <br/>
//!
//! _These are not rust "Readers"; these structs do not implement the trait
//! [`Read`]. These are "readers" in an informal sense._
//!
//! [_Definitions of data_]: crate::data
//! [`Read`]: std::io::Read
//! [`regex::bytes`]: https://docs.rs/regex/latest/regex/bytes/index.html
//! [`LogChain`]: crate::readers::logchain::LogChain
//! [`LogSegment`]: crate::readers::logsegment::LogSegment

pub mod helpers;
pub mod logchain;
pub mod logsegment;
