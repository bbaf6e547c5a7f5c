// src/lib.rs

//! _logscanlib_ is the library of the _logscan_ program, time-specific access
//! to log files.
//!
//! A log file and its rotated predecessors (`app.log`, `app.log.1`,
//! `app.log.2.gz`, …) are read as one time-ordered log by a [`LogChain`].
//! The timestamp format of the log is detected from its first line; lines
//! within a datetime range `[start, end)` are returned as raw bytes.
//!
//! Also see [_Definitions of data_] and [_Overview of readers_].
//!
//! [`LogChain`]: crate::readers::logchain::LogChain
//! [_Definitions of data_]: crate::data
//! [_Overview of readers_]: crate::readers

pub mod common;
pub mod config;
pub mod data;
pub mod debug;
pub mod readers;
#[cfg(test)]
pub mod tests;
