// src/common.rs
//
// common imports, type aliases, errors, and other globals (avoids circular imports)

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub use std::fs::File;
pub use std::path::Path;

/// `F`ake `Path` or `F`ile `Path`
pub type FPath = String;
pub type FPaths = Vec<FPath>;
pub type FileOpenOptions = std::fs::OpenOptions;
/// Offset into a file in bytes
pub type FileOffset = u64;
/// Size of a file in bytes
pub type FileSz = u64;
/// A general-purpose counter
pub type Count = u64;

/// Name given to a [`LogSegment`] that reads from standard input.
///
/// [`LogSegment`]: crate::readers::logsegment::LogSegment
pub const FPATH_STDIN: &str = "<stdin>";

/// File name suffix of gzip-compressed rotated files.
pub const SUFFIX_GZ: &str = ".gz";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// lines
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One raw line of a log file, including the line terminator (if any).
///
/// Lines are kept as bytes; a log file is not required to be valid UTF-8.
pub type LogLine = Vec<u8>;
pub type LogLines = Vec<LogLine>;

/// Single-byte newLine char as u8
#[allow(non_upper_case_globals)]
pub const NLu8: u8 = 10;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Errors of the log-access engine.
///
/// None of these are recovered internally; they propagate to the caller.
#[derive(Debug, thiserror::Error)]
pub enum LogscanError {
    /// None of the candidate timecodes matched the sample line.
    #[error("no proper timecode was found for {path:?}")]
    NoFormatDetected { path: FPath },

    /// A line does not match the already-resolved timecode.
    #[error("timecode {timecode:?} doesn't fit line {line:?}")]
    TimestampNotFound { timecode: String, line: String },

    /// The timecode pattern could not be compiled.
    #[error("invalid timecode {timecode:?}: {reason}")]
    InvalidTimecode { timecode: String, reason: String },

    /// Underlying I/O failure.
    #[error("failed to read {path:?}: {source}")]
    SourceRead {
        path: FPath,
        #[source]
        source: std::io::Error,
    },

    /// The log (or segment) holds no lines at all.
    #[error("no lines in {path:?}")]
    EmptyLog { path: FPath },

    /// Two consecutive segments have overlapping time ranges.
    #[error("segment {older:?} ends after segment {newer:?} starts")]
    SegmentsOverlap { older: FPath, newer: FPath },

    /// A configuration file could not be loaded.
    #[error("bad configuration {path:?}: {reason}")]
    Config { path: FPath, reason: String },
}

pub type Result<T> = std::result::Result<T, LogscanError>;

/// Wrap a [`std::io::Error`] with the path it happened on.
pub fn err_from_io(
    source: std::io::Error,
    path: &FPath,
) -> LogscanError {
    LogscanError::SourceRead {
        path: path.clone(),
        source,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// custom Results enum for matching functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `Result` Extended
/// for timestamp matching functions
#[derive(Debug, PartialEq)]
pub enum ResultS3<T, E> {
    /// Contains the success data
    Found(T),
    /// Nothing matched, but no bad errors happened
    Done,
    /// Something matched but could not be used
    Err(E),
}

impl<T, E> std::fmt::Display for ResultS3<T, E>
where
    E: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultS3::Found(_) => { write!(f, "ResultS3::Found") },
            ResultS3::Done => { write!(f, "ResultS3::Done") },
            ResultS3::Err(err) => { write!(f, "ResultS3::Err({})", err) },
        }
    }
}
