// src/readers/logchain.rs

//! Implements a [`LogChain`], time-specific access to one log and its
//! rotated predecessors as a single ordered sequence of lines.
//!
//! [`LogChain`]: self::LogChain

use std::io::Read;
use std::rc::Rc;

use crate::common::{
    FPath,
    FPaths,
    LogLine,
    LogscanError,
    Result,
};
use crate::data::datetime::{
    range_is_empty,
    DateTimeL,
    DateTimeLOpt,
    FormatOptions,
    TimestampFormat,
};
use crate::readers::helpers::discover_rotated;
use crate::readers::logsegment::LogSegment;

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

/// A log file and its rotated predecessors, e.g.
/// `app.log.2.gz`, `app.log.1`, `app.log`, accessed as one time-ordered log.
///
/// Segments are ordered oldest-first. All segments share one
/// [`TimestampFormat`], resolved from the first line of the earliest
/// non-empty segment. Empty segments are skipped.
///
/// Results assume segments do not overlap in time; see
/// [`check_order`](LogChain::check_order).
#[derive(Debug)]
pub struct LogChain {
    /// name of the chain; the path of the newest (base) file
    name: FPath,
    /// oldest-first
    segments: Vec<LogSegment>,
    format: Option<Rc<TimestampFormat>>,
}

impl LogChain {
    /// Create a `LogChain` for the log at `path` and all of its rotated
    /// files found by [`discover`](LogChain::discover).
    pub fn new(
        path: FPath,
        options: FormatOptions,
    ) -> Result<LogChain> {
        defn!("({:?})", path);
        let options: Rc<FormatOptions> = Rc::new(options);
        let fpaths: FPaths = LogChain::discover(&path);
        let mut segments: Vec<LogSegment> = Vec::with_capacity(fpaths.len());
        for fpath in fpaths.into_iter() {
            segments.push(LogSegment::new(fpath, options.clone())?);
        }
        defx!("{} segments", segments.len());

        Ok(LogChain {
            name: path,
            segments,
            format: None,
        })
    }

    /// Create a `LogChain` of one segment read entirely from `reader`.
    /// A stream has no rotated files.
    pub fn from_reader<R: Read>(
        name: FPath,
        reader: R,
        options: FormatOptions,
    ) -> Result<LogChain> {
        defñ!("({:?})", name);
        let segment = LogSegment::from_reader(name.clone(), reader, Rc::new(options))?;

        Ok(LogChain {
            name,
            segments: vec![segment],
            format: None,
        })
    }

    /// Paths of `path` and its rotated files, oldest-first with `path` last.
    pub fn discover(path: &FPath) -> FPaths {
        discover_rotated(path)
    }

    pub fn name(&self) -> &FPath {
        &self.name
    }

    /// Number of segments.
    pub fn quantity(&self) -> usize {
        self.segments.len()
    }

    /// Paths of the segments, oldest-first.
    pub fn paths(&self) -> FPaths {
        self.segments
            .iter()
            .map(|segment| segment.path().clone())
            .collect()
    }

    /// The segments, oldest-first.
    pub fn segments(&self) -> &[LogSegment] {
        &self.segments
    }

    /// Release every segment's file.
    pub fn close(&mut self) {
        defñ!("({:?})", self.name);
        for segment in self.segments.iter_mut() {
            segment.close();
        }
    }

    /// Resolve the shared `TimestampFormat` and hand it to every segment.
    /// `None` if every segment is empty.
    fn resolve_format(&mut self) -> Result<Option<Rc<TimestampFormat>>> {
        if let Some(format) = &self.format {
            return Ok(Some(format.clone()));
        }
        let mut format: Option<Rc<TimestampFormat>> = None;
        for segment in self.segments.iter_mut() {
            if segment.is_empty()? {
                continue;
            }
            format = Some(segment.format()?);
            break;
        }
        if let Some(format) = &format {
            defo!("({:?}) format {:?}", self.name, format);
            for segment in self.segments.iter_mut() {
                segment.set_format(format.clone());
            }
        }
        self.format = format.clone();

        Ok(format)
    }

    /// The shared `TimestampFormat`.
    pub fn format(&mut self) -> Result<Rc<TimestampFormat>> {
        match self.resolve_format()? {
            Some(format) => Ok(format),
            None => Err(LogscanError::EmptyLog { path: self.name.clone() }),
        }
    }

    /// Does every segment have no lines?
    pub fn is_empty(&mut self) -> Result<bool> {
        for segment in self.segments.iter_mut() {
            if !segment.is_empty()? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// The datetime of the first line of the oldest non-empty segment.
    pub fn start(&mut self) -> Result<DateTimeL> {
        self.resolve_format()?;
        for segment in self.segments.iter_mut() {
            if !segment.is_empty()? {
                return segment.start();
            }
        }

        Err(LogscanError::EmptyLog { path: self.name.clone() })
    }

    /// The datetime of the last line of the newest non-empty segment.
    pub fn end(&mut self) -> Result<DateTimeL> {
        self.resolve_format()?;
        for segment in self.segments.iter_mut().rev() {
            if !segment.is_empty()? {
                return segment.end();
            }
        }

        Err(LogscanError::EmptyLog { path: self.name.clone() })
    }

    /// All lines of all segments, oldest-first.
    pub fn lines(&mut self) -> Result<Vec<&LogLine>> {
        let mut parts: Vec<&[LogLine]> = Vec::with_capacity(self.segments.len());
        for segment in self.segments.iter_mut() {
            parts.push(segment.lines()?);
        }

        Ok(parts.into_iter().flatten().collect())
    }

    /// Lines of all segments with a datetime within `[start, end)`,
    /// oldest-first. An absent bound is unbounded on that side.
    ///
    /// Only segments that may hold lines in the range are read.
    pub fn section(
        &mut self,
        start: &DateTimeLOpt,
        end: &DateTimeLOpt,
    ) -> Result<Vec<&LogLine>> {
        defn!("({:?}, {:?}, {:?})", self.name, start, end);
        if range_is_empty(start, end) || self.is_empty()? {
            defx!("empty range or empty log");
            return Ok(Vec::new());
        }
        if start.is_none() && end.is_none() {
            defx!("unbounded");
            return self.lines();
        }
        let chain_start: DateTimeL = self.start()?;
        let chain_end: DateTimeL = self.end()?;
        if end.map_or(false, |end| end <= chain_start) || start.map_or(false, |start| start > chain_end) {
            defx!("outside of [{}, {}]", chain_start, chain_end);
            return Ok(Vec::new());
        }
        if start.map_or(true, |start| start <= chain_start) && end.map_or(true, |end| end > chain_end) {
            defx!("entirely within");
            return self.lines();
        }
        // newest to oldest, stopping at the segment that holds `start`
        let mut parts: Vec<&[LogLine]> = Vec::new();
        for segment in self.segments.iter_mut().rev() {
            if segment.is_empty()? {
                continue;
            }
            let segment_start: DateTimeL = segment.start()?;
            if end.map_or(false, |end| end <= segment_start) {
                defo!("skip {:?}, starts {}", segment.path(), segment_start);
                continue;
            }
            defo!("section of {:?}", segment.path());
            parts.push(segment.section(start, end)?);
            if start.map_or(false, |start| start >= segment_start) {
                break;
            }
        }
        parts.reverse();
        let lines: Vec<&LogLine> = parts.into_iter().flatten().collect();
        defx!("return {} lines", lines.len());

        Ok(lines)
    }

    /// Verify consecutive non-empty segments do not overlap in time; each
    /// segment must end at or before the next segment starts.
    pub fn check_order(&mut self) -> Result<()> {
        defn!("({:?})", self.name);
        self.resolve_format()?;
        let mut previous: Option<(FPath, DateTimeL)> = None;
        for segment in self.segments.iter_mut() {
            if segment.is_empty()? {
                continue;
            }
            let start: DateTimeL = segment.start()?;
            if let Some((older, older_end)) = &previous {
                if *older_end > start {
                    defx!("{:?} ends {} after {:?} starts {}", older, older_end, segment.path(), start);
                    return Err(LogscanError::SegmentsOverlap {
                        older: older.clone(),
                        newer: segment.path().clone(),
                    });
                }
            }
            previous = Some((segment.path().clone(), segment.end()?));
        }
        defx!("ordered");

        Ok(())
    }
}
