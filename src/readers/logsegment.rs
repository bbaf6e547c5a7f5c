// src/readers/logsegment.rs

//! Implements a [`LogSegment`], time-specific access to one log file.
//!
//! [`LogSegment`]: self::LogSegment

use std::fmt;
use std::io::{BufRead, BufReader, Error, ErrorKind, Read, Seek, SeekFrom};
use std::rc::Rc;

use crate::common::{
    err_from_io,
    Count,
    FPath,
    File,
    FileOffset,
    FileOpenOptions,
    FileSz,
    LogLine,
    LogLines,
    LogscanError,
    NLu8,
    Result,
    ResultS3,
};
use crate::data::datetime::{
    dt_pass_filters,
    range_is_empty,
    DateTimeL,
    DateTimeLOpt,
    FormatOptions,
    Result_Filter_DateTime2,
    TimestampFormat,
};
use crate::de_wrn;
use crate::debug::printers::buffer_to_String_noraw;
use crate::readers::helpers::{fpath_is_gz, fpath_to_path};

// `flate2` is for gzip files.
use ::flate2::read::GzDecoder;
use ::memchr::memrchr;
use ::more_asserts::debug_assert_le;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

/// Initial number of bytes read from the end of a plain file to find the
/// last line. Doubled until the window holds the beginning of the last line.
pub const TAIL_WINDOW_SZ: FileSz = 1024;

/// The byte source of a [`LogSegment`].
#[derive(Debug)]
enum Source {
    /// A file; `file` is `None` while closed.
    File {
        file: Option<File>,
        gz: bool,
    },
    /// A stream that was read entirely at creation, e.g. STDIN.
    Stream,
}

/// Time-specific access to the lines of one log file (a "segment" of a
/// [`LogChain`]).
///
/// The first line, last line, start and end datetimes, and all lines are
/// read lazily and cached. Files ending with `.gz` are decompressed.
///
/// The [`TimestampFormat`] is resolved on first need from the first line,
/// unless one is handed over with [`set_format`].
///
/// [`LogChain`]: crate::readers::logchain::LogChain
/// [`set_format`]: LogSegment::set_format
pub struct LogSegment {
    path: FPath,
    source: Source,
    options: Rc<FormatOptions>,
    format: Option<Rc<TimestampFormat>>,
    first_line: Option<LogLine>,
    last_line: Option<LogLine>,
    start: DateTimeLOpt,
    end: DateTimeLOpt,
    lines: Option<LogLines>,
    /// number of reads of the underlying source
    count_reads: Count,
}

impl fmt::Debug for LogSegment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LogSegment")
            .field("path", &self.path)
            .field("source", &self.source)
            .field("format", &self.format)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("lines", &self.lines.as_ref().map(|lines| lines.len()))
            .field("count_reads", &self.count_reads)
            .finish()
    }
}

/// Read lines from `reader` until EOF. Line terminators are kept.
fn read_all_lines<R: BufRead + ?Sized>(
    reader: &mut R,
    path: &FPath,
) -> Result<LogLines> {
    let mut lines = LogLines::new();
    loop {
        let mut line = LogLine::new();
        match reader.read_until(NLu8, &mut line) {
            Ok(0) => break,
            Ok(_) => lines.push(line),
            Err(err) => return Err(err_from_io(err, path)),
        }
    }

    Ok(lines)
}

/// Return the last line in `buffer`, the tail of a file.
///
/// `at_start` is `true` if `buffer` begins at the start of the file.
/// Returns `None` if `buffer` may not hold the beginning of the last line.
pub fn last_line_in_buffer(
    buffer: &[u8],
    at_start: bool,
) -> Option<LogLine> {
    // the final line terminator belongs to the last line
    let search_end: usize = match buffer.last() {
        Some(&NLu8) => buffer.len() - 1,
        Some(_) => buffer.len(),
        None if at_start => return Some(LogLine::new()),
        None => return None,
    };
    match memrchr(NLu8, &buffer[..search_end]) {
        Some(index) => Some(buffer[index + 1..].to_vec()),
        None if at_start => Some(buffer.to_vec()),
        None => None,
    }
}

/// Return the index range `begin..finish` of `lines` that falls within
/// `[start, end)`.
///
/// Inclusion begins at the first line with a timestamp at or after `start`
/// (or the first line if `start` is `None`) and stops before the first line
/// with a timestamp at or after `end`. Lines without a timestamp do not move
/// either boundary.
pub fn section_bounds(
    format: &TimestampFormat,
    lines: &[LogLine],
    start: &DateTimeLOpt,
    end: &DateTimeLOpt,
) -> (usize, usize) {
    let mut begin: Option<usize> = if start.is_none() { Some(0) } else { None };
    let mut finish: usize = lines.len();
    for (index, line) in lines.iter().enumerate() {
        let dt: DateTimeL = match format.try_match(line) {
            ResultS3::Found(dt) => dt,
            ResultS3::Done | ResultS3::Err(_) => continue,
        };
        match dt_pass_filters(&dt, start, end) {
            Result_Filter_DateTime2::AfterRange => {
                finish = index;
                break;
            }
            Result_Filter_DateTime2::InRange => {
                if begin.is_none() {
                    begin = Some(index);
                }
            }
            Result_Filter_DateTime2::BeforeRange => {}
        }
    }
    let bounds = match begin {
        Some(begin) if begin < finish => (begin, finish),
        _ => (finish, finish),
    };
    debug_assert_le!(bounds.0, bounds.1);
    debug_assert_le!(bounds.1, lines.len());

    bounds
}

impl LogSegment {
    /// Create a new `LogSegment` for the file at `path` and open it.
    pub fn new(
        path: FPath,
        options: Rc<FormatOptions>,
    ) -> Result<LogSegment> {
        defn!("({:?})", path);
        let gz: bool = fpath_is_gz(&path);
        let mut segment = LogSegment {
            path,
            source: Source::File { file: None, gz },
            options,
            format: None,
            first_line: None,
            last_line: None,
            start: None,
            end: None,
            lines: None,
            count_reads: 0,
        };
        segment.open()?;
        defx!("{:?}", segment);

        Ok(segment)
    }

    /// Create a new `LogSegment` named `name` by reading all of `reader`.
    ///
    /// A stream cannot be re-read so all lines are read now.
    pub fn from_reader<R: Read>(
        name: FPath,
        reader: R,
        options: Rc<FormatOptions>,
    ) -> Result<LogSegment> {
        defn!("({:?})", name);
        let mut bufreader = BufReader::new(reader);
        let lines: LogLines = read_all_lines(&mut bufreader, &name)?;
        defx!("read {} lines", lines.len());

        Ok(LogSegment {
            path: name,
            source: Source::Stream,
            options,
            format: None,
            first_line: None,
            last_line: None,
            start: None,
            end: None,
            lines: Some(lines),
            count_reads: 1,
        })
    }

    pub fn path(&self) -> &FPath {
        &self.path
    }

    /// Is the underlying file gzip-compressed?
    pub fn is_gz(&self) -> bool {
        matches!(self.source, Source::File { gz: true, .. })
    }

    /// Is the underlying source a stream (already read)?
    pub fn is_stream(&self) -> bool {
        matches!(self.source, Source::Stream)
    }

    pub fn is_open(&self) -> bool {
        match &self.source {
            Source::File { file, .. } => file.is_some(),
            Source::Stream => false,
        }
    }

    /// Number of reads of the underlying source so far.
    pub fn count_reads(&self) -> Count {
        self.count_reads
    }

    /// Open the underlying file. Does nothing if already open or if this is a
    /// stream.
    pub fn open(&mut self) -> Result<()> {
        if let Source::File { file, .. } = &mut self.source {
            if file.is_none() {
                defo!("open({:?})", self.path);
                let file_ = FileOpenOptions::new()
                    .read(true)
                    .open(fpath_to_path(&self.path))
                    .map_err(|err| err_from_io(err, &self.path))?;
                *file = Some(file_);
            }
        }

        Ok(())
    }

    /// Release the underlying file. Cached data remains available; reading
    /// uncached data opens the file again.
    pub fn close(&mut self) {
        if let Source::File { file, .. } = &mut self.source {
            if file.is_some() {
                defñ!("close({:?})", self.path);
            }
            *file = None;
        }
    }

    /// Return a reader positioned at the start of the (decompressed) data.
    fn reader_from_start(&mut self) -> Result<Box<dyn BufRead + '_>> {
        self.open()?;
        self.count_reads += 1;
        let path: &FPath = &self.path;
        match &mut self.source {
            Source::File { file: Some(file), gz } => {
                file.seek(SeekFrom::Start(0))
                    .map_err(|err| err_from_io(err, path))?;
                let file: &File = file;
                if *gz {
                    Ok(Box::new(BufReader::new(GzDecoder::new(file))))
                } else {
                    Ok(Box::new(BufReader::new(file)))
                }
            }
            Source::File { file: None, .. } => Err(err_from_io(
                Error::new(ErrorKind::Other, "file is not open"),
                path,
            )),
            Source::Stream => Err(err_from_io(
                Error::new(ErrorKind::Unsupported, "a stream cannot be read again"),
                path,
            )),
        }
    }

    /// Read the last line of a plain file from a window at the end of the
    /// file, growing the window until it holds the entire last line.
    fn read_last_line_tail(&mut self) -> Result<LogLine> {
        defn!("({:?})", self.path);
        self.open()?;
        let path: FPath = self.path.clone();
        let file: &mut File = match &mut self.source {
            Source::File { file: Some(file), gz: false } => file,
            _ => {
                return Err(err_from_io(
                    Error::new(ErrorKind::Unsupported, "not a seekable plain file"),
                    &path,
                ));
            }
        };
        let filesz: FileSz = file
            .metadata()
            .map_err(|err| err_from_io(err, &path))?
            .len();
        let mut window: FileSz = TAIL_WINDOW_SZ;
        loop {
            let offset: FileOffset = filesz.saturating_sub(window);
            debug_assert_le!(offset, filesz);
            defo!("seek({}) window {} filesz {}", offset, window, filesz);
            file.seek(SeekFrom::Start(offset))
                .map_err(|err| err_from_io(err, &path))?;
            let mut buffer: Vec<u8> = Vec::with_capacity((filesz - offset) as usize);
            file.read_to_end(&mut buffer)
                .map_err(|err| err_from_io(err, &path))?;
            self.count_reads += 1;
            if let Some(line) = last_line_in_buffer(&buffer, offset == 0) {
                defx!("return {:?}", buffer_to_String_noraw(&line));
                return Ok(line);
            }
            window = window.saturating_mul(2);
        }
    }

    /// All lines of the file, read once and cached.
    pub fn lines(&mut self) -> Result<&[LogLine]> {
        if self.lines.is_none() {
            defn!("({:?}) read all lines", self.path);
            let path: FPath = self.path.clone();
            let lines: LogLines = {
                let mut reader = self.reader_from_start()?;
                read_all_lines(&mut *reader, &path)?
            };
            defx!("read {} lines", lines.len());
            self.lines = Some(lines);
        }

        Ok(self.lines.as_deref().unwrap_or(&[]))
    }

    /// The first line. Only the first line is read if the lines are not
    /// cached.
    pub fn first_line(&mut self) -> Result<&[u8]> {
        if self.first_line.is_none() {
            let cached: Option<LogLine> = self
                .lines
                .as_ref()
                .map(|lines| lines.first().cloned().unwrap_or_default());
            let line: LogLine = match cached {
                Some(line) => line,
                None => {
                    let path: FPath = self.path.clone();
                    let mut reader = self.reader_from_start()?;
                    let mut line = LogLine::new();
                    reader
                        .read_until(NLu8, &mut line)
                        .map_err(|err| err_from_io(err, &path))?;
                    line
                }
            };
            defo!("({:?}) first line {:?}", self.path, buffer_to_String_noraw(&line));
            self.first_line = Some(line);
        }

        Ok(self.first_line.as_deref().unwrap_or(&[]))
    }

    /// The last line. A plain file is read from the end, otherwise all lines
    /// are read.
    pub fn last_line(&mut self) -> Result<&[u8]> {
        if self.last_line.is_none() {
            let tail_readable: bool = matches!(self.source, Source::File { gz: false, .. });
            let line: LogLine = if self.lines.is_none() && tail_readable {
                self.read_last_line_tail()?
            } else {
                self.lines()?
                    .last()
                    .cloned()
                    .unwrap_or_default()
            };
            defo!("({:?}) last line {:?}", self.path, buffer_to_String_noraw(&line));
            self.last_line = Some(line);
        }

        Ok(self.last_line.as_deref().unwrap_or(&[]))
    }

    /// Does the file have no lines at all?
    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.first_line()?.is_empty())
    }

    /// Use `format` for this segment instead of resolving one.
    pub fn set_format(&mut self, format: Rc<TimestampFormat>) {
        self.format = Some(format);
    }

    /// The `TimestampFormat` of this segment; resolved from the first line
    /// if not yet known.
    pub fn format(&mut self) -> Result<Rc<TimestampFormat>> {
        if let Some(format) = &self.format {
            return Ok(format.clone());
        }
        let path: FPath = self.path.clone();
        let options: Rc<FormatOptions> = self.options.clone();
        let format: Rc<TimestampFormat> = Rc::new(options.resolve(self.first_line()?, &path)?);
        defo!("({:?}) resolved {:?}", path, format);
        self.format = Some(format.clone());

        Ok(format)
    }

    /// The datetime of the first line.
    pub fn start(&mut self) -> Result<DateTimeL> {
        if let Some(dt) = self.start {
            return Ok(dt);
        }
        if self.is_empty()? {
            return Err(LogscanError::EmptyLog { path: self.path.clone() });
        }
        let format = self.format()?;
        let dt: DateTimeL = format.extract(self.first_line()?)?;
        defñ!("({:?}) start {:?}", self.path, dt);
        self.start = Some(dt);

        Ok(dt)
    }

    /// The datetime of the last line.
    pub fn end(&mut self) -> Result<DateTimeL> {
        if let Some(dt) = self.end {
            return Ok(dt);
        }
        if self.is_empty()? {
            return Err(LogscanError::EmptyLog { path: self.path.clone() });
        }
        let format = self.format()?;
        let dt: DateTimeL = format.extract(self.last_line()?)?;
        defñ!("({:?}) end {:?}", self.path, dt);
        if let Some(start) = self.start {
            if start > dt {
                de_wrn!("{:?} starts {} after it ends {}", self.path, start, dt);
            }
        }
        self.end = Some(dt);

        Ok(dt)
    }

    /// Lines with a datetime within `[start, end)`. An absent bound is
    /// unbounded on that side.
    ///
    /// Lines without a datetime are included when they lie within the
    /// section.
    pub fn section(
        &mut self,
        start: &DateTimeLOpt,
        end: &DateTimeLOpt,
    ) -> Result<&[LogLine]> {
        defn!("({:?}, {:?}, {:?})", self.path, start, end);
        if range_is_empty(start, end) || self.is_empty()? {
            defx!("empty range or empty file");
            return Ok(&[]);
        }
        if start.is_none() && end.is_none() {
            defx!("unbounded");
            return self.lines();
        }
        let seg_start: DateTimeL = self.start()?;
        let seg_end: DateTimeL = self.end()?;
        if end.map_or(false, |end| end <= seg_start) || start.map_or(false, |start| start > seg_end) {
            defx!("outside of [{}, {}]", seg_start, seg_end);
            return Ok(&[]);
        }
        if start.map_or(true, |start| start <= seg_start) && end.map_or(true, |end| end > seg_end) {
            defx!("entirely within");
            return self.lines();
        }
        let format: Rc<TimestampFormat> = self.format()?;
        let lines: &[LogLine] = self.lines()?;
        let (begin, finish) = section_bounds(&format, lines, start, end);
        defx!("lines[{}..{}]", begin, finish);

        Ok(&lines[begin..finish])
    }
}
