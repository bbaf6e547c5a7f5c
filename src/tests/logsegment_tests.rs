// src/tests/logsegment_tests.rs

//! tests for `logsegment.rs`

#![allow(non_snake_case)]

use std::io::Cursor;
use std::rc::Rc;

use crate::common::{FPath, LogLine, LogscanError};
use crate::data::datetime::{DateTimeLOpt, TimestampFormat};
use crate::debug::helpers::{
    create_temp_file,
    create_temp_file_gz,
    ntf_fpath,
};
use crate::readers::logsegment::{
    last_line_in_buffer,
    section_bounds,
    LogSegment,
    TAIL_WINDOW_SZ,
};
use crate::tests::common::{
    dt_opt,
    options_utc,
    ymdhms,
    FO_0,
    NOW_2024_06,
};

use ::lazy_static::lazy_static;
use ::more_asserts::assert_gt;
use ::test_case::test_case;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const LOG1: &str = "\
2024-01-02 00:00:00 a
2024-01-02 01:00:00 b
    continuation of b
2024-01-02 02:00:00 c
2024-01-02 03:00:00 d
";

const LOG1_NO_NL: &str = "\
2024-01-02 00:00:00 a
2024-01-02 03:00:00 d";

lazy_static! {
    static ref LONG_LAST_LINE: String = {
        let mut data = String::from("2024-01-02 00:00:00 a\n2024-01-02 01:00:00 ");
        data.push_str(&"x".repeat(TAIL_WINDOW_SZ as usize * 3));
        data.push('\n');
        data
    };
}

fn new_segment(path: &FPath) -> LogSegment {
    LogSegment::new(path.clone(), Rc::new(options_utc())).unwrap()
}

fn strs(lines: &[LogLine]) -> Vec<String> {
    lines
        .iter()
        .map(|line| String::from_utf8_lossy(line).to_string())
        .collect()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test_case(b"", true, Some(b"".as_slice()); "empty at start")]
#[test_case(b"", false, None; "empty")]
#[test_case(b"abc", true, Some(b"abc".as_slice()); "one line no newline")]
#[test_case(b"abc\n", true, Some(b"abc\n".as_slice()); "one line")]
#[test_case(b"abc\n", false, None; "one line not at start")]
#[test_case(b"abc\ndef\n", false, Some(b"def\n".as_slice()); "two lines")]
#[test_case(b"abc\ndef", false, Some(b"def".as_slice()); "two lines no newline")]
#[test_case(b"abc\n\n", false, Some(b"\n".as_slice()); "empty last line")]
fn test_last_line_in_buffer(
    buffer: &[u8],
    at_start: bool,
    expect: Option<&[u8]>,
) {
    let line = last_line_in_buffer(buffer, at_start);
    assert_eq!(line.as_deref(), expect);
}

#[test_case(None, None, 0, 5; "unbounded")]
#[test_case(dt_opt(2024, 1, 2, 1, 0, 0), dt_opt(2024, 1, 2, 3, 0, 0), 1, 4; "untimed line inside")]
#[test_case(dt_opt(2024, 1, 2, 0, 30, 0), dt_opt(2024, 1, 2, 2, 0, 0), 1, 3; "end equal excluded")]
#[test_case(dt_opt(2024, 1, 2, 1, 30, 0), None, 3, 5; "untimed line before start")]
#[test_case(None, dt_opt(2024, 1, 2, 1, 30, 0), 0, 3; "untimed line before end")]
#[test_case(dt_opt(2024, 1, 2, 5, 0, 0), None, 5, 5; "nothing")]
fn test_section_bounds(
    start: DateTimeLOpt,
    end: DateTimeLOpt,
    expect_begin: usize,
    expect_finish: usize,
) {
    let format = TimestampFormat::new("%Y-%m-%d %H:%M:%S", *FO_0, *NOW_2024_06).unwrap();
    let lines: Vec<LogLine> = LOG1
        .split_inclusive('\n')
        .map(|line| line.as_bytes().to_vec())
        .collect();
    let (begin, finish) = section_bounds(&format, &lines, &start, &end);
    assert_eq!((begin, finish), (expect_begin, expect_finish));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogSegment
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn test_LogSegment_new_missing() {
    let path = FPath::from("/this/path/does/not/exist.log");
    match LogSegment::new(path.clone(), Rc::new(options_utc())) {
        Err(LogscanError::SourceRead { path: path_, .. }) => assert_eq!(path_, path),
        other => panic!("expected SourceRead, got {:?}", other),
    }
}

#[test]
fn test_LogSegment_first_last_line() {
    let ntf = create_temp_file(LOG1);
    let mut segment = new_segment(&ntf_fpath(&ntf));
    assert!(segment.is_open());
    assert!(!segment.is_gz());
    assert_eq!(segment.first_line().unwrap(), b"2024-01-02 00:00:00 a\n");
    assert_eq!(segment.last_line().unwrap(), b"2024-01-02 03:00:00 d\n");
    assert!(!segment.is_empty().unwrap());
}

#[test]
fn test_LogSegment_last_line_no_newline() {
    let ntf = create_temp_file(LOG1_NO_NL);
    let mut segment = new_segment(&ntf_fpath(&ntf));
    assert_eq!(segment.last_line().unwrap(), b"2024-01-02 03:00:00 d");
    assert_eq!(segment.end().unwrap(), ymdhms(&FO_0, 2024, 1, 2, 3, 0, 0));
}

#[test]
fn test_LogSegment_last_line_window_grows() {
    let ntf = create_temp_file(&LONG_LAST_LINE);
    let mut segment = new_segment(&ntf_fpath(&ntf));
    let line: Vec<u8> = segment.last_line().unwrap().to_vec();
    assert!(line.starts_with(b"2024-01-02 01:00:00 xxx"));
    assert_eq!(line.len(), 20 + TAIL_WINDOW_SZ as usize * 3 + 1);
    // the window doubled at least twice
    assert_gt!(segment.count_reads(), 2);
    assert_eq!(segment.end().unwrap(), ymdhms(&FO_0, 2024, 1, 2, 1, 0, 0));
}

#[test]
fn test_LogSegment_start_end() {
    let ntf = create_temp_file(LOG1);
    let mut segment = new_segment(&ntf_fpath(&ntf));
    assert_eq!(segment.start().unwrap(), ymdhms(&FO_0, 2024, 1, 2, 0, 0, 0));
    assert_eq!(segment.end().unwrap(), ymdhms(&FO_0, 2024, 1, 2, 3, 0, 0));
    assert!(segment.start().unwrap() <= segment.end().unwrap());
    assert_eq!(segment.format().unwrap().timecode(), "%Y-%m-%d %H:%M:%S");
}

#[test]
fn test_LogSegment_lines_idempotent() {
    let ntf = create_temp_file(LOG1);
    let mut segment = new_segment(&ntf_fpath(&ntf));
    let lines1: Vec<String> = strs(segment.lines().unwrap());
    let reads: u64 = segment.count_reads();
    let lines2: Vec<String> = strs(segment.lines().unwrap());
    assert_eq!(lines1, lines2);
    assert_eq!(segment.count_reads(), reads);
    assert_eq!(lines1.len(), 5);
    assert_eq!(lines1[2], "    continuation of b\n");
}

#[test]
fn test_LogSegment_close_reopen() {
    let ntf = create_temp_file(LOG1);
    let mut segment = new_segment(&ntf_fpath(&ntf));
    assert_eq!(segment.first_line().unwrap(), b"2024-01-02 00:00:00 a\n");
    segment.close();
    assert!(!segment.is_open());
    // cached
    let reads: u64 = segment.count_reads();
    assert_eq!(segment.first_line().unwrap(), b"2024-01-02 00:00:00 a\n");
    assert_eq!(segment.count_reads(), reads);
    assert!(!segment.is_open());
    // not cached; opened again
    assert_eq!(segment.lines().unwrap().len(), 5);
    assert!(segment.is_open());
    segment.close();
    segment.close();
    assert!(!segment.is_open());
}

#[test]
fn test_LogSegment_empty() {
    let ntf = create_temp_file("");
    let mut segment = new_segment(&ntf_fpath(&ntf));
    assert!(segment.is_empty().unwrap());
    assert_eq!(segment.first_line().unwrap(), b"");
    assert_eq!(segment.last_line().unwrap(), b"");
    assert!(segment.lines().unwrap().is_empty());
    assert!(matches!(segment.start(), Err(LogscanError::EmptyLog { .. })));
    assert!(matches!(segment.end(), Err(LogscanError::EmptyLog { .. })));
    assert!(segment
        .section(&dt_opt(2024, 1, 1, 0, 0, 0), &None)
        .unwrap()
        .is_empty());
}

#[test]
fn test_LogSegment_no_format() {
    let ntf = create_temp_file("no timestamp\nat all\n");
    let mut segment = new_segment(&ntf_fpath(&ntf));
    assert!(matches!(segment.start(), Err(LogscanError::NoFormatDetected { .. })));
}

#[test]
fn test_LogSegment_last_line_no_timestamp() {
    let ntf = create_temp_file("2024-01-02 00:00:00 a\n    trailing continuation\n");
    let mut segment = new_segment(&ntf_fpath(&ntf));
    assert!(matches!(segment.end(), Err(LogscanError::TimestampNotFound { .. })));
}

#[test]
fn test_LogSegment_gz() {
    let ntf = create_temp_file_gz(LOG1);
    let mut segment = new_segment(&ntf_fpath(&ntf));
    assert!(segment.is_gz());
    assert_eq!(segment.first_line().unwrap(), b"2024-01-02 00:00:00 a\n");
    assert_eq!(segment.last_line().unwrap(), b"2024-01-02 03:00:00 d\n");
    let lines: Vec<String> = strs(segment.lines().unwrap());
    assert_eq!(lines.concat(), LOG1);
    assert_eq!(segment.start().unwrap(), ymdhms(&FO_0, 2024, 1, 2, 0, 0, 0));
}

#[test]
fn test_LogSegment_from_reader() {
    let reader = Cursor::new(LOG1.as_bytes().to_vec());
    let mut segment = LogSegment::from_reader(FPath::from("<stdin>"), reader, Rc::new(options_utc())).unwrap();
    assert!(segment.is_stream());
    assert!(!segment.is_open());
    assert_eq!(segment.count_reads(), 1);
    assert_eq!(segment.last_line().unwrap(), b"2024-01-02 03:00:00 d\n");
    assert_eq!(segment.end().unwrap(), ymdhms(&FO_0, 2024, 1, 2, 3, 0, 0));
    assert_eq!(segment.lines().unwrap().len(), 5);
    segment.close();
    assert_eq!(segment.count_reads(), 1);
}

#[test]
fn test_LogSegment_set_format() {
    let ntf = create_temp_file("Oct  5 10:00:00 2023 x\n");
    let mut segment = new_segment(&ntf_fpath(&ntf));
    let format = Rc::new(TimestampFormat::new("%b %d %X", *FO_0, *NOW_2024_06).unwrap());
    segment.set_format(format.clone());
    assert!(Rc::ptr_eq(&segment.format().unwrap(), &format));
    assert_eq!(segment.start().unwrap(), ymdhms(&FO_0, 2023, 10, 5, 10, 0, 0));
}

#[test_case(None, None, &["a", "b", "    continuation of b", "c", "d"]; "unbounded")]
#[test_case(dt_opt(2024, 1, 2, 1, 0, 0), dt_opt(2024, 1, 2, 3, 0, 0), &["b", "    continuation of b", "c"]; "middle")]
#[test_case(dt_opt(2024, 1, 2, 0, 30, 0), dt_opt(2024, 1, 2, 2, 0, 0), &["b", "    continuation of b"]; "end excluded")]
#[test_case(dt_opt(2024, 1, 2, 1, 30, 0), None, &["c", "d"]; "from")]
#[test_case(None, dt_opt(2024, 1, 2, 1, 30, 0), &["a", "b", "    continuation of b"]; "until")]
#[test_case(dt_opt(2024, 1, 2, 3, 0, 0), None, &["d"]; "start equals end of segment")]
#[test_case(dt_opt(2023, 1, 1, 0, 0, 0), dt_opt(2025, 1, 1, 0, 0, 0), &["a", "b", "    continuation of b", "c", "d"]; "covers")]
#[test_case(None, dt_opt(2024, 1, 2, 0, 0, 0), &[]; "end equals start of segment")]
#[test_case(dt_opt(2024, 1, 2, 3, 0, 1), None, &[]; "after")]
#[test_case(dt_opt(2024, 1, 2, 2, 0, 0), dt_opt(2024, 1, 2, 1, 0, 0), &[]; "reversed")]
#[test_case(dt_opt(2024, 1, 2, 1, 0, 0), dt_opt(2024, 1, 2, 1, 0, 0), &[]; "equal bounds")]
fn test_LogSegment_section(
    start: DateTimeLOpt,
    end: DateTimeLOpt,
    expect: &[&str],
) {
    let ntf = create_temp_file(LOG1);
    let mut segment = new_segment(&ntf_fpath(&ntf));
    let lines: Vec<String> = strs(segment.section(&start, &end).unwrap());
    let lines: Vec<&str> = lines
        .iter()
        .map(|line| {
            let line = line.trim_end_matches('\n');
            line.strip_prefix("2024-01-02 ").map_or(line, |l| &l[9..])
        })
        .collect();
    assert_eq!(lines, expect);
}

#[test]
fn test_LogSegment_section_unbounded_equals_lines() {
    let ntf = create_temp_file(LOG1);
    let mut segment = new_segment(&ntf_fpath(&ntf));
    let section: Vec<String> = strs(segment.section(&None, &None).unwrap());
    let lines: Vec<String> = strs(segment.lines().unwrap());
    assert_eq!(section, lines);
}

#[test]
fn test_LogSegment_section_unbounded_last_line_no_timestamp() {
    let ntf = create_temp_file("2024-01-02 00:00:00 a\n2024-01-02 01:00:00 b\n    at trace line\n");
    let mut segment = new_segment(&ntf_fpath(&ntf));
    let section: Vec<String> = strs(segment.section(&None, &None).unwrap());
    assert_eq!(section.len(), 3);
    assert_eq!(section[2], "    at trace line\n");
    // a bounded section still needs the end
    assert!(matches!(
        segment.section(&dt_opt(2024, 1, 2, 0, 30, 0), &None),
        Err(LogscanError::TimestampNotFound { .. })
    ));
}

#[test]
fn test_LogSegment_section_fast_reject_reads_no_lines() {
    let ntf = create_temp_file(LOG1);
    let mut segment = new_segment(&ntf_fpath(&ntf));
    segment.start().unwrap();
    segment.end().unwrap();
    let reads: u64 = segment.count_reads();
    assert!(segment
        .section(&dt_opt(2025, 1, 1, 0, 0, 0), &None)
        .unwrap()
        .is_empty());
    assert_eq!(segment.count_reads(), reads);
}
