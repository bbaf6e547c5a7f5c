// src/bin/logscan.rs

//! Driver program _logscan_ drives the [_logscanlib_].
//!
//! Processes user-passed command-line arguments. Then creates one
//! [`LogChain`] for the passed path (or STDIN) and prints the lines within
//! the requested datetime range to STDOUT, unchanged.
//!
//! With `--info`, prints the name, number of segments, and the start and end
//! datetimes of the log instead.
//!
//! [_logscanlib_]: logscanlib
//! [`LogChain`]: logscanlib::readers::logchain::LogChain

#![allow(non_camel_case_types)]

use std::io::{self, Write};
use std::process::ExitCode;

use ::anyhow::Context;
use ::clap::Parser;
use ::const_format::concatcp;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use ::logscanlib::common::{
    FPath,
    LogLine,
    LogscanError,
    FPATH_STDIN,
};
use ::logscanlib::config::{parse_tz_offset, Config};
use ::logscanlib::data::datetime::{
    datetime_parse_arg,
    DateTimeL,
    DateTimeLOpt,
    FixedOffset,
    FormatOptions,
};
use ::logscanlib::readers::helpers::{fpath_to_path, path_filesz};
use ::logscanlib::readers::logchain::LogChain;
use ::logscanlib::{e_err, e_wrn};

#[cfg(debug_assertions)]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "\nDEBUG BUILD";
#[cfg(not(debug_assertions))]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "";

/// `--help` _afterword_ message.
const CLI_HELP_AFTER: &str = concatcp!(
    "\
Given PATH, the rotated files PATH.1, PATH.2, … (or PATH.1.gz, PATH.2.gz, …)
are read as older parts of the same log. Files ending \".gz\" are
decompressed. Given no PATH or PATH \"-\", STDIN is read.

Lines with a datetime at or after START and before END are printed.
Lines without a datetime are printed with the lines around them.

DateTimes may be:
    \"YYYY-MM-DD HH:MM:SS\"
    \"YYYY-MM-DDTHH:MM:SS\"
    \"YYYY-MM-DD\"
    RFC 3339, e.g. \"2024-01-02T03:04:05+01:00\"
    \"@\" and Unix epoch seconds, e.g. \"@1700000000\"

A TIMECODE is a strftime-like pattern, e.g. \"%d/%b/%Y:%H:%M:%S\", or
\"timestamp\" for Unix epoch seconds with milliseconds.",
    CLI_HELP_AFTER_NOTE_DEBUG,
);

/// Parse the user-passed timezone offset.
fn cli_process_tz_offset(tzo: &str) -> std::result::Result<FixedOffset, String> {
    match parse_tz_offset(tzo) {
        Some(offset) => Ok(offset),
        None => Err(format!("Unable to parse a timezone offset for --tz-offset {:?}", tzo)),
    }
}

#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "logscan",
    // write expanded information for the `--version` output
    version = concatcp!(
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
        "Author: ", env!("CARGO_PKG_AUTHORS"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Path of the log file. Rotated files of this path are found.
    /// Pass "-" or nothing to read STDIN.
    #[clap(verbatim_doc_comment)]
    path: Option<String>,

    /// Print lines with a datetime at or after this datetime.
    #[clap(short = 's', long, verbatim_doc_comment)]
    start: Option<String>,

    /// Print lines with a datetime before this datetime.
    #[clap(short = 'e', long, verbatim_doc_comment)]
    end: Option<String>,

    /// The timecode of the log. If not passed then the timecode is detected
    /// from the first line.
    #[clap(short = 't', long, verbatim_doc_comment)]
    timecode: Option<String>,

    /// TOML configuration file with keys "timecode", "timecodes", and
    /// "tz_offset".
    #[clap(short = 'c', long, verbatim_doc_comment)]
    config: Option<String>,

    /// Default timezone offset for datetimes without a timezone, in the log
    /// and in START and END.
    /// Example values, "+12", "-0800", "+02:00", or "Z".
    /// To pass a value with leading "-" use "=" notation, e.g. "-z=-0800".
    /// If not passed then the local system timezone offset is used.
    #[clap(
        short = 'z',
        long,
        verbatim_doc_comment,
        value_parser = cli_process_tz_offset,
    )]
    tz_offset: Option<FixedOffset>,

    /// Print the name, number of files, start, and end of the log.
    #[clap(short = 'i', long, verbatim_doc_comment)]
    info: bool,

    /// Fail if the rotated files overlap in time.
    #[clap(long, verbatim_doc_comment)]
    strict: bool,
}

/// Parse a user-passed range bound.
fn cli_process_datetime(
    name: &str,
    value: &Option<String>,
    tz_offset: &FixedOffset,
) -> anyhow::Result<DateTimeLOpt> {
    match value {
        None => Ok(None),
        Some(value) => match datetime_parse_arg(value, tz_offset) {
            Some(dt) => Ok(Some(dt)),
            None => Err(anyhow::anyhow!("Unable to parse a datetime for --{} {:?}", name, value)),
        },
    }
}

/// Create the `FormatOptions` from the configuration file and arguments.
/// Arguments override the configuration file.
fn cli_format_options(args: &CLI_Args) -> anyhow::Result<FormatOptions> {
    let mut options = FormatOptions::new();
    if let Some(path) = &args.config {
        let config = Config::from_path(&FPath::from(path.as_str()))
            .with_context(|| format!("loading configuration {:?}", path))?;
        options = config.format_options(options);
    }
    if let Some(timecode) = &args.timecode {
        options = options.with_timecode(Some(timecode.clone()));
    }
    if let Some(tz_offset) = args.tz_offset {
        let now: DateTimeL = options.now.with_timezone(&tz_offset);
        options = options.with_tz_offset(tz_offset).with_now(now);
    }
    defo!("{:?}", options);

    Ok(options)
}

fn open_chain(
    path: &Option<String>,
    options: FormatOptions,
) -> anyhow::Result<LogChain> {
    match path.as_deref() {
        None | Some("-") => {
            let stdin = io::stdin();
            LogChain::from_reader(FPath::from(FPATH_STDIN), stdin.lock(), options)
                .context("reading STDIN")
        }
        Some(path) => LogChain::new(FPath::from(path), options)
            .with_context(|| format!("opening {:?}", path)),
    }
}

fn print_info(chain: &mut LogChain) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "name: {}", chain.name())?;
    writeln!(stdout, "files: {}", chain.quantity())?;
    for path in chain.paths().iter() {
        match path_filesz(fpath_to_path(path)) {
            Some(filesz) => writeln!(stdout, "  {} ({} bytes)", path, filesz)?,
            None => writeln!(stdout, "  {}", path)?,
        }
    }
    if chain.is_empty()? {
        writeln!(stdout, "empty")?;
        return Ok(());
    }
    writeln!(stdout, "timecode: {}", chain.format()?.timecode())?;
    writeln!(stdout, "start: {}", chain.start()?)?;
    writeln!(stdout, "end: {}", chain.end()?)?;

    Ok(())
}

fn print_lines(lines: &[&LogLine]) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    for line in lines.iter() {
        stdout.write_all(line)?;
    }
    stdout.flush()?;

    Ok(())
}

fn run(args: CLI_Args) -> anyhow::Result<()> {
    defn!("{:?}", args);
    let options: FormatOptions = cli_format_options(&args)?;
    let start: DateTimeLOpt = cli_process_datetime("start", &args.start, &options.tz_offset)?;
    let end: DateTimeLOpt = cli_process_datetime("end", &args.end, &options.tz_offset)?;
    let mut chain: LogChain = open_chain(&args.path, options)?;

    if args.strict {
        chain.check_order()?;
    }

    if args.info {
        print_info(&mut chain)?;
    } else {
        let lines: Vec<&LogLine> = chain.section(&start, &end)?;
        defo!("print {} lines", lines.len());
        print_lines(&lines)?;
    }
    // results are best-effort when segments overlap
    if !args.strict {
        match chain.check_order() {
            Ok(()) => {}
            Err(err @ LogscanError::SegmentsOverlap { .. }) => e_wrn!("{}", err),
            Err(err) => e_wrn!("unable to check the order of files: {}", err),
        }
    }
    chain.close();
    defx!();

    Ok(())
}

/// Process the user-passed command-line arguments and determine a process
/// return code.
pub fn main() -> ExitCode {
    let args = CLI_Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            e_err!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
