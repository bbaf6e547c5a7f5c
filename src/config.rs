// src/config.rs

//! Optional configuration file for [`FormatOptions`].
//!
//! A TOML file, e.g.
//!
//! ```toml
//! timecode = "%d/%b/%Y:%H:%M:%S"
//! timecodes = ["%y%m%d %H:%M:%S"]
//! tz_offset = "+01:00"
//! ```
//!
//! Every key is optional.
//!
//! [`FormatOptions`]: crate::data::datetime::FormatOptions

use std::str::FromStr;

use crate::common::{FPath, LogscanError, Result};
use crate::data::datetime::{
    timecode_to_regex_pattern,
    DateTime,
    DateTimeL,
    FixedOffset,
    FormatOptions,
    Timecode,
    Timecodes,
};
use crate::readers::helpers::fpath_to_path;

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};
use ::serde::Deserialize;

/// Contents of a configuration file.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// fixed timecode; detection is skipped
    #[serde(default)]
    pub timecode: Option<Timecode>,
    /// extra detection candidates, tried after the built-in ones
    #[serde(default)]
    pub timecodes: Vec<Timecode>,
    /// offset for timestamps that carry none, e.g. `"+01:00"`
    #[serde(default)]
    pub tz_offset: Option<String>,
}

impl Config {
    /// Read and parse the configuration file at `path`.
    pub fn from_path(path: &FPath) -> Result<Config> {
        defn!("({:?})", path);
        let contents: String = std::fs::read_to_string(fpath_to_path(path))
            .map_err(|err| LogscanError::Config {
                path: path.clone(),
                reason: err.to_string(),
            })?;
        let config = Config::from_str_at(&contents, path)?;
        defx!("{:?}", config);

        Ok(config)
    }

    fn from_str_at(contents: &str, path: &FPath) -> Result<Config> {
        let config: Config = ::toml::from_str(contents)
            .map_err(|err| LogscanError::Config {
                path: path.clone(),
                reason: err.to_string(),
            })?;
        // fail early on a bad offset or timecode
        config.tz_offset_at(path)?;
        for timecode in config.timecode.iter().chain(config.timecodes.iter()) {
            timecode_to_regex_pattern(timecode).map_err(|err| LogscanError::Config {
                path: path.clone(),
                reason: err.to_string(),
            })?;
        }

        Ok(config)
    }

    fn tz_offset_at(&self, path: &FPath) -> Result<Option<FixedOffset>> {
        match &self.tz_offset {
            None => Ok(None),
            Some(tzo) => match parse_tz_offset(tzo) {
                Some(offset) => Ok(Some(offset)),
                None => Err(LogscanError::Config {
                    path: path.clone(),
                    reason: format!("unable to parse a timezone offset from tz_offset {:?}", tzo),
                }),
            },
        }
    }

    /// The parsed `tz_offset`, if any.
    pub fn tz_offset(&self) -> Option<FixedOffset> {
        self.tz_offset
            .as_deref()
            .and_then(parse_tz_offset)
    }

    /// The built-in timecodes plus this configuration's `timecodes`.
    pub fn timecodes(&self) -> Timecodes {
        Timecodes::with_additions(self.timecodes.iter().cloned())
    }

    /// Apply this configuration to `options`.
    pub fn format_options(&self, options: FormatOptions) -> FormatOptions {
        let mut options = options.with_timecodes(self.timecodes());
        if self.timecode.is_some() {
            options = options.with_timecode(self.timecode.clone());
        }
        if let Some(offset) = self.tz_offset() {
            let now: DateTimeL = options.now.with_timezone(&offset);
            options = options.with_tz_offset(offset).with_now(now);
        }

        options
    }
}

impl FromStr for Config {
    type Err = LogscanError;

    fn from_str(contents: &str) -> Result<Config> {
        Config::from_str_at(contents, &FPath::from("<string>"))
    }
}

/// Parse a numeric timezone offset, e.g. `"+01:00"`, `"-0530"`, `"+03"`,
/// or `"Z"`.
pub fn parse_tz_offset(tzo: &str) -> Option<FixedOffset> {
    defn!("({:?})", tzo);
    let tzo: &str = tzo.trim();
    if tzo == "Z" || tzo == "z" {
        defx!("return UTC");
        return FixedOffset::east_opt(0);
    }
    // use a dummy datetime to parse the offset
    let mut data: String = String::from("2000-01-02 03:04:05 ");
    data.push_str(tzo);
    for pattern in [
        "%Y-%m-%d %H:%M:%S %:z",
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%d %H:%M:%S %#z",
    ] {
        if let Ok(dt) = DateTime::parse_from_str(data.as_str(), pattern) {
            defx!("return {:?}", dt.offset());
            return Some(*dt.offset());
        }
    }
    defx!("return None");

    None
}
