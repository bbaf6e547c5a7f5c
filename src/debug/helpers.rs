// src/debug/helpers.rs

//! Miscellaneous helper functions for testing; temporary log files and
//! rotated logs.

use std::io::Write; // for `NamedTempFile.write_all`
use std::path::PathBuf;

use crate::common::FPath;
use crate::readers::helpers::path_to_fpath;

use ::flate2::write::GzEncoder;
use ::flate2::Compression;
use ::lazy_static::lazy_static;
use ::si_trace_print::{dpfo, dpfñ};

#[doc(hidden)]
pub use ::tempfile::NamedTempFile;
#[doc(hidden)]
pub use ::tempfile::TempDir;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary file helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// NamedTempFile instances default to this file name prefix.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-logscan-test-";

lazy_static! {
    pub static ref STRING_TEMPFILE_PREFIX: String = String::from(STR_TEMPFILE_PREFIX);
}

/// Small helper function for copying `NamedTempFile` path to a `FPath`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    path_to_fpath(ntf.path())
}

/// Testing helper function to write a `[u8]` to a temporary file with
/// `suffix`.
pub fn create_temp_file_bytes_with_suffix(
    data: &[u8],
    suffix: &str,
) -> NamedTempFile {
    let mut ntf = match ::tempfile::Builder::new()
        // use known prefix for easier cleanup
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .suffix::<str>(suffix)
        .tempfile()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("tempfile::Builder::new()..tempfile() return Err {}", err);
        }
    };
    match ntf.write_all(data) {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::write_all() return Err {}", err);
        }
    }
    dpfñ!("{:?} {} bytes", ntf.path(), data.len());

    ntf
}

/// Testing helper function to write a `[u8]` to a temporary file.
pub fn create_temp_file_bytes(data: &[u8]) -> NamedTempFile {
    create_temp_file_bytes_with_suffix(data, "")
}

/// Testing helper function to write a `str` to a temporary file.
pub fn create_temp_file(data: &str) -> NamedTempFile {
    create_temp_file_bytes(data.as_bytes())
}

/// Testing helper function to write a `str` gzip-compressed to a temporary
/// file ending `.gz`.
pub fn create_temp_file_gz(data: &str) -> NamedTempFile {
    create_temp_file_bytes_with_suffix(&gz_compress(data.as_bytes()), ".gz")
}

/// Create a temporary directory
pub fn create_temp_dir() -> TempDir {
    dpfñ!();
    match ::tempfile::Builder::new()
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempdir()
    {
        Ok(val) => val,
        Err(err) => panic!("tempfile::Builder::new()..tempdir() return Err {}", err),
    }
}

/// Compress `data` with gzip.
pub fn gz_compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::<u8>::new(), Compression::default());
    match encoder.write_all(data) {
        Ok(_) => {}
        Err(err) => panic!("GzEncoder::write_all() return Err {}", err),
    }
    match encoder.finish() {
        Ok(val) => val,
        Err(err) => panic!("GzEncoder::finish() return Err {}", err),
    }
}

/// Testing helper function to write a `[u8]` to file `name` in the passed
/// `TempDir`. Returns the path of the file.
pub fn create_file_bytes_name_in_tmpdir(
    data: &[u8],
    name: &str,
    tempdir: &TempDir,
) -> FPath {
    let path: PathBuf = tempdir.path().join(name);
    dpfo!("File::create({:?})", path);
    if let Err(err) = std::fs::write(&path, data) {
        panic!("Error {:?} writing {:?}", err, path);
    }

    path_to_fpath(path.as_path())
}

/// Testing helper function to write a `str` to file `name` in the passed
/// `TempDir`; compressed with gzip if `name` ends with `.gz`.
pub fn create_file_name_in_tmpdir(
    data: &str,
    name: &str,
    tempdir: &TempDir,
) -> FPath {
    if name.ends_with(".gz") {
        create_file_bytes_name_in_tmpdir(&gz_compress(data.as_bytes()), name, tempdir)
    } else {
        create_file_bytes_name_in_tmpdir(data.as_bytes(), name, tempdir)
    }
}

/// Testing helper to create a `TempDir` holding a rotated log.
///
/// `files` are `(name, data)` pairs, e.g. `("app.log.1", "…")`. Returns the
/// `TempDir` and the path of `base` within it.
pub fn create_rotated_log_in_tmpdir(
    base: &str,
    files: &[(&str, &str)],
) -> (TempDir, FPath) {
    let tmpdir = create_temp_dir();
    for (name, data) in files.iter() {
        create_file_name_in_tmpdir(data, name, &tmpdir);
    }
    let fpath: FPath = path_to_fpath(tmpdir.path().join(base).as_path());
    dpfñ!("{:?}", fpath);

    (tmpdir, fpath)
}
