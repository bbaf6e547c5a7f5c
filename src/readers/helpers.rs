// src/readers/helpers.rs

//! Miscellaneous helper functions for _Readers_.

use std;

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::common::{
    FPath,
    FPaths,
    FileSz,
    SUFFIX_GZ,
};

/// Helper function for a slightly annoying set of calls.
pub fn path_to_fpath(path: &std::path::Path) -> FPath {
    // `PathBuf` to `String` https://stackoverflow.com/q/37388107/471376
    (*(path.to_string_lossy())).to_string()
}

/// Helper function for completeness.
pub fn fpath_to_path(path: &FPath) -> &std::path::Path {
    std::path::Path::new(path)
}

/// Return the size of the file.
pub fn path_filesz(path: &std::path::Path) -> Option<FileSz> {
    defn!("({:?})", path);
    let metadata = match std::fs::metadata(path) {
        Ok(val) => val,
        Err(_err) => {
            defx!("error {}, return None", _err);
            return None;
        }
    };
    let len: FileSz = metadata.len();
    defx!("return {}", len);

    Some(len)
}

/// Is the file gzip-compressed? Decided by the file name suffix.
pub fn fpath_is_gz(path: &FPath) -> bool {
    path.ends_with(SUFFIX_GZ)
}

/// The two candidate paths of rotation `index` of `base`,
/// e.g. `("app.log.2", "app.log.2.gz")`.
pub fn rotated_fpaths(
    base: &FPath,
    index: usize,
) -> (FPath, FPath) {
    let plain: FPath = format!("{}.{}", base, index);
    let gz: FPath = format!("{}{}", plain, SUFFIX_GZ);

    (plain, gz)
}

/// Find the rotated files of `base`; `base.1`, `base.2`, … (preferring the
/// plain file over the `.gz` file) until an index where neither exists.
///
/// Returned oldest-first with `base` last. A missing rotation file ends the
/// search and is not an error.
pub fn discover_rotated(base: &FPath) -> FPaths {
    defn!("({:?})", base);
    let mut fpaths: FPaths = vec![base.clone()];
    let mut index: usize = 1;
    loop {
        let (plain, gz) = rotated_fpaths(base, index);
        if fpath_to_path(&plain).is_file() {
            defo!("found {:?}", plain);
            fpaths.push(plain);
        } else if fpath_to_path(&gz).is_file() {
            defo!("found {:?}", gz);
            fpaths.push(gz);
        } else {
            break;
        }
        index += 1;
    }
    fpaths.reverse();
    defx!("return {:?}", fpaths);

    fpaths
}
