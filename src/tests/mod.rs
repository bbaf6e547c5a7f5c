// src/tests/mod.rs

//! Tests for _logscanlib_.
//!
//! Tests are placed at `src/tests/`, inside the `logscanlib`, for
//! crate-internal visibility. Tests of the public interface only are at
//! top-level path `tests/`.

pub mod common;
pub mod logsegment_tests;
