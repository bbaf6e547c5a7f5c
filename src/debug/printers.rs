// src/debug/printers.rs

//! Printer macros and helpers for user-facing warnings and for trace
//! printing in debug and test builds.

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `d`ebug `e`println! a `w`a`rn`ing
#[macro_export]
macro_rules! de_wrn {
    (
        $($args:tt)*
    ) => {
        {
            #[cfg(any(debug_assertions,test))]
            eprint!("WARNING: ");
            #[cfg(any(debug_assertions,test))]
            eprintln!($($args)*)
        }
    }
}

/// `e`println! an `err`or
#[macro_export]
macro_rules! e_err {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("ERROR: ");
            eprintln!($($args)*)
        }
    }
}

/// `e`println! a `w`a`rn`ing
#[macro_export]
macro_rules! e_wrn {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("WARNING: ");
            eprintln!($($args)*)
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Turn passed `char` into a pictoral representation for the control
/// characters that commonly end lines, e.g. `'\n'` returns `'␊'`.
///
/// Keeps the printing width of a control character to 1, unlike `fmt::Debug`
/// backslash-escapes. Only intended to aid visual debugging.
pub const fn char_to_char_noraw(c: char) -> char {
    match c {
        '\0' => '␀',
        '\t' => '␉',
        '\n' => '␊',
        '\r' => '␍',
        _ => c,
    }
}

/// Transform a raw line into a printable `String`; invalid UTF-8 is replaced
/// and line-ending control characters are made visible.
#[allow(non_snake_case)]
pub fn buffer_to_String_noraw(buffer: &[u8]) -> String {
    String::from_utf8_lossy(buffer)
        .chars()
        .map(char_to_char_noraw)
        .collect()
}
