//! # Utility Functions Module
//!
//! Helpers for building external command lines. Arguments are collected as
//! `OsString` so that non UTF-8 paths reach the encoder untouched.

use std::ffi::{OsStr, OsString};

/// Converts an iterable of `OsStr`-like items to `Vec<OsString>`.
///
/// # Example
/// ```rust,ignore
/// use std::path::Path;
/// use crate::utils::to_os_string_vec;
///
/// let input = Path::new("videos/a.mp4");
/// let args = to_os_string_vec([OsStr::new("-i"), input.as_os_str()]);
/// ```
pub fn to_os_string_vec<T, I>(items: I) -> Vec<OsString>
where
    T: AsRef<OsStr>,
    I: IntoIterator<Item = T>,
{
    items.into_iter().map(|item| item.as_ref().to_os_string()).collect()
}

/// Builds an argument vector from strings, paths and owned strings alike.
///
/// Numbers must be formatted first (`quality.to_string()`).
///
/// # Example
/// ```rust,ignore
/// use crate::os_args;
///
/// let quality = 5;
/// let args = os_args!["-i", input, "-q", quality.to_string()];
/// ```
#[macro_export]
macro_rules! os_args {
    [$($item:expr),* $(,)?] => {
        $crate::utils::to_os_string_vec([$(::std::ffi::OsStr::new(&$item)),*])
    };
}

/// Last `lines` lines of a process stream, for error messages
pub fn tail_lines(output: &[u8], lines: usize) -> String {
    let text = String::from_utf8_lossy(output);
    let collected: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = collected.len().saturating_sub(lines);
    collected[start..].join("\n")
}
