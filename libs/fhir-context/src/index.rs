//! Startup index parsing
//!
//! The index is plain text, one relative resource path per line. Blank
//! lines and `//` comments are skipped. Backslash separators are normalized
//! to `/` so one index serves every platform and packaged archives alike.

/// Parse index text into normalized relative paths.
pub fn parse_index(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .map(|line| line.replace('\\', "/"))
        .collect()
}
