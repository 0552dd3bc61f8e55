// Utility helpers for parsing, name folding and number formatting.
//
// This module centralizes all the "dirty" cell handling so the rest of the
// code can assume typed values or an explicit `None`.
use chrono::{NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// A cell counts as missing when it is absent or contains only whitespace.
pub fn is_blank(s: Option<&str>) -> bool {
    s.map_or(true, |v| v.trim().is_empty())
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    // Spreadsheet exports often write whole numbers as `34.0`.
    let s = s.strip_suffix(".0").unwrap_or(s);
    s.parse::<i32>().ok()
}

/// Parse a death date, accepting the ISO and day-first layouts seen in
/// spreadsheet exports. A time component is accepted and discarded.
///
/// Returns `None` for blank or unparseable input; callers decide whether that
/// was a coercion (non-blank input) or a genuinely empty cell.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Fold a municipality name into its join key: strip diacritics, lowercase,
/// collapse whitespace runs and trim.
///
/// Both sides of the geo-join must go through this function.
pub fn normalize_name(input: &str) -> String {
    let folded: String = input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn format_percent(n: f64) -> String {
    if !n.is_finite() {
        return "0.00%".to_string();
    }
    format!("{:.2}%", n * 100.0)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in console messages
    // (e.g., `4,512 rows loaded`).
    n.to_formatted_string(&Locale::en)
}
