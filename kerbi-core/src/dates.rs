//! Parsing of the free-text collection date strings used by council sites.

use chrono::NaiveDate;

/// Numeric day-first format with a four-digit year.
const FORMAT_FULL_YEAR: &str = "%d/%m/%Y";
/// Numeric day-first format with a two-digit year.
const FORMAT_SHORT_YEAR: &str = "%d/%m/%y";
/// Long-form locale date, tried against the original text. The weekday name is
/// part of the format, so this branch requires it and rejects a mismatch.
const FORMAT_LONG: &str = "%A, %d %B %Y";

/// Parse a collection date like `Wed 11/2/2026` or `Monday, 10 February 2025`.
///
/// Admissible shapes, tried in order:
/// 1. optional weekday prefix plus `D/M/YYYY` (day and month may be unpadded),
/// 2. the same with a two-digit year,
/// 3. the long form `Weekday, D Month YYYY`.
///
/// Returns `None` for anything else; the caller logs and drops the entry.
#[must_use]
pub fn parse_collection_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    let numeric = strip_weekday(trimmed);

    // chrono's %Y happily eats a two-digit year (16/2/26 would become year 26),
    // so the year segment's width decides which numeric format applies.
    let numeric_format = match numeric.rsplit_once('/') {
        Some((_, year)) if year.len() >= 4 => FORMAT_FULL_YEAR,
        _ => FORMAT_SHORT_YEAR,
    };

    if let Ok(date) = NaiveDate::parse_from_str(numeric, numeric_format) {
        return Some(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, FORMAT_LONG) {
        return Some(date);
    }

    None
}

/// Strip one leading all-alphabetic token ("Wed ", "Monday ") if present.
///
/// "Monday, 10 February 2025" is untouched: the comma keeps the first token
/// from being purely alphabetic, which is what the long-form branch needs.
fn strip_weekday(text: &str) -> &str {
    match text.split_once(char::is_whitespace) {
        Some((first, rest))
            if !first.is_empty() && first.chars().all(|ch| ch.is_ascii_alphabetic()) =>
        {
            rest.trim_start()
        }
        _ => text,
    }
}
