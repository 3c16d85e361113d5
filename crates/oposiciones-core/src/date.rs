//! Spanish long-form date normalization
//!
//! Turns strings such as `"lunes, 5 de mayo de 2025"` into `2025-05-05`.
//! Month names are resolved from a static table, so the result does not
//! depend on the process locale.

use chrono::NaiveDate;

/// Spanish month names, lowercase, mapped to their month number.
const MONTHS: &[(&str, u32)] = &[
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("setiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
];

/// Look up a month number by its Spanish name (case-insensitive).
///
/// # Examples
/// ```
/// use oposiciones_core::date::month_number;
///
/// assert_eq!(month_number("Mayo"), Some(5));
/// assert_eq!(month_number("may"), None);
/// ```
pub fn month_number(name: &str) -> Option<u32> {
    let name = name.trim().to_lowercase();
    MONTHS
        .iter()
        .find(|(month, _)| *month == name)
        .map(|(_, number)| *number)
}

/// Parse a Spanish long-form date into a calendar date.
///
/// A leading weekday (anything up to and including the first comma) is
/// discarded, as is any trailer after a second comma such as a time of day.
/// What is left must read `<day> de <month> de <year>`.
///
/// # Returns
/// * `Some(date)` for a valid calendar date
/// * `None` for anything else, including impossible dates like 31 de febrero
pub fn parse_spanish_date(text: &str) -> Option<NaiveDate> {
    let text = match text.split(',').nth(1) {
        Some(date) => date,
        None => text,
    };

    // Rendered text may carry non-breaking or repeated spaces
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let re = regex_lite::Regex::new(r"(?i)^(\d{1,2}) de ([a-z]+) de (\d{4})$").ok()?;
    let caps = re.captures(&text)?;

    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month = month_number(caps.get(2)?.as_str())?;
    let year: i32 = caps.get(3)?.as_str().parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Normalize a Spanish long-form date to ISO `YYYY-MM-DD`.
///
/// # Examples
/// ```
/// use oposiciones_core::date::normalize_date;
///
/// assert_eq!(normalize_date("lunes, 5 de mayo de 2025"), Some("2025-05-05".to_string()));
/// assert_eq!(normalize_date(""), None);
/// ```
pub fn normalize_date(text: &str) -> Option<String> {
    parse_spanish_date(text).map(|date| date.format("%Y-%m-%d").to_string())
}
