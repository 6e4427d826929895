//! Visit-date normalization.
//!
//! Dates arrive in whatever format the data-entry source used. They are
//! tried against `ACCEPTED_FORMATS` in order and re-emitted as ISO
//! `YYYY-MM-DD`. Normalization is total: input that matches no format is
//! handed back unchanged and must be treated as opaque by the caller.

use chrono::NaiveDate;

/// Accepted input formats, highest priority first.
pub const ACCEPTED_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%m-%d-%Y"];

/// Canonical output format.
pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// Parse `s` (surrounding whitespace ignored) with the first accepted
/// format that matches.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Return `s` as an ISO date, or `s` unchanged if no format matches.
pub fn normalize_date(s: &str) -> String {
    match parse_date(s) {
        Some(date) => date.format(ISO_FORMAT).to_string(),
        None => s.to_string(),
    }
}
