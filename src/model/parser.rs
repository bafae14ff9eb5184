// File: ./src/model/parser.rs
// Free-form token parsing for the upstream feed: pair-time strings,
// day-name tokens and academic-year strings.

use crate::model::lesson::Semester;
use chrono::NaiveTime;

/// Parse the start time out of a "HH:MM-HH:MM" pair-time string.
///
/// The feed is inconsistent about the separator and sometimes writes
/// "9.00-10.35", so dots are normalised to colons before splitting.
/// Only the start of the first half matters for slot matching.
pub fn parse_pair_start(raw: &str) -> Option<NaiveTime> {
    let normalised = raw.trim().replace('.', ":");
    let start = normalised.split('-').next()?.trim();
    let (hours, minutes) = start.split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Canonicalise a day token for map lookup: lowercased, trimmed, with
/// the stray punctuation the feed sometimes appends ("Чт.") removed.
pub fn canonical_day_token(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | '\n' | '\r'))
        .collect()
}

/// Pull the calendar year for `semester` out of a "YYYY/YYYY" academic
/// year string.
pub fn academic_year_component(academic_year: &str, semester: Semester) -> Option<i32> {
    academic_year
        .split('/')
        .map(str::trim)
        .nth(semester.year_component())?
        .parse()
        .ok()
}
