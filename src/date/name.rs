use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::debug;

// Patterns are tried most-specific first; the first match wins and no
// later pattern is consulted. Patterns without a `time` group carry a
// date only. The dots in the clock groups are inherited from the
// original notation and match any separator character.
static RE_0: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?P<date>\d{8})-(?P<time>\d{6})").unwrap());
static RE_1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?P<date>\d{8})_(?P<time>\d{6})").unwrap());
static RE_2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?P<date>\d{4}-\d{2}-\d{2})at(?P<time>\d{2}.\d{2}.\d{2})").unwrap());
static RE_3: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?P<date>\d{4}-\d{2}-\d{2})(?P<time>\d{2}.\d{2}.\d{2})").unwrap());
static RE_4: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?P<date>\d{8})_(?P<time>\d{2}_\d{2}_\d{2})").unwrap());
static RE_5: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?P<date>\d{8})\d{3}").unwrap());
static RE_6: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?P<date>\d{8})").unwrap());

static PATTERNS: &[&LazyLock<Regex>] = &[&RE_0, &RE_1, &RE_2, &RE_3, &RE_4, &RE_5, &RE_6];

/// Keep only the ASCII digits of a matched group.
fn digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validate that an 8-digit string is a real calendar date in `YYYYMMDD`
/// form. Returns the digits unchanged on success, `None` otherwise; a
/// date with swapped day/month fields is never auto-corrected.
pub fn reformat_date(date: &str) -> Option<String> {
    let date = digits(date);
    match NaiveDate::parse_from_str(&date, "%Y%m%d") {
        Ok(_) => Some(date),
        Err(_) => None,
    }
}

/// Parse a capture date out of a file name. Spaces are stripped before
/// matching so names like `2013-09-06 16.06.06.jpg` still line up with
/// the joined date-time patterns.
pub fn date_from_filename(file_name: &str) -> Option<NaiveDateTime> {
    let name = file_name.replace(' ', "");

    for pattern in PATTERNS {
        let Some(caps) = pattern.captures(&name) else {
            continue;
        };
        let date = caps.name("date").map(|m| m.as_str()).unwrap_or_default();

        if let Some(time) = caps.name("time") {
            let joined = format!("{} {}", digits(date), digits(time.as_str()));
            match NaiveDateTime::parse_from_str(&joined, "%Y%m%d %H%M%S") {
                Ok(dt) => return Some(dt),
                Err(e) => {
                    debug!(file_name, %e, "matched name pattern did not parse");
                    return None;
                }
            }
        }

        // Date-only match: validate the calendar date, time is midnight.
        let date = reformat_date(date)?;
        let parsed = NaiveDate::parse_from_str(&date, "%Y%m%d").ok()?;
        return parsed.and_hms_opt(0, 0, 0);
    }

    debug!(file_name, "no date pattern in file name");
    None
}
