use chrono::{Datelike, NaiveDateTime};

use crate::date::CandidateDates;
use crate::media::MediaType;

/// Candidates dated before this year are treated as corrupt-metadata
/// sentinels (epoch zero, camera clock resets) and never selected.
pub const MIN_VALID_YEAR: i32 = 2000;

/// Pick the canonical date: the minimum candidate with a qualifying
/// year. Equal minimums resolve to the higher-priority label because
/// iteration follows the fixed label order and only a strictly smaller
/// timestamp displaces the current best. Returns `None` when no
/// candidate qualifies.
pub fn resolve_earliest(dates: &CandidateDates) -> Option<NaiveDateTime> {
    let mut best: Option<NaiveDateTime> = None;
    for (_, dt) in dates.iter() {
        if dt.year() < MIN_VALID_YEAR {
            continue;
        }
        match best {
            Some(current) if dt >= current => {}
            _ => best = Some(dt),
        }
    }
    best
}

/// Strip the trailing midnight marker from a synthesized name. A time
/// of exactly 00:00:00 means "no time known", not "midnight sharp".
/// Idempotent.
pub fn remove_time_from_filename(name: &str) -> String {
    let mut name = name;
    while let Some(stripped) = name.strip_suffix("_000000") {
        name = stripped;
    }
    name.to_string()
}

/// Normalized base name (no extension) for a resolved record:
/// `{img|vid}_{YYYYMMDD_HHMMSS}`, with the midnight suffix removed.
pub fn build_base_name(media_type: MediaType, earliest: NaiveDateTime) -> String {
    let stamped = format!(
        "{}_{}",
        media_type.name_prefix(),
        earliest.format("%Y%m%d_%H%M%S")
    );
    remove_time_from_filename(&stamped)
}

/// Year/month/day path components of a canonical date, zero-padded.
pub fn date_partition(dt: NaiveDateTime) -> (String, String, String) {
    (
        format!("{}", dt.year()),
        format!("{:02}", dt.month()),
        format!("{:02}", dt.day()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_earliest_qualifying_candidate_wins() {
        let mut dates = CandidateDates::default();
        dates.date_time_modified = Some(dt(2023, 7, 24, 21, 7, 32));
        dates.name_date_time = Some(dt(2016, 10, 30, 0, 0, 0));
        dates.date_time_original = Some(dt(2016, 10, 30, 10, 53, 16));
        assert_eq!(resolve_earliest(&dates), Some(dt(2016, 10, 30, 0, 0, 0)));
    }

    #[test]
    fn test_pre_2000_candidates_excluded() {
        let mut dates = CandidateDates::default();
        dates.date_time = Some(dt(1970, 1, 1, 0, 0, 0));
        dates.date_time_modified = Some(dt(2023, 7, 24, 21, 7, 32));
        assert_eq!(resolve_earliest(&dates), Some(dt(2023, 7, 24, 21, 7, 32)));
    }

    #[test]
    fn test_all_pre_2000_fails_resolution() {
        let mut dates = CandidateDates::default();
        dates.date_time = Some(dt(1970, 1, 1, 0, 0, 0));
        dates.date_time_modified = Some(dt(1999, 12, 31, 23, 59, 59));
        assert_eq!(resolve_earliest(&dates), None);
        assert_eq!(resolve_earliest(&CandidateDates::default()), None);
    }

    #[test]
    fn test_tie_break_follows_label_priority() {
        let shared = dt(2016, 10, 30, 10, 53, 16);
        let mut dates = CandidateDates::default();
        dates.date_time = Some(shared);
        dates.date_time_digitized = Some(shared);
        dates.date_time_original = Some(shared);
        // All equal; the resolved value is the shared minimum either way,
        // but the scan must not panic or skip candidates.
        assert_eq!(resolve_earliest(&dates), Some(shared));
    }

    #[test]
    fn test_base_name_with_time() {
        assert_eq!(
            build_base_name(MediaType::Image, dt(2016, 12, 15, 19, 1, 11)),
            "img_20161215_190111"
        );
        assert_eq!(
            build_base_name(MediaType::Video, dt(2016, 12, 15, 19, 1, 11)),
            "vid_20161215_190111"
        );
    }

    #[test]
    fn test_base_name_midnight_stripped() {
        assert_eq!(
            build_base_name(MediaType::Image, dt(2016, 10, 30, 0, 0, 0)),
            "img_20161030"
        );
    }

    #[test]
    fn test_remove_time_is_idempotent() {
        let once = remove_time_from_filename("img_20161030_000000");
        let twice = remove_time_from_filename(&once);
        assert_eq!(once, "img_20161030");
        assert_eq!(once, twice);
        // A doubled suffix must vanish in a single application.
        let doubled = remove_time_from_filename("img_20161030_000000_000000");
        assert_eq!(doubled, "img_20161030");
        assert_eq!(remove_time_from_filename(&doubled), doubled);
        assert_eq!(
            remove_time_from_filename("img_20230724_210732"),
            "img_20230724_210732"
        );
    }

    #[test]
    fn test_date_partition_zero_pads() {
        let (y, m, d) = date_partition(dt(2016, 1, 5, 0, 0, 0));
        assert_eq!((y.as_str(), m.as_str(), d.as_str()), ("2016", "01", "05"));
    }
}
