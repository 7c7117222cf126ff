use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::ledger::{file_checksum, ChecksumLedger};
use crate::media::MediaRecord;
use crate::resolve::date_partition;

/// Mutually exclusive destination categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationClass {
    Regular,
    Duplicate,
    Undated,
}

/// Final write path for one record.
#[derive(Debug)]
pub struct PlannedCopy {
    pub path: PathBuf,
    pub class: DestinationClass,
}

/// Split a file name into stem and extension (extension keeps its dot,
/// a leading dot does not start one).
fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(0) | None => (name, ""),
        Some(i) => (&name[..i], &name[i..]),
    }
}

/// Trailing two-digit counter of `stem` relative to `base`, if any.
fn counter_suffix(stem: &str, base: &str) -> Option<u32> {
    let rest = stem.strip_prefix(base)?.strip_prefix('_')?;
    if rest.len() == 2 && rest.bytes().all(|b| b.is_ascii_digit()) {
        rest.parse().ok()
    } else {
        None
    }
}

/// Resolve a naming collision inside one destination folder.
///
/// An existing file with the same stem is renamed in place to carry a
/// `_01` counter and the incoming name gets `_02`, so both coexist.
/// When counter-suffixed siblings already exist the incoming name gets
/// the next free counter. Otherwise the proposed name is returned
/// unchanged. The folder listing is sorted so the outcome does not
/// depend on directory iteration order.
pub fn handle_counter(proposed: &str, dir: &Path) -> std::io::Result<String> {
    let (base, ext) = split_name(proposed);

    let mut entries: Vec<String> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();

    for entry in &entries {
        let (entry_base, entry_ext) = split_name(entry);

        if entry_base == base {
            // The rename target must not land on an occupied counter, so
            // the existing file takes the next free one and the incoming
            // file the one after. With no counters present this is the
            // plain _01/_02 pair.
            let next = entries
                .iter()
                .filter_map(|e| counter_suffix(split_name(e).0, base))
                .max()
                .unwrap_or(0)
                + 1;
            let renamed = format!("{base}_{next:02}{entry_ext}");
            fs::rename(dir.join(entry), dir.join(&renamed))?;
            return Ok(format!("{base}_{:02}{ext}", next + 1));
        }

        if entry_base.starts_with(base) {
            let counter = entries
                .iter()
                .filter_map(|e| counter_suffix(split_name(e).0, base))
                .max()
                .unwrap_or(1);
            return Ok(format!("{base}_{:02}{ext}", counter + 1));
        }
    }

    Ok(proposed.to_string())
}

/// Decide where a record lands, in priority order: undated, duplicate,
/// regular. Destination folders are created lazily here and the chosen
/// name is collision-resolved, so the returned path never overwrites an
/// existing file. Undated records never touch the ledger.
pub fn plan_destination(
    record: &MediaRecord,
    output_root: &Path,
    ledger: &mut ChecksumLedger,
) -> anyhow::Result<PlannedCopy> {
    let resolved = record
        .earliest_date
        .filter(|_| record.dates.has_source_beyond_mtime())
        .zip(record.new_base_name.as_deref());

    let Some((earliest, base)) = resolved else {
        let dir = output_root.join("to_check");
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating {}", dir.display()))?;
        let name = handle_counter(&record.name, &dir)
            .with_context(|| format!("listing {}", dir.display()))?;
        return Ok(PlannedCopy {
            path: dir.join(name),
            class: DestinationClass::Undated,
        });
    };

    // The regular destination name is fixed before the duplicate check;
    // a rerouted duplicate keeps it.
    let file_name = format!("{base}.{}", record.extension);
    let (year, month, day) = date_partition(earliest);

    let hash = file_checksum(&record.path)
        .with_context(|| format!("hashing {}", record.path.display()))?;

    let (dir, class) = if ledger.record_and_check(hash, &record.path) {
        (
            output_root.join("repeated").join(&year).join(&month).join(&day),
            DestinationClass::Duplicate,
        )
    } else {
        (
            output_root.join(&year).join(&month).join(&day),
            DestinationClass::Regular,
        )
    };

    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let name = handle_counter(&file_name, &dir)
        .with_context(|| format!("listing {}", dir.display()))?;

    Ok(PlannedCopy {
        path: dir.join(name),
        class,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::media::MediaRecord;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_counter_no_collision() {
        let dir = tempfile::tempdir().unwrap();
        let name = handle_counter("img_20161215_190111.jpg", dir.path()).unwrap();
        assert_eq!(name, "img_20161215_190111.jpg");
    }

    #[test]
    fn test_counter_exact_match_renames_existing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("img_20161215.jpg"), b"first").unwrap();

        let name = handle_counter("img_20161215.jpg", dir.path()).unwrap();
        assert_eq!(name, "img_20161215_02.jpg");
        assert!(dir.path().join("img_20161215_01.jpg").exists());
        assert!(!dir.path().join("img_20161215.jpg").exists());
    }

    #[test]
    fn test_counter_rename_skips_occupied_counter() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo.jpg"), b"CONTENT-A").unwrap();
        std::fs::write(dir.path().join("photo_01.jpg"), b"CONTENT-B").unwrap();

        let name = handle_counter("photo.jpg", dir.path()).unwrap();
        assert_eq!(name, "photo_03.jpg");
        // The distinct pre-existing counter file keeps its contents; the
        // bare name moved to the next free counter.
        assert_eq!(
            std::fs::read(dir.path().join("photo_01.jpg")).unwrap(),
            b"CONTENT-B"
        );
        assert_eq!(
            std::fs::read(dir.path().join("photo_02.jpg")).unwrap(),
            b"CONTENT-A"
        );
        assert!(!dir.path().join("photo.jpg").exists());
    }

    #[test]
    fn test_counter_increments_past_existing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("img_20161215_01.jpg"), b"a").unwrap();
        std::fs::write(dir.path().join("img_20161215_02.jpg"), b"b").unwrap();

        let name = handle_counter("img_20161215.jpg", dir.path()).unwrap();
        assert_eq!(name, "img_20161215_03.jpg");
    }

    #[test]
    fn test_undated_uses_original_name() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("random_no_date_pattern.jpg");
        std::fs::write(&src, b"pixels").unwrap();
        let out = dir.path().join("out");

        let mut record = MediaRecord::new("random_no_date_pattern.jpg".into(), src);
        record.dates.date_time_modified = Some(dt(2023, 7, 24, 21, 7, 32));
        record.earliest_date = Some(dt(2023, 7, 24, 21, 7, 32));
        record.new_base_name = Some("img_20230724_210732".into());

        let mut ledger = ChecksumLedger::new();
        let plan = plan_destination(&record, &out, &mut ledger).unwrap();
        assert_eq!(plan.class, DestinationClass::Undated);
        assert_eq!(plan.path, out.join("to_check").join("random_no_date_pattern.jpg"));
        // Undated records are invisible to duplicate detection.
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_duplicate_rerouted_to_repeated() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("A.jpg");
        let second = dir.path().join("B.jpg");
        std::fs::write(&first, b"identical pixels").unwrap();
        std::fs::write(&second, b"identical pixels").unwrap();
        let out = dir.path().join("out");

        let mut ledger = ChecksumLedger::new();
        for (path, name) in [(&first, "A.jpg"), (&second, "B.jpg")] {
            let mut record = MediaRecord::new(name.to_string(), path.clone());
            record.dates.name_date_time = Some(dt(2016, 12, 15, 19, 1, 11));
            record.dates.date_time_modified = Some(dt(2023, 7, 24, 21, 7, 32));
            record.earliest_date = Some(dt(2016, 12, 15, 19, 1, 11));
            record.new_base_name = Some("img_20161215_190111".into());

            let plan = plan_destination(&record, &out, &mut ledger).unwrap();
            if path == &first {
                assert_eq!(plan.class, DestinationClass::Regular);
                assert_eq!(
                    plan.path,
                    out.join("2016").join("12").join("15").join("img_20161215_190111.jpg")
                );
                std::fs::write(&plan.path, b"identical pixels").unwrap();
            } else {
                assert_eq!(plan.class, DestinationClass::Duplicate);
                assert_eq!(
                    plan.path,
                    out.join("repeated")
                        .join("2016")
                        .join("12")
                        .join("15")
                        .join("img_20161215_190111.jpg")
                );
            }
        }
    }
}
