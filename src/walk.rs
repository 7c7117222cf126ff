use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::date::{gather_dates, MetadataReader};
use crate::ledger::ChecksumLedger;
use crate::media::{MediaRecord, MediaType};
use crate::planner::{plan_destination, DestinationClass};
use crate::resolve::{build_base_name, resolve_earliest};

/// Per-run outcome counts.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunSummary {
    pub files_seen: u64,
    pub regular: u64,
    pub duplicates: u64,
    pub undated: u64,
    pub unsupported: u64,
    pub copy_failures: u64,
}

/// Copy a file into place through a temporary sibling, so a crash
/// mid-copy never leaves a half-written file under the final name.
fn copy_into_place(src: &Path, dest: &Path) -> std::io::Result<()> {
    let mut tmp = dest.as_os_str().to_owned();
    tmp.push(".part");
    if let Err(e) = fs::copy(src, &tmp) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, dest)
}

/// Walk the input tree and organize every regular file into the output
/// tree. Each file gets a fresh record; nothing carries over between
/// iterations except the checksum ledger. Per-source metadata failures
/// and copy failures are file-local; traversal and destination-planning
/// I/O errors abort the run.
pub fn organize(
    input: &Path,
    output: &Path,
    reader: &dyn MetadataReader,
) -> anyhow::Result<RunSummary> {
    let mut ledger = ChecksumLedger::new();
    let mut summary = RunSummary::default();

    for entry in WalkDir::new(input) {
        let entry = entry.with_context(|| format!("walking {}", input.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        summary.files_seen += 1;

        let name = entry.file_name().to_string_lossy().into_owned();
        let mut record = MediaRecord::new(name, entry.path().to_path_buf());

        if record.media_type == MediaType::Unsupported {
            warn!(path = %record.path.display(), ext = %record.extension, "unsupported media type, skipping");
            summary.unsupported += 1;
            continue;
        }

        gather_dates(&mut record, reader);
        record.earliest_date = resolve_earliest(&record.dates);
        if let Some(earliest) = record.earliest_date {
            record.new_base_name = Some(build_base_name(record.media_type, earliest));
        }

        let plan = plan_destination(&record, output, &mut ledger)?;
        match plan.class {
            DestinationClass::Regular => summary.regular += 1,
            DestinationClass::Duplicate => summary.duplicates += 1,
            DestinationClass::Undated => summary.undated += 1,
        }

        // Copy failures are recoverable per-file noise; the walk goes on.
        match copy_into_place(&record.path, &plan.path) {
            Ok(()) => debug!(
                src = %record.path.display(),
                dest = %plan.path.display(),
                "copied"
            ),
            Err(e) => {
                error!(src = %record.path.display(), dest = %plan.path.display(), %e, "copy failed");
                summary.copy_failures += 1;
            }
        }
    }

    info!(
        files_seen = summary.files_seen,
        regular = summary.regular,
        duplicates = summary.duplicates,
        undated = summary.undated,
        unsupported = summary.unsupported,
        copy_failures = summary.copy_failures,
        "run complete"
    );
    Ok(summary)
}
