pub mod exif;
pub mod name;
pub mod video;

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, warn};

use crate::media::{MediaRecord, MediaType};

/// Failure while consulting a single metadata source. Distinct from the
/// source simply having no data, which is an `Ok` with absent fields.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read metadata: {0}")]
    Read(String),
    #[error("unparseable value {value:?}: {reason}")]
    Parse { value: String, reason: String },
}

/// Raw string values of the three image datetime tags.
#[derive(Debug, Default, Clone)]
pub struct ImageTags {
    pub date_time: Option<String>,
    pub date_time_original: Option<String>,
    pub date_time_digitized: Option<String>,
}

/// Embedded-metadata access, injectable so the pipeline is testable
/// without real media decoding.
pub trait MetadataReader: Send + Sync {
    /// Datetime tag values embedded in an image, raw strings.
    fn image_tags(&self, path: &Path) -> Result<ImageTags, SourceError>;
    /// Encoded-date property of a video container, raw string form with
    /// a trailing six-character timezone offset.
    fn video_encoded_date(&self, path: &Path) -> Result<Option<String>, SourceError>;
}

/// Default reader backed by the embedded EXIF and track metadata of the
/// files themselves.
pub struct EmbeddedReader;

impl MetadataReader for EmbeddedReader {
    fn image_tags(&self, path: &Path) -> Result<ImageTags, SourceError> {
        exif::read_image_tags(path)
    }

    fn video_encoded_date(&self, path: &Path) -> Result<Option<String>, SourceError> {
        video::read_encoded_date(path)
    }
}

/// Candidate source label, in canonical tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLabel {
    DateTimeOriginal,
    DateTimeDigitized,
    DateTime,
    DateTimeCreated,
    NameDateTime,
    DateTimeModified,
}

/// Labeled candidate timestamps for one file. All fields are
/// independently optional; `date_time_modified` is populated on every
/// file whose filesystem metadata is readable.
#[derive(Debug, Default, Clone)]
pub struct CandidateDates {
    pub date_time: Option<NaiveDateTime>,
    pub date_time_original: Option<NaiveDateTime>,
    pub date_time_digitized: Option<NaiveDateTime>,
    pub date_time_created: Option<NaiveDateTime>,
    pub name_date_time: Option<NaiveDateTime>,
    pub date_time_modified: Option<NaiveDateTime>,
}

impl CandidateDates {
    /// Candidates in tie-break priority order.
    pub fn iter(&self) -> impl Iterator<Item = (DateLabel, NaiveDateTime)> + '_ {
        [
            (DateLabel::DateTimeOriginal, self.date_time_original),
            (DateLabel::DateTimeDigitized, self.date_time_digitized),
            (DateLabel::DateTime, self.date_time),
            (DateLabel::DateTimeCreated, self.date_time_created),
            (DateLabel::NameDateTime, self.name_date_time),
            (DateLabel::DateTimeModified, self.date_time_modified),
        ]
        .into_iter()
        .filter_map(|(label, dt)| dt.map(|dt| (label, dt)))
    }

    /// Whether any source other than the filesystem mtime contributed.
    /// A record where this is false carries no real capture-date signal
    /// and is classified undated downstream.
    pub fn has_source_beyond_mtime(&self) -> bool {
        self.iter().any(|(label, _)| label != DateLabel::DateTimeModified)
    }
}

/// Parse an image tag value in `YYYY:MM:DD HH:MM:SS` form. Tag renderers
/// disagree on the separator, so everything is normalized to colons
/// first.
fn parse_tag_datetime(value: &str) -> Result<NaiveDateTime, SourceError> {
    let cleaned = value
        .replace('-', ":")
        .replace('/', ":")
        .replace('\\', ":")
        .replace('.', ":");
    NaiveDateTime::parse_from_str(&cleaned, "%Y:%m:%d %H:%M:%S").map_err(|e| SourceError::Parse {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a video encoded-date string: the fixed six-character timezone
/// suffix is dropped and the remainder read as `YYYY-MM-DD HH:MM:SS`.
fn parse_encoded_date(value: &str) -> Result<NaiveDateTime, SourceError> {
    let trimmed = value
        .get(..value.len().saturating_sub(6))
        .unwrap_or(value);
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S").map_err(|e| SourceError::Parse {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Fill the record's candidate set from every available source. Never
/// fails: each source degrades independently to "absent" with a log
/// line, and the record proceeds with whatever was obtained.
pub fn gather_dates(record: &mut MediaRecord, reader: &dyn MetadataReader) {
    match record.media_type {
        MediaType::Image => match reader.image_tags(&record.path) {
            Ok(tags) => {
                let assign = |raw: Option<String>, slot: &mut Option<NaiveDateTime>| {
                    if let Some(raw) = raw {
                        match parse_tag_datetime(&raw) {
                            Ok(dt) => *slot = Some(dt),
                            Err(e) => warn!(path = %record.path.display(), %e, "bad image tag"),
                        }
                    }
                };
                let mut dates = record.dates.clone();
                assign(tags.date_time, &mut dates.date_time);
                assign(tags.date_time_original, &mut dates.date_time_original);
                assign(tags.date_time_digitized, &mut dates.date_time_digitized);
                record.dates = dates;
            }
            Err(e) => debug!(path = %record.path.display(), %e, "no image metadata"),
        },
        MediaType::Video => match reader.video_encoded_date(&record.path) {
            Ok(Some(raw)) => match parse_encoded_date(&raw) {
                Ok(dt) => record.dates.date_time_created = Some(dt),
                Err(e) => warn!(path = %record.path.display(), %e, "bad encoded date"),
            },
            Ok(None) => {}
            Err(e) => debug!(path = %record.path.display(), %e, "no video metadata"),
        },
        MediaType::Unsupported => {}
    }

    match fs::metadata(&record.path).and_then(|m| m.modified()) {
        Ok(mtime) => {
            let local: DateTime<Local> = mtime.into();
            record.dates.date_time_modified = Some(local.naive_local());
        }
        Err(e) => warn!(path = %record.path.display(), %e, "mtime unreadable"),
    }

    record.dates.name_date_time = name::date_from_filename(&record.name);
}
