use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::date::CandidateDates;

/// Media kind, derived solely from the normalized file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Video,
    Unsupported,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "3gp"];

impl MediaType {
    pub fn from_extension(ext: &str) -> Self {
        if IMAGE_EXTENSIONS.contains(&ext) {
            MediaType::Image
        } else if VIDEO_EXTENSIONS.contains(&ext) {
            MediaType::Video
        } else {
            MediaType::Unsupported
        }
    }

    /// Prefix used when synthesizing normalized names.
    pub fn name_prefix(self) -> &'static str {
        match self {
            MediaType::Video => "vid",
            _ => "img",
        }
    }
}

/// Lower-cased extension of a file name, with `jpeg` folded into `jpg`.
/// A name without a dot yields the whole lower-cased name.
pub fn normalize_extension(file_name: &str) -> String {
    let ext = file_name.rsplit('.').next().unwrap_or(file_name);
    let ext = ext.to_ascii_lowercase();
    if ext == "jpeg" {
        "jpg".to_string()
    } else {
        ext
    }
}

/// Per-file working state, built fresh at walk-loop entry and discarded
/// at loop exit. Never reused between files.
#[derive(Debug, Clone)]
pub struct MediaRecord {
    /// Original file name
    pub name: String,
    /// Absolute source path
    pub path: PathBuf,
    /// Normalized extension (no dot)
    pub extension: String,
    pub media_type: MediaType,
    /// Labeled candidate timestamps from all sources
    pub dates: CandidateDates,
    /// Canonical date, set by the resolver
    pub earliest_date: Option<NaiveDateTime>,
    /// Normalized name without extension, set by the namer
    pub new_base_name: Option<String>,
}

impl MediaRecord {
    pub fn new(name: String, path: PathBuf) -> Self {
        let extension = normalize_extension(&name);
        let media_type = MediaType::from_extension(&extension);
        Self {
            name,
            path,
            extension,
            media_type,
            dates: CandidateDates::default(),
            earliest_date: None,
            new_base_name: None,
        }
    }
}
