use std::path::Path;

use nom_exif::{EntryValue, MediaParser, MediaSource, TrackInfo, TrackInfoTag};

use crate::date::SourceError;

/// Read the encoded date out of a video container's track metadata.
/// The value is rendered back to its property-store string form, local
/// clock time followed by a six-character timezone offset, so the
/// extractor applies the same suffix-stripping parse to every source.
pub fn read_encoded_date(path: &Path) -> Result<Option<String>, SourceError> {
    let mut parser = MediaParser::new();

    let source = MediaSource::file_path(path).map_err(|e| SourceError::Read(e.to_string()))?;
    if !source.has_track() {
        return Ok(None);
    }

    let info: TrackInfo = parser
        .parse(source)
        .map_err(|e| SourceError::Read(e.to_string()))?;

    let rendered = match info.get(TrackInfoTag::CreateDate) {
        Some(EntryValue::Time(dt)) => Some(dt.format("%Y-%m-%d %H:%M:%S%:z").to_string()),
        Some(EntryValue::NaiveDateTime(dt)) => {
            Some(format!("{}+00:00", dt.format("%Y-%m-%d %H:%M:%S")))
        }
        _ => None,
    };

    Ok(rendered)
}
