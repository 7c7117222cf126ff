use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{In, Reader, Tag};

use crate::date::{ImageTags, SourceError};

/// Read the three datetime tags out of an image's embedded metadata.
/// Tags the image does not carry are simply left absent; an unreadable
/// file or container is an error so the caller can tell the two apart.
pub fn read_image_tags(path: &Path) -> Result<ImageTags, SourceError> {
    let file = File::open(path).map_err(|e| SourceError::Read(e.to_string()))?;
    let reader = Reader::new()
        .read_from_container(&mut BufReader::new(file))
        .map_err(|e| SourceError::Read(e.to_string()))?;

    let field_value = |tag: Tag| {
        reader
            .get_field(tag, In::PRIMARY)
            .map(|f| f.display_value().to_string())
    };

    Ok(ImageTags {
        date_time: field_value(Tag::DateTime),
        date_time_original: field_value(Tag::DateTimeOriginal),
        date_time_digitized: field_value(Tag::DateTimeDigitized),
    })
}
