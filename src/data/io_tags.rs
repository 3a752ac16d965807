//! Tag file reader: one line per image, identifier first, then tags.

use std::fs;
use std::path::Path;

use super::model::{TagLine, TagLines};
use crate::error::TagsplitError;

/// Reads the tag file. Blank lines are kept so positions stay aligned.
pub fn read_tag_lines(path: &Path) -> Result<TagLines, TagsplitError> {
    let content = fs::read_to_string(path)?;
    Ok(TagLines {
        source: path.to_path_buf(),
        lines: content.lines().map(TagLine::parse).collect(),
    })
}
