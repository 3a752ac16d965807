//! Record file format.
//!
//! One line per image:
//!
//! ```text
//! {index} {path} {label ids...}#$$#{tags...}
//! ```
//!
//! `index` is the image's position in the original image list, label ids are
//! ascending label-matrix columns, and the literal `#$$#` separates labels
//! from tags. Older test partitions were written with a `:` glued to the
//! path token; the reader strips it.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use super::ids::{ClassId, ImageIndex};
use super::io_atomic::write_atomically;
use super::model::ImageRecord;
use crate::error::TagsplitError;

/// Separator between the label segment and the tag segment.
pub const RECORD_DELIMITER: &str = "#$$#";

/// One serialized image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub index: ImageIndex,
    pub path: String,
    pub labels: Vec<ClassId>,
    pub tags: Vec<String>,
}

impl Record {
    pub fn from_image(image: &ImageRecord) -> Self {
        Self {
            index: image.index,
            path: image.path.clone(),
            labels: image.labels.clone(),
            tags: image.tags.clone(),
        }
    }

    /// Checks that the record can be written without making the line ambiguous.
    pub fn validate(&self) -> Result<(), TagsplitError> {
        let fail = |message: String| TagsplitError::RecordFormat {
            index: self.index,
            message,
        };

        if self.path.is_empty() {
            return Err(fail("image path is empty".to_string()));
        }
        if self.path.chars().any(char::is_whitespace) {
            return Err(fail(format!("image path '{}' contains whitespace", self.path)));
        }
        if self.path.ends_with(':') {
            return Err(fail(format!(
                "image path '{}' ends with ':', which reads back as the legacy path marker",
                self.path
            )));
        }
        if self.path.contains(RECORD_DELIMITER) {
            return Err(fail(format!(
                "image path '{}' contains the delimiter {RECORD_DELIMITER}",
                self.path
            )));
        }
        if let Some(tag) = self.tags.iter().find(|tag| tag.contains(RECORD_DELIMITER)) {
            return Err(fail(format!(
                "tag '{tag}' contains the delimiter {RECORD_DELIMITER}"
            )));
        }
        if let Some(tag) = self
            .tags
            .iter()
            .find(|tag| tag.is_empty() || tag.chars().any(char::is_whitespace))
        {
            return Err(fail(format!("tag {tag:?} is empty or contains whitespace")));
        }

        Ok(())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.index, self.path)?;
        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", label)?;
        }
        f.write_str(RECORD_DELIMITER)?;
        f.write_str(&self.tags.join(" "))
    }
}

/// Reads every record in a record file. Blank lines are skipped.
pub fn read_records(path: &Path) -> Result<Vec<Record>, TagsplitError> {
    let content = fs::read_to_string(path)?;
    from_records_str(&content, path)
}

/// Parses record-file text; `path` is used only for error context.
pub fn from_records_str(content: &str, path: &Path) -> Result<Vec<Record>, TagsplitError> {
    let mut records = Vec::new();
    for (line_idx, line) in content.lines().enumerate() {
        if let Some(record) = parse_record_line(line, path, line_idx + 1)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Parses one record line. Returns `Ok(None)` for blank lines.
pub fn parse_record_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<Option<Record>, TagsplitError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let parse_err = |message: String| TagsplitError::RecordParse {
        path: file_path.to_path_buf(),
        line: line_num,
        message,
    };

    let (head, tail) = line
        .split_once(RECORD_DELIMITER)
        .ok_or_else(|| parse_err(format!("missing '{RECORD_DELIMITER}' delimiter")))?;

    let mut tokens = head.split_whitespace();
    let index_token = tokens
        .next()
        .ok_or_else(|| parse_err("missing image index".to_string()))?;
    let index = index_token
        .parse::<usize>()
        .map_err(|_| parse_err(format!("invalid image index '{index_token}'")))?;

    let raw_path = tokens
        .next()
        .ok_or_else(|| parse_err("missing image path".to_string()))?;
    let path = raw_path.strip_suffix(':').unwrap_or(raw_path);
    if path.is_empty() {
        return Err(parse_err("missing image path".to_string()));
    }

    let labels = tokens
        .map(|token| {
            token
                .parse::<usize>()
                .map(ClassId::new)
                .map_err(|_| parse_err(format!("invalid label id '{token}'")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Record {
        index: ImageIndex::new(index),
        path: path.to_string(),
        labels,
        tags: tail.split_whitespace().map(str::to_string).collect(),
    }))
}

/// Fuzz-only entrypoint for single record-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_record_line(input: &str) -> Result<(), TagsplitError> {
    let _ = parse_record_line(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}

/// Indices of the records that hold exactly one label, in file order.
pub fn single_label_indices(records: &[Record]) -> Vec<ImageIndex> {
    records
        .iter()
        .filter(|record| record.labels.len() == 1)
        .map(|record| record.index)
        .collect()
}

/// Writes one index per line.
pub fn write_index_list(path: &Path, indices: &[ImageIndex]) -> Result<(), TagsplitError> {
    write_atomically(path, |out| {
        for index in indices {
            writeln!(out, "{}", index)?;
        }
        Ok(())
    })
}
