//! Whitespace-delimited 0/1 matrix files (the tag occurrence matrix).

use std::fs;
use std::path::Path;

use super::model::{BinaryMatrix, TagMatrix};
use crate::error::TagsplitError;

/// Reads a whitespace-delimited integer matrix, one image per line.
///
/// Blank lines are skipped. Every row must have the same width as the first.
pub fn read_tag_matrix(path: &Path) -> Result<TagMatrix, TagsplitError> {
    let content = fs::read_to_string(path)?;
    from_matrix_str(&content, path)
}

/// Parses matrix text; `path` is used only for error context.
pub fn from_matrix_str(content: &str, path: &Path) -> Result<BinaryMatrix, TagsplitError> {
    let mut rows: Vec<Vec<bool>> = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let parse_err = |message: String| TagsplitError::MatrixParse {
            path: path.to_path_buf(),
            line: line_idx + 1,
            message,
        };

        let row = trimmed
            .split_whitespace()
            .map(parse_indicator)
            .collect::<Result<Vec<bool>, String>>()
            .map_err(parse_err)?;

        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(parse_err(format!(
                    "row has {} column(s), expected {}",
                    row.len(),
                    first.len()
                )));
            }
        }

        rows.push(row);
    }

    BinaryMatrix::from_rows(&rows).ok_or_else(|| TagsplitError::MatrixParse {
        path: path.to_path_buf(),
        line: 0,
        message: "matrix rows are not rectangular".to_string(),
    })
}

/// Parses one matrix cell. Any strictly positive number counts as present.
pub(crate) fn parse_indicator(token: &str) -> Result<bool, String> {
    if let Ok(value) = token.parse::<i64>() {
        return Ok(value > 0);
    }
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value > 0.0),
        _ => Err(format!("invalid indicator '{token}'; expected 0 or 1")),
    }
}
