//! Core data model for the curation pipeline.
//!
//! The raw sources (image list, class files, tag file, tag matrix) are loaded
//! into the types below and then joined once into a [`Catalog`] of
//! [`ImageRecord`]s, so later stages never index parallel arrays by hand.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::ids::{ClassId, ImageIndex};
use crate::error::TagsplitError;

/// Dense row-major binary matrix; rows are images, columns are classes or tags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BinaryMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

/// Image × class matrix built from the per-class files.
pub type LabelMatrix = BinaryMatrix;

/// Image × tag occurrence matrix.
pub type TagMatrix = BinaryMatrix;

impl BinaryMatrix {
    /// Creates an all-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Builds a matrix from explicit rows. Returns `None` when rows differ in width.
    pub fn from_rows(rows: &[Vec<bool>]) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }

        Some(Self {
            rows: rows.len(),
            cols,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the cell value; out-of-range cells read as zero.
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: bool) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = value;
        }
    }

    /// Returns one row as a slice, or an empty slice when out of range.
    pub fn row(&self, row: usize) -> &[bool] {
        if row >= self.rows {
            return &[];
        }
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Number of positive cells in a row.
    pub fn row_sum(&self, row: usize) -> usize {
        self.row(row).iter().filter(|cell| **cell).count()
    }

    /// Ascending column numbers of the positive cells in a row.
    pub fn positive_columns(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        self.row(row)
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell)
            .map(|(col, _)| col)
    }
}

/// Class names indexed by label-matrix column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassDictionary {
    names: Vec<String>,
}

impl ClassDictionary {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, id: ClassId) -> Option<&str> {
        self.names.get(id.as_usize()).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(idx, name)| (ClassId::new(idx), name.as_str()))
    }
}

/// Derives a class name from a class file name: the text after the final
/// underscore, cut at the first dot (`Labels_animal.txt` -> `animal`).
pub fn class_name_from_file(file_name: &str) -> String {
    let tail = file_name.rsplit('_').next().unwrap_or(file_name);
    tail.split('.').next().unwrap_or(tail).to_string()
}

/// Ordered image paths; position `i` is the canonical index of image `i`.
#[derive(Clone, Debug, Default)]
pub struct ImageList {
    pub source: PathBuf,
    pub paths: Vec<String>,
}

impl ImageList {
    /// Creates an image list that was not read from disk.
    pub fn new(paths: Vec<String>) -> Self {
        Self {
            source: PathBuf::from("<memory>"),
            paths,
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// One line of the tag file: a leading identifier followed by tag tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagLine {
    pub identifier: Option<String>,
    pub tags: Vec<String>,
}

impl TagLine {
    /// Splits a raw tag-file line on whitespace.
    pub fn parse(line: &str) -> Self {
        let mut tokens = line.split_whitespace();
        let identifier = tokens.next().map(str::to_string);
        Self {
            identifier,
            tags: tokens.map(str::to_string).collect(),
        }
    }
}

/// Tag lines in image-list order.
#[derive(Clone, Debug, Default)]
pub struct TagLines {
    pub source: PathBuf,
    pub lines: Vec<TagLine>,
}

impl TagLines {
    /// Creates tag lines that were not read from disk.
    pub fn new(lines: Vec<TagLine>) -> Self {
        Self {
            source: PathBuf::from("<memory>"),
            lines,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Everything known about one image, joined from the aligned sources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRecord {
    pub index: ImageIndex,
    pub path: String,
    /// Ascending class ids with a positive label.
    pub labels: Vec<ClassId>,
    /// Leading token of the tag line, used only for the identity check.
    pub tag_identifier: Option<String>,
    pub tags: Vec<String>,
}

impl ImageRecord {
    /// Identifier embedded in this image's file name.
    pub fn image_identifier(&self) -> Option<&str> {
        image_identifier(&self.path)
    }

    /// True when the tag line and the image path name the same image.
    pub fn identity_matches(&self) -> bool {
        match (self.tag_identifier.as_deref(), self.image_identifier()) {
            (Some(tag_id), Some(image_id)) => tag_id == image_id,
            _ => false,
        }
    }
}

/// Extracts the identifier from an image path: the file stem's second
/// underscore-delimited token (`actor/0001_2124494179.jpg` -> `2124494179`).
pub fn image_identifier(path: &str) -> Option<&str> {
    let file_name = path.rsplit(['/', '\\']).next()?;
    let stem = match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[..dot],
        _ => file_name,
    };
    stem.split('_').nth(1).filter(|id| !id.is_empty())
}

/// The joined, immutable view of the dataset used by every later stage.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub images: Vec<ImageRecord>,
    pub classes: ClassDictionary,
}

impl Catalog {
    /// Joins the image list, label matrix and tag lines row by row.
    ///
    /// Fails when either source disagrees with the label matrix on the number
    /// of images, because any offset would silently attach the wrong labels.
    pub fn assemble(
        images: ImageList,
        labels: &LabelMatrix,
        classes: ClassDictionary,
        tag_lines: TagLines,
    ) -> Result<Self, TagsplitError> {
        ensure_rows("Image list", &images.source, labels.rows(), images.len())?;
        ensure_rows("Tag file", &tag_lines.source, labels.rows(), tag_lines.len())?;

        let records = images
            .paths
            .into_iter()
            .zip(tag_lines.lines)
            .enumerate()
            .map(|(row, (path, tag_line))| ImageRecord {
                index: ImageIndex::new(row),
                path,
                labels: labels.positive_columns(row).map(ClassId::new).collect(),
                tag_identifier: tag_line.identifier,
                tags: tag_line.tags,
            })
            .collect();

        Ok(Self {
            images: records,
            classes,
        })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, index: ImageIndex) -> Option<&ImageRecord> {
        self.images.get(index.as_usize())
    }
}

/// Checks that an aligned source has exactly as many rows as the label matrix.
pub fn ensure_rows(
    what: &'static str,
    path: &Path,
    expected: usize,
    found: usize,
) -> Result<(), TagsplitError> {
    if expected != found {
        return Err(TagsplitError::SourceLengthMismatch {
            what,
            path: path.to_path_buf(),
            expected,
            found,
        });
    }
    Ok(())
}
