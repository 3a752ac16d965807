//! Per-class indicator files and the class dictionary.
//!
//! A label folder holds one file per class. Each file is a column of 0/1
//! values, one per image in image-list order. Files are read in sorted
//! file-name order, which fixes the class-id assignment.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use super::io_atomic::write_atomically;
use super::io_matrix::parse_indicator;
use super::model::{class_name_from_file, BinaryMatrix, ClassDictionary, LabelMatrix};
use crate::curate::{CurationReport, IssueCode};
use crate::error::TagsplitError;

/// Output of the label-matrix builder.
#[derive(Clone, Debug)]
pub struct LabelSet {
    pub matrix: LabelMatrix,
    pub classes: ClassDictionary,
    /// Class files in column order.
    pub files: Vec<PathBuf>,
}

/// Reads every class file in `folder` into a label matrix.
///
/// The first file's row count is the reference; any file with a different
/// count is rejected. Observations (class/image counts, the maximum number of
/// labels on one image) are recorded on `report`.
pub fn read_label_folder(
    folder: &Path,
    report: &mut CurationReport,
) -> Result<LabelSet, TagsplitError> {
    let files = list_class_files(folder)?;
    let Some(reference) = files.first() else {
        return Err(TagsplitError::LabelFolderEmpty {
            path: folder.to_path_buf(),
        });
    };

    let mut first_column = Some(read_indicator_file(reference)?);
    let image_count = first_column.as_ref().map_or(0, Vec::len);
    let mut matrix = BinaryMatrix::zeros(image_count, files.len());
    let mut names = Vec::with_capacity(files.len());
    info!("There are {} labels, {} images", files.len(), image_count);

    for (class_idx, file) in files.iter().enumerate() {
        let column = match first_column.take() {
            Some(column) => column,
            None => read_indicator_file(file)?,
        };

        if column.len() != matrix.rows() {
            return Err(TagsplitError::LabelRowCountMismatch {
                path: file.clone(),
                reference: reference.clone(),
                expected: matrix.rows(),
                found: column.len(),
            });
        }

        for (row, value) in column.into_iter().enumerate() {
            matrix.set(row, class_idx, value);
        }

        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = class_name_from_file(&file_name);
        debug!("class {} <- {}", class_idx, file_name);
        names.push(name);
    }

    let max_labels = (0..matrix.rows())
        .map(|row| matrix.row_sum(row))
        .max()
        .unwrap_or(0);
    info!("max labels associated to one image is {}", max_labels);

    report.counts.images = matrix.rows();
    report.counts.classes = names.len();
    report.counts.max_labels_per_image = max_labels;
    report.info(
        IssueCode::LabelMatrixBuilt,
        format!(
            "{} class file(s) merged into a {}x{} label matrix; max labels on one image is {}",
            files.len(),
            matrix.rows(),
            matrix.cols(),
            max_labels
        ),
    );

    Ok(LabelSet {
        matrix,
        classes: ClassDictionary::new(names),
        files,
    })
}

/// Lists regular, non-hidden files directly inside `folder`, sorted by name.
pub fn list_class_files(folder: &Path) -> Result<Vec<PathBuf>, TagsplitError> {
    if !folder.is_dir() {
        return Err(TagsplitError::LabelFolderRead {
            path: folder.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| TagsplitError::LabelFolderRead {
            path: folder.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if entry.file_type().is_file() && !hidden {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}

fn read_indicator_file(path: &Path) -> Result<Vec<bool>, TagsplitError> {
    let content = fs::read_to_string(path)?;
    let mut column = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value =
            parse_indicator(trimmed).map_err(|message| TagsplitError::MatrixParse {
                path: path.to_path_buf(),
                line: line_idx + 1,
                message,
            })?;
        column.push(value);
    }

    Ok(column)
}

/// Writes `{class_id}\t{class_name}` lines in class-id order.
pub fn write_class_dictionary(path: &Path, classes: &ClassDictionary) -> Result<(), TagsplitError> {
    write_atomically(path, |out| {
        for (id, name) in classes.iter() {
            writeln!(out, "{}\t{}", id, name)?;
        }
        Ok(())
    })
}

/// Reads a class dictionary written by [`write_class_dictionary`].
///
/// Tab- and space-delimited lines are both accepted; ids must be contiguous
/// from zero.
pub fn read_class_dictionary(path: &Path) -> Result<ClassDictionary, TagsplitError> {
    let content = fs::read_to_string(path)?;
    let mut names = Vec::new();

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

        let (id, name) = trimmed
            .split_once(['\t', ' '])
            .ok_or_else(|| parse_err("expected '<class_id> <class_name>'".to_string()))?;
        let id: usize = id
            .parse()
            .map_err(|_| parse_err(format!("invalid class id '{id}'")))?;
        if id != names.len() {
            return Err(parse_err(format!(
                "class id {id} out of order; expected {}",
                names.len()
            )));
        }
        names.push(name.trim().to_string());
    }

    Ok(ClassDictionary::new(names))
}
