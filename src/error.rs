use std::path::PathBuf;
use thiserror::Error;

use crate::data::ImageIndex;

/// The main error type for tagsplit operations.
#[derive(Debug, Error)]
pub enum TagsplitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Label folder {path} contains no class files")]
    LabelFolderEmpty { path: PathBuf },

    #[error("Failed to list label folder {path}: {message}")]
    LabelFolderRead { path: PathBuf, message: String },

    #[error(
        "Class file {path} has {found} row(s) but {reference} has {expected}; every class file must cover the same images"
    )]
    LabelRowCountMismatch {
        path: PathBuf,
        reference: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("{what} at {path} has {found} row(s), expected {expected} to stay aligned with the label matrix")]
    SourceLengthMismatch {
        what: &'static str,
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("Failed to parse {path} at line {line}: {message}")]
    MatrixParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Requested train size {requested} exceeds the {available} valid image(s)")]
    TrainSizeExceedsValid { requested: usize, available: usize },

    #[error("Invalid partition parameters: {message}")]
    InvalidPartitionParams { message: String },

    #[error(
        "Integrity violation at index {index} ({path}): tag line identifier {tag_identifier:?} does not match image identifier {image_identifier:?}"
    )]
    IntegrityViolation {
        index: ImageIndex,
        path: String,
        tag_identifier: Option<String>,
        image_identifier: Option<String>,
    },

    #[error("Cannot serialize record for index {index}: {message}")]
    RecordFormat { index: ImageIndex, message: String },

    #[error("Failed to parse record file {path} at line {line}: {message}")]
    RecordParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to serialize report as JSON: {source}")]
    ReportSerialize {
        #[source]
        source: serde_json::Error,
    },
}
