//! Curation configuration.
//!
//! Options come from an optional YAML file and from command-line flags; flags
//! win. Both are parsed into a [`CurateConfig`] of optional fields, layered,
//! and then resolved into the [`CurateOptions`] the pipeline runs on.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::data::io_image_list::DEFAULT_STRIP_PREFIX;
use crate::error::TagsplitError;
use crate::partition::PartitionStrategy;
use crate::serialize::MismatchPolicy;

/// Fully resolved options for one curation run.
#[derive(Clone, Debug)]
pub struct CurateOptions {
    /// Folder of per-class indicator files.
    pub label_folder: PathBuf,
    /// Image × tag occurrence matrix.
    pub tag_matrix: PathBuf,
    /// Tag text file, identifier first on every line.
    pub tag_file: PathBuf,
    pub image_list: PathBuf,
    /// Image root for the existence audit; no audit when absent.
    pub image_root: Option<PathBuf>,
    pub output: PathBuf,
    /// Train size; absent means one shuffled record file of every valid image.
    pub train_size: Option<usize>,
    pub seed: Option<u64>,
    pub strategy: PartitionStrategy,
    pub on_mismatch: MismatchPolicy,
    /// Root prefix removed from image-list entries.
    pub strip_prefix: String,
}

/// Partially specified options, as read from a config file or the CLI.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurateConfig {
    pub label_folder: Option<PathBuf>,
    pub tag_matrix: Option<PathBuf>,
    pub tag_file: Option<PathBuf>,
    pub image_list: Option<PathBuf>,
    pub image_root: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub train_size: Option<usize>,
    pub seed: Option<u64>,
    pub strategy: Option<PartitionStrategy>,
    pub on_mismatch: Option<MismatchPolicy>,
    pub strip_prefix: Option<String>,
}

impl CurateConfig {
    /// Load a YAML config file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, TagsplitError> {
        let data = fs::read_to_string(path)?;
        serde_yaml::from_str(&data).map_err(|source| TagsplitError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Layer `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merge(self, overrides: CurateConfig) -> CurateConfig {
        CurateConfig {
            label_folder: overrides.label_folder.or(self.label_folder),
            tag_matrix: overrides.tag_matrix.or(self.tag_matrix),
            tag_file: overrides.tag_file.or(self.tag_file),
            image_list: overrides.image_list.or(self.image_list),
            image_root: overrides.image_root.or(self.image_root),
            output: overrides.output.or(self.output),
            train_size: overrides.train_size.or(self.train_size),
            seed: overrides.seed.or(self.seed),
            strategy: overrides.strategy.or(self.strategy),
            on_mismatch: overrides.on_mismatch.or(self.on_mismatch),
            strip_prefix: overrides.strip_prefix.or(self.strip_prefix),
        }
    }

    /// Resolve into runnable options, failing on missing required inputs.
    pub fn resolve(self) -> Result<CurateOptions, TagsplitError> {
        Ok(CurateOptions {
            label_folder: required(self.label_folder, "label_folder")?,
            tag_matrix: required(self.tag_matrix, "tag_matrix")?,
            tag_file: required(self.tag_file, "tag_file")?,
            image_list: required(self.image_list, "image_list")?,
            image_root: self.image_root,
            output: required(self.output, "output")?,
            train_size: self.train_size,
            seed: self.seed,
            strategy: self.strategy.unwrap_or_default(),
            on_mismatch: self.on_mismatch.unwrap_or_default(),
            strip_prefix: self
                .strip_prefix
                .unwrap_or_else(|| DEFAULT_STRIP_PREFIX.to_string()),
        })
    }
}

fn required(value: Option<PathBuf>, key: &str) -> Result<PathBuf, TagsplitError> {
    value.ok_or_else(|| TagsplitError::InvalidConfig {
        message: format!("missing required option '{key}' (set it in the config file or on the command line)"),
    })
}
