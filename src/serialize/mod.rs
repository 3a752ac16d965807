//! Record serialization with the identity check.
//!
//! Before a record is written, the identifier at the head of its tag line
//! must equal the identifier embedded in its image file name. A mismatch
//! means the positional alignment of the sources is already broken, so by
//! default the whole file is abandoned.
//!
//! Records are written to a temporary file next to the target and renamed
//! into place only after a complete flush. An aborted run therefore never
//! leaves a file under the final name.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::curate::{CurationReport, IssueCode, OutputSummary};
use crate::data::io_atomic::{remove_stale, write_atomically};
use crate::data::io_records::Record;
use crate::data::{Catalog, ImageIndex, ImageRecord};
use crate::error::TagsplitError;

/// What to do when a tag line does not match its image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MismatchPolicy {
    /// Fail the run; no file is produced.
    #[default]
    Abort,
    /// Leave the record out and report it.
    Skip,
}

/// Verify that the tag line and the image path describe the same image.
pub fn check_identity(image: &ImageRecord) -> Result<(), TagsplitError> {
    if image.identity_matches() {
        return Ok(());
    }

    Err(TagsplitError::IntegrityViolation {
        index: image.index,
        path: image.path.clone(),
        tag_identifier: image.tag_identifier.clone(),
        image_identifier: image.image_identifier().map(str::to_string),
    })
}

/// Write one record per index, in the given order, to `path`.
///
/// On error nothing is left under `path`; a stale file from an earlier run
/// is removed as well so it cannot be mistaken for this run's output.
pub fn write_records(
    path: &Path,
    indices: &[ImageIndex],
    catalog: &Catalog,
    policy: MismatchPolicy,
    report: &mut CurationReport,
) -> Result<OutputSummary, TagsplitError> {
    info!("Writing records into {}", path.display());

    match write_records_atomically(path, indices, catalog, policy) {
        Ok(summary) => {
            if !summary.skipped.is_empty() {
                report.warning(
                    IssueCode::IntegritySkipped,
                    format!(
                        "{}: skipped {} record(s) whose tag identifier did not match the image (first index {})",
                        path.display(),
                        summary.skipped.len(),
                        summary.skipped[0]
                    ),
                );
            }
            report.outputs.push(summary.clone());
            Ok(summary)
        }
        Err(err) => {
            remove_stale(path);
            Err(err)
        }
    }
}

fn write_records_atomically(
    path: &Path,
    indices: &[ImageIndex],
    catalog: &Catalog,
    policy: MismatchPolicy,
) -> Result<OutputSummary, TagsplitError> {
    write_atomically(path, |out| {
        let mut written = 0;
        let mut skipped = Vec::new();

        for &index in indices {
            let image = catalog
                .get(index)
                .ok_or_else(|| TagsplitError::RecordFormat {
                    index,
                    message: format!("index is outside the {}-image catalog", catalog.len()),
                })?;

            if let Err(err) = check_identity(image) {
                match policy {
                    MismatchPolicy::Abort => return Err(err),
                    MismatchPolicy::Skip => {
                        debug!("skipping record: {}", err);
                        skipped.push(index.as_usize());
                        continue;
                    }
                }
            }

            let record = Record::from_image(image);
            record.validate()?;
            writeln!(out, "{}", record)?;
            written += 1;
        }

        Ok(OutputSummary {
            path: path.to_path_buf(),
            written,
            skipped,
        })
    })
}
