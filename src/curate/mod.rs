//! The curation pipeline.
//!
//! Stages run strictly in sequence, each consuming the full output of the
//! previous one:
//!
//! 1. merge the class files into a label matrix and write the class dictionary,
//! 2. keep images with at least one label and one tag,
//! 3. join image list, labels and tag lines into a [`Catalog`],
//! 4. split into train/test (or shuffle everything into one file),
//! 5. serialize each partition with the identity check,
//! 6. optionally audit the written files against the image root.

mod config;
mod report;

pub use config::{CurateConfig, CurateOptions};
pub use report::{
    ClassCoverage, CurationCounts, CurationIssue, CurationReport, IssueCode, IssueSeverity,
    OutputSummary,
};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::audit::check_record_file;
use crate::data::io_atomic::remove_stale;
use crate::data::io_image_list::read_image_list;
use crate::data::io_labels::{read_label_folder, write_class_dictionary};
use crate::data::io_matrix::read_tag_matrix;
use crate::data::io_tags::read_tag_lines;
use crate::data::{ensure_rows, Catalog, ImageIndex};
use crate::error::TagsplitError;
use crate::filter::{nonzero_rows, valid_indices, ValidIndexSet};
use crate::partition::{partition_indices, resolve_seed, shuffle_indices, PartitionOptions};
use crate::serialize::write_records;

/// Class dictionary file name inside the output folder.
pub const CLASS_DICTIONARY_FILE: &str = "label-dict.txt";
/// Train partition file name.
pub const TRAIN_FILE: &str = "train.dat";
/// Test partition file name.
pub const TEST_FILE: &str = "test.dat";
/// Record file written when no train size is requested.
pub const ALL_RECORDS_FILE: &str = "record-tagwords.dat";

/// Run the full pipeline and return its report.
///
/// Fatal conditions (misaligned sources, an impossible train size, an
/// identity mismatch under the abort policy) stop the run at the stage that
/// detects them. The class dictionary stays; record files are only left in
/// place when the whole split was written.
pub fn curate(opts: &CurateOptions) -> Result<CurationReport, TagsplitError> {
    let mut report = CurationReport::new();
    fs::create_dir_all(&opts.output)?;

    let labels = read_label_folder(&opts.label_folder, &mut report)?;
    write_class_dictionary(&opts.output.join(CLASS_DICTIONARY_FILE), &labels.classes)?;

    let labelled = nonzero_rows(&labels.matrix);
    info!(
        "There are {} images with at least one label",
        labelled.len()
    );

    let tag_matrix = read_tag_matrix(&opts.tag_matrix)?;
    ensure_rows(
        "Tag matrix",
        &opts.tag_matrix,
        labels.matrix.rows(),
        tag_matrix.rows(),
    )?;
    let tagged = nonzero_rows(&tag_matrix);
    info!("There are {} images with at least one tag", tagged.len());

    let valid = valid_indices(&labels.matrix, &tag_matrix);
    info!(
        "There are {} images with at least one label and tag",
        valid.len()
    );

    let images = labels.matrix.rows();
    report.counts.labelled = labelled.len();
    report.counts.tagged = tagged.len();
    report.counts.valid = valid.len();
    if labelled.len() < images {
        report.info(
            IssueCode::ZeroLabelImages,
            format!("{} image(s) have no label", images - labelled.len()),
        );
    }
    if tagged.len() < images {
        report.info(
            IssueCode::ZeroTagImages,
            format!("{} image(s) have no tag", images - tagged.len()),
        );
    }

    let image_list = read_image_list(&opts.image_list, &opts.strip_prefix)?;
    let tag_lines = read_tag_lines(&opts.tag_file)?;
    let catalog = Catalog::assemble(image_list, &labels.matrix, labels.classes, tag_lines)?;
    report.class_coverage = class_coverage(&catalog, &valid);

    let outputs = match opts.train_size {
        Some(train_size) => write_partitions(opts, train_size, &valid, &catalog, &mut report)?,
        None => write_single_file(opts, &valid, &catalog, &mut report)?,
    };

    if let Some(root) = &opts.image_root {
        audit_outputs(&outputs, root, &mut report)?;
    }

    info!("Finished preprocessing; records are in {}", opts.output.display());
    Ok(report)
}

fn write_partitions(
    opts: &CurateOptions,
    train_size: usize,
    valid: &ValidIndexSet,
    catalog: &Catalog,
    report: &mut CurationReport,
) -> Result<Vec<PathBuf>, TagsplitError> {
    let seed = seed_for_run(opts.seed, report);
    let partition = partition_indices(
        valid,
        &PartitionOptions {
            train_size,
            seed: Some(seed),
            strategy: opts.strategy,
        },
    )?;

    info!(
        "Train set size {}, Test set size {}",
        partition.train.len(),
        partition.test.len()
    );
    if let Some(shortfall) = partition.sizing_warning() {
        warn!("{}", shortfall);
        report.warning(IssueCode::TrainSizeShortfall, shortfall.to_string());
    }

    report.counts.train_requested = Some(partition.requested);
    report.counts.records = partition.train.len() + partition.test.len();
    report.counts.train = partition.train.len();
    report.counts.test = partition.test.len();

    let train_path = opts.output.join(TRAIN_FILE);
    let test_path = opts.output.join(TEST_FILE);
    // Files from an earlier run must not pair up with this run's output.
    remove_stale(&train_path);
    remove_stale(&test_path);
    write_records(
        &train_path,
        &partition.train,
        catalog,
        opts.on_mismatch,
        report,
    )?;
    // A train file without its test file is not a usable split.
    if let Err(err) = write_records(
        &test_path,
        &partition.test,
        catalog,
        opts.on_mismatch,
        report,
    ) {
        remove_stale(&train_path);
        return Err(err);
    }

    Ok(vec![train_path, test_path])
}

fn write_single_file(
    opts: &CurateOptions,
    valid: &ValidIndexSet,
    catalog: &Catalog,
    report: &mut CurationReport,
) -> Result<Vec<PathBuf>, TagsplitError> {
    let seed = seed_for_run(opts.seed, report);
    let order: Vec<ImageIndex> = shuffle_indices(valid, seed);
    report.counts.records = order.len();

    let path = opts.output.join(ALL_RECORDS_FILE);
    write_records(&path, &order, catalog, opts.on_mismatch, report)?;
    Ok(vec![path])
}

fn seed_for_run(seed: Option<u64>, report: &mut CurationReport) -> u64 {
    let resolved = resolve_seed(seed);
    if seed.is_none() {
        info!("no seed given; using {}", resolved);
        report.info(
            IssueCode::SeedDrawn,
            format!("no seed given; drew {resolved} (pass --seed {resolved} to reproduce)"),
        );
    }
    report.seed = Some(resolved);
    resolved
}

fn audit_outputs(
    outputs: &[PathBuf],
    image_root: &Path,
    report: &mut CurationReport,
) -> Result<(), TagsplitError> {
    for path in outputs {
        let audit = check_record_file(path, image_root)?;
        report.audits.push(audit);
    }

    let missing = report.missing_images();
    if missing > 0 {
        let checked: usize = report.audits.iter().map(|audit| audit.total).sum();
        report.warning(
            IssueCode::MissingImages,
            format!(
                "{missing} of {checked} referenced image(s) are missing from {}",
                image_root.display()
            ),
        );
    }
    Ok(())
}

fn class_coverage(catalog: &Catalog, valid: &ValidIndexSet) -> Vec<ClassCoverage> {
    let mut counts = vec![0usize; catalog.classes.len()];
    for index in valid {
        if let Some(image) = catalog.get(*index) {
            for class in &image.labels {
                if let Some(slot) = counts.get_mut(class.as_usize()) {
                    *slot += 1;
                }
            }
        }
    }

    catalog
        .classes
        .iter()
        .zip(counts)
        .map(|((class_id, name), images)| ClassCoverage {
            class_id,
            name: name.to_string(),
            images,
        })
        .collect()
}
