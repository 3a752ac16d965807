//! Post-hoc audit: do the images named by a record file exist on disk?
//!
//! Missing images are counted, never fatal. Real collections routinely lose
//! a fraction of their files, and the record files stay usable.

mod report;

pub use report::AuditReport;

use std::path::Path;

use tracing::{debug, info};

use crate::data::io_records::{read_records, Record};
use crate::error::TagsplitError;

/// Check every record in `record_file` against `image_root`.
pub fn check_record_file(
    record_file: &Path,
    image_root: &Path,
) -> Result<AuditReport, TagsplitError> {
    info!("Check images from {}", record_file.display());
    let records = read_records(record_file)?;
    let mut report = check_records(&records, image_root);
    report.record_file = record_file.to_path_buf();

    info!(
        "There are {} images in total, {} missing images",
        report.total, report.missing
    );
    Ok(report)
}

/// Check already-parsed records against `image_root`.
pub fn check_records(records: &[Record], image_root: &Path) -> AuditReport {
    let mut report = AuditReport {
        image_root: image_root.to_path_buf(),
        ..Default::default()
    };

    for record in records {
        report.total += 1;
        if !image_root.join(&record.path).exists() {
            debug!("{} does not exist", record.path);
            report.missing += 1;
            report.missing_paths.push(record.path.clone());
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn counts_missing_images() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let root = temp.path().join("images");
        fs::create_dir_all(root.join("sky")).expect("create image dirs");

        let mut lines = String::new();
        for i in 0..10 {
            let rel = format!("sky/{i:04}_{i}.jpg");
            if i != 3 && i != 7 {
                fs::write(root.join(&rel), b"jpg").expect("write image");
            }
            lines.push_str(&format!("{i} {rel} 0#$$#cloud\n"));
        }
        let record_file = temp.path().join("train.dat");
        fs::write(&record_file, lines).expect("write records");

        let report = check_record_file(&record_file, &root).expect("audit");
        assert_eq!(report.total, 10);
        assert_eq!(report.missing, 2);
        assert_eq!(report.missing_paths, vec!["sky/0003_3.jpg", "sky/0007_7.jpg"]);
        assert!(!report.is_complete());
        assert!(report
            .to_string()
            .contains("There are 10 images in total, 2 missing images"));
    }

    #[test]
    fn empty_record_file_is_complete() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let record_file = temp.path().join("empty.dat");
        fs::write(&record_file, "").expect("write records");

        let report = check_record_file(&record_file, temp.path()).expect("audit");
        assert_eq!(report.total, 0);
        assert!(report.is_complete());
    }
}
