//! Image-existence audit report.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Number of missing paths listed by the text rendering.
const MISSING_PREVIEW: usize = 10;

/// Result of checking one record file against an image root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub record_file: PathBuf,
    pub image_root: PathBuf,
    /// Records checked.
    pub total: usize,
    /// Records whose image file is absent.
    pub missing: usize,
    pub missing_paths: Vec<String>,
}

impl AuditReport {
    pub fn is_complete(&self) -> bool {
        self.missing == 0
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Checked images from {} against {}",
            self.record_file.display(),
            self.image_root.display()
        )?;
        writeln!(
            f,
            "There are {} images in total, {} missing images",
            self.total, self.missing
        )?;

        for path in self.missing_paths.iter().take(MISSING_PREVIEW) {
            writeln!(f, "  missing: {}", path)?;
        }
        if self.missing_paths.len() > MISSING_PREVIEW {
            writeln!(
                f,
                "  ... and {} more",
                self.missing_paths.len() - MISSING_PREVIEW
            )?;
        }

        Ok(())
    }
}
