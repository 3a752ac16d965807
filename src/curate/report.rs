//! Curation run report.
//!
//! The report is created by the caller and handed to each stage, which
//! records counts and non-fatal observations on it. Nothing is reported
//! per line: a stage aggregates before it adds an issue.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::audit::AuditReport;
use crate::data::ClassId;

/// Aggregated outcome of a curation run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CurationReport {
    pub counts: CurationCounts,
    /// Seed used for partitioning and shuffling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Record files written, in write order.
    pub outputs: Vec<OutputSummary>,
    /// Image-existence audits of the written files.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub audits: Vec<AuditReport>,
    /// Valid images per class.
    pub class_coverage: Vec<ClassCoverage>,
    pub issues: Vec<CurationIssue>,
}

impl CurationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an issue to the report.
    pub fn add(&mut self, issue: CurationIssue) {
        self.issues.push(issue);
    }

    /// Record an informational note.
    pub fn info(&mut self, code: IssueCode, message: impl Into<String>) {
        self.add(CurationIssue::new(IssueSeverity::Info, code, message));
    }

    /// Record a recoverable problem the caller should look at.
    pub fn warning(&mut self, code: IssueCode, message: impl Into<String>) {
        self.add(CurationIssue::new(IssueSeverity::Warning, code, message));
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .count()
    }

    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Info)
            .count()
    }

    pub fn has_issue(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    /// Missing images summed over every audit.
    pub fn missing_images(&self) -> usize {
        self.audits.iter().map(|audit| audit.missing).sum()
    }
}

impl fmt::Display for CurationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counts;
        writeln!(
            f,
            "  {} images, {} classes (max {} labels on one image)",
            c.images, c.classes, c.max_labels_per_image
        )?;
        writeln!(
            f,
            "  {} labelled, {} tagged, {} valid",
            c.labelled, c.tagged, c.valid
        )?;

        match c.train_requested {
            Some(requested) => writeln!(
                f,
                "  train {} (requested {}), test {}",
                c.train, requested, c.test
            )?,
            None => writeln!(f, "  {} records (no train/test split)", c.records)?,
        }

        if let Some(seed) = self.seed {
            writeln!(f, "  seed {}", seed)?;
        }

        if !self.outputs.is_empty() {
            writeln!(f)?;
            writeln!(f, "Outputs:")?;
            for output in &self.outputs {
                writeln!(f, "  {}", output)?;
            }
        }

        if !self.audits.is_empty() {
            writeln!(f)?;
            writeln!(f, "Image audit:")?;
            for audit in &self.audits {
                writeln!(
                    f,
                    "  {}: {} checked, {} missing",
                    audit.record_file.display(),
                    audit.total,
                    audit.missing
                )?;
            }
        }

        let warnings = self.warning_count();
        if warnings > 0 {
            writeln!(f)?;
            writeln!(f, "Warnings ({}):", warnings)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == IssueSeverity::Warning)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        let infos = self.info_count();
        if infos > 0 {
            writeln!(f)?;
            writeln!(f, "Notes ({}):", infos)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == IssueSeverity::Info)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        Ok(())
    }
}

/// Counts gathered across the stages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CurationCounts {
    pub images: usize,
    pub classes: usize,
    pub max_labels_per_image: usize,
    /// Images with at least one label.
    pub labelled: usize,
    /// Images with at least one tag.
    pub tagged: usize,
    /// Images with both.
    pub valid: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub train_requested: Option<usize>,
    /// Records scheduled for writing across all record files.
    pub records: usize,
    /// Zero unless a train size was requested.
    pub train: usize,
    pub test: usize,
}

/// One record file produced by the run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutputSummary {
    pub path: PathBuf,
    pub written: usize,
    /// Indices dropped under the skip mismatch policy.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<usize>,
}

impl fmt::Display for OutputSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} records", self.path.display(), self.written)?;
        if !self.skipped.is_empty() {
            write!(f, ", {} skipped", self.skipped.len())?;
        }
        Ok(())
    }
}

/// Number of valid images holding a class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassCoverage {
    pub class_id: ClassId,
    pub name: String,
    pub images: usize,
}

/// A single observation made during the run.
#[derive(Clone, Debug, Serialize)]
pub struct CurationIssue {
    pub severity: IssueSeverity,
    pub code: IssueCode,
    pub message: String,
}

impl CurationIssue {
    pub fn new(severity: IssueSeverity, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
        }
    }
}

/// Severity of a report issue. Fatal conditions are errors, never issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Info,
    Warning,
}

/// Stable codes for report issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// Class files were merged into the label matrix.
    LabelMatrixBuilt,
    /// Some images carry no label and were dropped.
    ZeroLabelImages,
    /// Some images carry no tag and were dropped.
    ZeroTagImages,
    /// No seed was supplied; one was drawn.
    SeedDrawn,
    /// The train draw produced fewer images than requested.
    TrainSizeShortfall,
    /// Records whose tag identifier did not match were skipped.
    IntegritySkipped,
    /// Referenced image files are absent from the image root.
    MissingImages,
}
