//! Tagsplit: curate multi-label tagged image collections into record files.
//!
//! The sources are several loosely aligned flat files: one 0/1 indicator
//! file per class, an image-path list, a per-image tag file and a tag
//! occurrence matrix. Row `i` of each describes image `i`. Tagsplit merges
//! the class files into a label matrix, keeps images with at least one label
//! and one tag, splits them into train and test, and writes one record line
//! per image while checking that the tag line really belongs to the image.
//!
//! # Modules
//!
//! - [`data`]: source readers, the joined [`data::Catalog`] and the record format
//! - [`filter`]: label/tag validity filtering
//! - [`partition`]: train/test partitioning
//! - [`serialize`]: record writing with the identity check
//! - [`audit`]: image existence audit over written record files
//! - [`curate`]: the pipeline, its configuration and run report
//! - [`error`]: error types for tagsplit operations

pub mod audit;
pub mod curate;
pub mod data;
pub mod error;
pub mod filter;
pub mod partition;
pub mod serialize;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

pub use error::TagsplitError;

use curate::CurateConfig;
use partition::PartitionStrategy;
use serialize::MismatchPolicy;

/// The tagsplit CLI application.
#[derive(Parser)]
#[command(name = "tagsplit")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Build train/test record files from the raw label, tag and image-list files.
    Curate(CurateArgs),
    /// Count images referenced by a record file that are missing on disk.
    Audit(AuditArgs),
    /// List the indices of records that carry exactly one label.
    SingleLabel(SingleLabelArgs),
}

/// Arguments for the curate subcommand.
#[derive(clap::Args)]
struct CurateArgs {
    /// YAML file with any of the options below (flags override it).
    #[arg(long, env = "TAGSPLIT_CONFIG")]
    config: Option<PathBuf>,

    /// Folder of per-class 0/1 indicator files.
    #[arg(short = 'l', long)]
    label_folder: Option<PathBuf>,

    /// Tag occurrence matrix; images with no tag are dropped.
    #[arg(short = 't', long)]
    tag_matrix: Option<PathBuf>,

    /// Tag text file, one line per image, identifier first.
    #[arg(short = 'f', long)]
    tag_file: Option<PathBuf>,

    /// Image list file, one path per line.
    #[arg(short = 'i', long)]
    image_list: Option<PathBuf>,

    /// Image root folder; when set, written records are audited against it.
    #[arg(short = 'd', long)]
    image_root: Option<PathBuf>,

    /// Output folder for the class dictionary and record files.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Number of train images; the remaining valid images form the test set.
    /// Without it, every valid image goes to a single record file.
    #[arg(short = 'n', long)]
    train_size: Option<usize>,

    /// Seed for the partition draw and shuffles.
    #[arg(long, env = "TAGSPLIT_SEED")]
    seed: Option<u64>,

    /// How the train set is drawn.
    #[arg(long, value_enum)]
    strategy: Option<PartitionStrategy>,

    /// What to do with a record whose tag line does not match its image.
    #[arg(long, value_enum)]
    on_mismatch: Option<MismatchPolicy>,

    /// Root prefix removed from image-list entries.
    #[arg(long)]
    strip_prefix: Option<String>,

    /// Output format for the report.
    #[arg(long, value_enum, default_value = "text")]
    report: ReportFormat,
}

impl CurateArgs {
    fn overrides(&self) -> CurateConfig {
        CurateConfig {
            label_folder: self.label_folder.clone(),
            tag_matrix: self.tag_matrix.clone(),
            tag_file: self.tag_file.clone(),
            image_list: self.image_list.clone(),
            image_root: self.image_root.clone(),
            output: self.output.clone(),
            train_size: self.train_size,
            seed: self.seed,
            strategy: self.strategy,
            on_mismatch: self.on_mismatch,
            strip_prefix: self.strip_prefix.clone(),
        }
    }
}

/// Arguments for the audit subcommand.
#[derive(clap::Args)]
struct AuditArgs {
    /// Record file to check.
    records: PathBuf,

    /// Image root folder the record paths are relative to.
    #[arg(short = 'd', long)]
    image_root: PathBuf,

    /// Output format for the report.
    #[arg(long, value_enum, default_value = "text")]
    report: ReportFormat,
}

/// Arguments for the single-label subcommand.
#[derive(clap::Args)]
struct SingleLabelArgs {
    /// Record file to scan.
    records: PathBuf,

    /// File receiving one index per line.
    #[arg(short = 'o', long)]
    output: PathBuf,
}

/// Report rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Run the tagsplit CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), TagsplitError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Curate(args)) => run_curate(args),
        Some(Commands::Audit(args)) => run_audit(args),
        Some(Commands::SingleLabel(args)) => run_single_label(args),
        None => {
            println!("tagsplit {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Curates multi-label tagged image collections into train/test record files.");
            println!();
            println!("Run 'tagsplit --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the curate subcommand.
fn run_curate(args: CurateArgs) -> Result<(), TagsplitError> {
    let base = match &args.config {
        Some(path) => CurateConfig::from_yaml_file(path)?,
        None => CurateConfig::default(),
    };
    let opts = base.merge(args.overrides()).resolve()?;

    let report = curate::curate(&opts)?;
    emit(&report, args.report)
}

/// Execute the audit subcommand.
fn run_audit(args: AuditArgs) -> Result<(), TagsplitError> {
    let report = audit::check_record_file(&args.records, &args.image_root)?;
    emit(&report, args.report)
}

/// Execute the single-label subcommand.
fn run_single_label(args: SingleLabelArgs) -> Result<(), TagsplitError> {
    let records = data::io_records::read_records(&args.records)?;
    let indices = data::io_records::single_label_indices(&records);
    data::io_records::write_index_list(&args.output, &indices)?;

    info!(
        "{} of {} records carry a single label",
        indices.len(),
        records.len()
    );
    println!(
        "{} single-label record(s) of {} written to {}",
        indices.len(),
        records.len(),
        args.output.display()
    );
    Ok(())
}

fn emit<R: Serialize + std::fmt::Display>(
    report: &R,
    format: ReportFormat,
) -> Result<(), TagsplitError> {
    match format {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(report)
                .map_err(|source| TagsplitError::ReportSerialize { source })?;
            println!("{}", json);
        }
        ReportFormat::Text => print!("{}", report),
    }
    Ok(())
}
