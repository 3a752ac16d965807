//! Write-then-rename output files.
//!
//! Output goes to a temporary file in the target's folder and is renamed
//! over the target only after the writer returned and the data was synced.
//! A failed write leaves the target untouched.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::TagsplitError;

/// Buffered writer handed to [`write_atomically`] callbacks.
pub type AtomicWriter = BufWriter<NamedTempFile>;

/// Run `write` against a temporary file and persist it as `path` on success.
pub fn write_atomically<T, F>(path: &Path, write: F) -> Result<T, TagsplitError>
where
    F: FnOnce(&mut AtomicWriter) -> Result<T, TagsplitError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut out = BufWriter::new(NamedTempFile::new_in(dir)?);
    let value = write(&mut out)?;

    let temp = out.into_inner().map_err(|err| err.into_error())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(value)
}

/// Remove `path` if it exists. Failures are logged, not returned, so the
/// caller can keep reporting the error that made the file stale.
pub fn remove_stale(path: &Path) {
    if !path.exists() {
        return;
    }
    warn!("removing stale {}", path.display());
    if let Err(err) = fs::remove_file(path) {
        warn!("could not remove {}: {}", path.display(), err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn persists_only_after_success() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("out.txt");

        let written = write_atomically(&path, |out| {
            writeln!(out, "hello")?;
            Ok(6)
        })
        .expect("write");
        assert_eq!(written, 6);
        assert_eq!(fs::read_to_string(&path).expect("read"), "hello\n");
    }

    #[test]
    fn failed_write_keeps_previous_content() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("out.txt");
        fs::write(&path, "old\n").expect("seed file");

        let err = write_atomically(&path, |out| -> Result<(), TagsplitError> {
            writeln!(out, "partial")?;
            Err(TagsplitError::InvalidConfig {
                message: "stop".to_string(),
            })
        })
        .unwrap_err();
        assert!(matches!(err, TagsplitError::InvalidConfig { .. }));
        assert_eq!(fs::read_to_string(&path).expect("read"), "old\n");

        // Only the target remains; the temporary file is gone.
        let entries = fs::read_dir(temp.path()).expect("list").count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn remove_stale_ignores_missing_files() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("gone.txt");
        remove_stale(&path);
        fs::write(&path, "x").expect("write");
        remove_stale(&path);
        assert!(!path.exists());
    }
}
