//! Image list reader.
//!
//! The list was produced on a Windows host, so entries look like
//! `C:\ImageData\Flickr\actor\0001_2124494179.jpg`. Entries are normalized to
//! forward slashes and the fixed root prefix is removed.

use std::fs;
use std::path::Path;

use super::model::ImageList;
use crate::error::TagsplitError;

/// Root prefix stripped from every image-list entry by default.
pub const DEFAULT_STRIP_PREFIX: &str = "C:\\ImageData\\Flickr\\";

/// Reads an image list, one path per line, keeping every line position.
pub fn read_image_list(path: &Path, strip_prefix: &str) -> Result<ImageList, TagsplitError> {
    let content = fs::read_to_string(path)?;
    let paths = content
        .lines()
        .map(|line| normalize_image_path(line, strip_prefix))
        .collect();

    Ok(ImageList {
        source: path.to_path_buf(),
        paths,
    })
}

/// Translates separators to `/` and strips `strip_prefix` (compared after the
/// same translation) from the start of the entry.
pub fn normalize_image_path(raw: &str, strip_prefix: &str) -> String {
    let normalized = raw.trim().replace('\\', "/");
    let prefix = strip_prefix.replace('\\', "/");

    if prefix.is_empty() {
        return normalized;
    }

    match normalized.strip_prefix(&prefix) {
        Some(rest) => rest.to_string(),
        None => normalized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_windows_prefix_and_separators() {
        assert_eq!(
            normalize_image_path(
                "C:\\ImageData\\Flickr\\actor\\0001_2124494179.jpg\r",
                DEFAULT_STRIP_PREFIX
            ),
            "actor/0001_2124494179.jpg"
        );
    }

    #[test]
    fn leaves_foreign_prefix_in_place() {
        assert_eq!(
            normalize_image_path("D:\\Other\\a_1.jpg", DEFAULT_STRIP_PREFIX),
            "D:/Other/a_1.jpg"
        );
        assert_eq!(normalize_image_path("x/a_1.jpg", ""), "x/a_1.jpg");
    }

    #[test]
    fn keeps_line_positions() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("list.txt");
        fs::write(&path, "C:\\ImageData\\Flickr\\a\\0_1.jpg\n\nb/2_3.jpg\n")
            .expect("write list");

        let list = read_image_list(&path, DEFAULT_STRIP_PREFIX).expect("read list");
        assert_eq!(list.paths, vec!["a/0_1.jpg", "", "b/2_3.jpg"]);
        assert_eq!(list.source, path);
    }
}
