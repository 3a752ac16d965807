#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tagsplit::curate::CurateOptions;
use tagsplit::data::io_image_list::DEFAULT_STRIP_PREFIX;
use tagsplit::partition::PartitionStrategy;
use tagsplit::serialize::MismatchPolicy;

pub const IMAGES: usize = 10;
pub const CLASSES: usize = 5;
pub const ZERO_LABEL: [usize; 3] = [1, 4, 7];
pub const ZERO_TAG: [usize; 2] = [2, 8];
pub const VALID: [usize; 5] = [0, 3, 5, 6, 9];

/// On-disk sources for a 5-class, 10-image collection.
pub struct Fixture {
    pub root: PathBuf,
    pub label_folder: PathBuf,
    pub tag_matrix: PathBuf,
    pub tag_file: PathBuf,
    pub image_list: PathBuf,
    pub image_root: PathBuf,
    pub output: PathBuf,
}

impl Fixture {
    pub fn options(&self, train_size: Option<usize>) -> CurateOptions {
        CurateOptions {
            label_folder: self.label_folder.clone(),
            tag_matrix: self.tag_matrix.clone(),
            tag_file: self.tag_file.clone(),
            image_list: self.image_list.clone(),
            image_root: None,
            output: self.output.clone(),
            train_size,
            seed: Some(42),
            strategy: PartitionStrategy::Shuffle,
            on_mismatch: MismatchPolicy::Abort,
            strip_prefix: DEFAULT_STRIP_PREFIX.to_string(),
        }
    }

    /// Overwrite the tag file with explicit lines.
    pub fn write_tag_lines(&self, lines: &[String]) {
        fs::write(&self.tag_file, lines.join("\n") + "\n").expect("write tag file");
    }

    /// Create image files under the image root, except for `missing`.
    pub fn write_images(&self, missing: &[usize]) {
        for i in 0..IMAGES {
            if missing.contains(&i) {
                continue;
            }
            let path = self.image_root.join(relative_path(i));
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create image dir");
            }
            fs::write(path, b"jpg").expect("write image");
        }
    }
}

pub fn class_name(class: usize) -> &'static str {
    ["animal", "beach", "cloud", "dog", "sunset"][class]
}

pub fn identifier(i: usize) -> String {
    format!("{}", 2124494170 + i)
}

pub fn relative_path(i: usize) -> String {
    format!("{}/{:04}_{}.jpg", class_name(i % CLASSES), i, identifier(i))
}

pub fn tag_line(i: usize) -> String {
    format!("{} tag{} flickr", identifier(i), i)
}

fn has_label(i: usize, class: usize) -> bool {
    !ZERO_LABEL.contains(&i) && (class == i % CLASSES || (i % 2 == 0 && class == (i + 1) % CLASSES))
}

/// Write the fixture sources into `root`.
pub fn write_fixture(root: &Path) -> Fixture {
    let label_folder = root.join("labels");
    fs::create_dir_all(&label_folder).expect("create label folder");
    for class in 0..CLASSES {
        let column: String = (0..IMAGES)
            .map(|i| format!("{}\n", u8::from(has_label(i, class))))
            .collect();
        fs::write(
            label_folder.join(format!("Labels_{}.txt", class_name(class))),
            column,
        )
        .expect("write class file");
    }

    let tag_matrix = root.join("tags1k.dat");
    let matrix: String = (0..IMAGES)
        .map(|i| {
            let row: Vec<&str> = (0..4)
                .map(|col| {
                    if !ZERO_TAG.contains(&i) && col == i % 4 {
                        "1"
                    } else {
                        "0"
                    }
                })
                .collect();
            row.join(" ") + "\n"
        })
        .collect();
    fs::write(&tag_matrix, matrix).expect("write tag matrix");

    let tag_file = root.join("all_tags.txt");
    let tags: String = (0..IMAGES).map(|i| tag_line(i) + "\n").collect();
    fs::write(&tag_file, tags).expect("write tag file");

    let image_list = root.join("imagelist.txt");
    let list: String = (0..IMAGES)
        .map(|i| {
            format!(
                "C:\\ImageData\\Flickr\\{}\r\n",
                relative_path(i).replace('/', "\\")
            )
        })
        .collect();
    fs::write(&image_list, list).expect("write image list");

    Fixture {
        root: root.to_path_buf(),
        label_folder,
        tag_matrix,
        tag_file,
        image_list,
        image_root: root.join("images"),
        output: root.join("out"),
    }
}
