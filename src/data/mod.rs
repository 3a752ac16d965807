//! Dataset sources and the joined catalog.
//!
//! Four independently stored files describe the same images by position:
//!
//! - the image list (`io_image_list`), whose line number is the image index,
//! - one indicator file per class (`io_labels`), merged into a label matrix,
//! - the tag file (`io_tags`), identifier token first,
//! - the tag occurrence matrix (`io_matrix`).
//!
//! [`Catalog::assemble`] joins the first three into [`ImageRecord`]s once, so
//! the positional alignment is checked in one place. Record files produced
//! from a catalog are handled by `io_records`.

mod ids;
pub(crate) mod io_atomic;
pub mod io_image_list;
pub mod io_labels;
pub mod io_matrix;
pub mod io_records;
pub mod io_tags;
mod model;

pub use ids::{ClassId, ImageIndex};
pub use model::{
    class_name_from_file, ensure_rows, image_identifier, BinaryMatrix, Catalog, ClassDictionary,
    ImageList, ImageRecord, LabelMatrix, TagLine, TagLines, TagMatrix,
};
