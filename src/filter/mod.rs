//! Validity filtering.
//!
//! An image is valid when it holds at least one label and at least one tag.
//! Both checks reduce to "row sum is positive" on a binary matrix, so the
//! same function runs once on the label matrix and once on the tag matrix
//! and the two sets are intersected. Results are sets of original image
//! indices; nothing is renumbered.

use std::collections::BTreeSet;

use crate::data::{BinaryMatrix, ImageIndex, LabelMatrix, TagMatrix};

/// Images with at least one label and one tag, in ascending index order.
pub type ValidIndexSet = BTreeSet<ImageIndex>;

/// Indices of rows with a strictly positive row sum.
pub fn nonzero_rows(matrix: &BinaryMatrix) -> BTreeSet<ImageIndex> {
    (0..matrix.rows())
        .filter(|&row| matrix.row_sum(row) > 0)
        .map(ImageIndex::new)
        .collect()
}

/// Intersects the non-empty label rows with the non-empty tag rows.
pub fn valid_indices(labels: &LabelMatrix, tags: &TagMatrix) -> ValidIndexSet {
    let labelled = nonzero_rows(labels);
    let tagged = nonzero_rows(tags);
    labelled.intersection(&tagged).copied().collect()
}
