//! Newtype indices for the two axes of the label matrix.
//!
//! An [`ImageIndex`] is the position of an image in the image list and is the
//! only key shared by the label matrix, the tag file and the tag matrix. It is
//! carried through filtering and partitioning unchanged, never renumbered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an image in the image list (row of every aligned source).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageIndex(pub usize);

impl ImageIndex {
    /// Creates a new ImageIndex.
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying position.
    #[inline]
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl From<usize> for ImageIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Debug for ImageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageIndex({})", self.0)
    }
}

impl fmt::Display for ImageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Column of the label matrix, assigned in sorted class-file order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub usize);

impl ClassId {
    /// Creates a new ClassId.
    #[inline]
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the underlying column number.
    #[inline]
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl From<usize> for ClassId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
