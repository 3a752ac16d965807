#![allow(dead_code)]

use std::collections::BTreeSet;

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use tagsplit::data::{BinaryMatrix, ClassId, ImageIndex};
use tagsplit::data::io_records::Record;
use tagsplit::filter::ValidIndexSet;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Non-empty valid-index sets drawn from a sparse index range.
pub fn arb_valid_set(max_len: usize) -> impl Strategy<Value = ValidIndexSet> {
    prop::collection::btree_set(0usize..5000, 1..=max_len)
        .prop_map(|set| set.into_iter().map(ImageIndex::new).collect())
}

/// A valid set together with a train size it can satisfy.
pub fn arb_valid_set_and_size(max_len: usize) -> impl Strategy<Value = (ValidIndexSet, usize)> {
    arb_valid_set(max_len).prop_flat_map(|set| {
        let len = set.len();
        (Just(set), 1..=len)
    })
}

pub fn arb_matrix(max_rows: usize, max_cols: usize) -> impl Strategy<Value = Vec<Vec<bool>>> {
    (1..=max_cols).prop_flat_map(move |cols| {
        prop::collection::vec(prop::collection::vec(prop::bool::weighted(0.2), cols), 0..=max_rows)
    })
}

pub fn to_matrix(rows: &[Vec<bool>]) -> BinaryMatrix {
    BinaryMatrix::from_rows(rows).expect("generated rows are rectangular")
}

pub fn arb_record() -> impl Strategy<Value = Record> {
    (
        0usize..300_000,
        "[a-z]{1,8}/[0-9]{4}_[0-9]{6,10}\\.jpg",
        prop::collection::btree_set(0usize..81, 0..6),
        prop::collection::vec("[a-z0-9]{1,12}", 0..8),
    )
        .prop_map(|(index, path, labels, tags)| Record {
            index: ImageIndex::new(index),
            path,
            labels: labels.into_iter().map(ClassId::new).collect(),
            tags,
        })
}

pub fn index_set(indices: &[ImageIndex]) -> BTreeSet<ImageIndex> {
    indices.iter().copied().collect()
}
