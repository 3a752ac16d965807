//! Train/test partitioning of the valid image indices.
//!
//! Two strategies are available:
//!
//! - [`PartitionStrategy::Shuffle`] (default): a Fisher–Yates prefix over the
//!   valid indices. The first `n` become train, the rest test. Always yields
//!   exactly `n` train images.
//! - [`PartitionStrategy::Oversample`]: draws `2n` positions with
//!   replacement, keeps the first `n` distinct ones as train. When the pool is
//!   small relative to `n` this can come up short; the shortfall is reported
//!   through [`Partition::sizing_warning`] rather than hidden.
//!
//! Both strategies hand back train and test in an independently shuffled
//! order, and both draw from one seeded [`StdRng`].

use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::data::ImageIndex;
use crate::error::TagsplitError;
use crate::filter::ValidIndexSet;

/// How the train set is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PartitionStrategy {
    /// Partial Fisher–Yates shuffle; exact train size.
    #[default]
    Shuffle,
    /// `2n` draws with replacement, deduplicated, truncated to `n`.
    Oversample,
}

/// Partitioning options.
#[derive(Clone, Debug)]
pub struct PartitionOptions {
    pub train_size: usize,
    pub seed: Option<u64>,
    pub strategy: PartitionStrategy,
}

/// Disjoint train/test index sequences.
#[derive(Clone, Debug)]
pub struct Partition {
    pub train: Vec<ImageIndex>,
    pub test: Vec<ImageIndex>,
    /// Train size the caller asked for.
    pub requested: usize,
    /// Seed the random source was built from.
    pub seed: u64,
}

impl Partition {
    /// Number of train images actually produced.
    pub fn achieved(&self) -> usize {
        self.train.len()
    }

    /// Present when fewer train images were produced than requested.
    pub fn sizing_warning(&self) -> Option<SizingWarning> {
        (self.achieved() < self.requested).then_some(SizingWarning {
            requested: self.requested,
            achieved: self.achieved(),
        })
    }
}

/// The draw could not reach the requested train size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizingWarning {
    pub requested: usize,
    pub achieved: usize,
}

impl fmt::Display for SizingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "train set has {} image(s), {} requested",
            self.achieved, self.requested
        )
    }
}

/// Validate partition options against the number of valid images.
pub fn validate_partition_options(
    opts: &PartitionOptions,
    available: usize,
) -> Result<(), TagsplitError> {
    if opts.train_size == 0 {
        return Err(TagsplitError::InvalidPartitionParams {
            message: "train size must be greater than 0".to_string(),
        });
    }

    if opts.train_size > available {
        return Err(TagsplitError::TrainSizeExceedsValid {
            requested: opts.train_size,
            available,
        });
    }

    Ok(())
}

/// Returns the given seed, or draws a fresh one so the run can be replayed.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random::<u64>)
}

/// Split the valid indices into train and test.
pub fn partition_indices(
    valid: &ValidIndexSet,
    opts: &PartitionOptions,
) -> Result<Partition, TagsplitError> {
    validate_partition_options(opts, valid.len())?;

    let seed = resolve_seed(opts.seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let pool: Vec<ImageIndex> = valid.iter().copied().collect();

    let (train, test) = match opts.strategy {
        PartitionStrategy::Shuffle => split_by_shuffle(pool, opts.train_size, &mut rng),
        PartitionStrategy::Oversample => split_by_oversample(&pool, opts.train_size, &mut rng)?,
    };

    Ok(Partition {
        train,
        test,
        requested: opts.train_size,
        seed,
    })
}

/// Shuffle every valid index into one sequence (single-file mode).
pub fn shuffle_indices(valid: &ValidIndexSet, seed: u64) -> Vec<ImageIndex> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut all: Vec<ImageIndex> = valid.iter().copied().collect();
    all.shuffle(&mut rng);
    all
}

fn split_by_shuffle(
    mut pool: Vec<ImageIndex>,
    n: usize,
    rng: &mut StdRng,
) -> (Vec<ImageIndex>, Vec<ImageIndex>) {
    // The chosen prefix comes back in uniformly random order already.
    let (chosen, rest) = pool.partial_shuffle(rng, n);
    let train = chosen.to_vec();
    let mut test = rest.to_vec();
    test.shuffle(rng);
    (train, test)
}

fn split_by_oversample(
    pool: &[ImageIndex],
    n: usize,
    rng: &mut StdRng,
) -> Result<(Vec<ImageIndex>, Vec<ImageIndex>), TagsplitError> {
    let positions =
        Uniform::new(0, pool.len()).map_err(|err| TagsplitError::InvalidPartitionParams {
            message: format!("cannot draw from {} valid image(s): {err}", pool.len()),
        })?;

    let mut seen: HashSet<usize> = HashSet::with_capacity(2 * n);
    let mut train = Vec::with_capacity(n);
    for _ in 0..2 * n {
        let pos = positions.sample(rng);
        if seen.insert(pos) && train.len() < n {
            train.push(pool[pos]);
        }
    }

    let chosen: HashSet<ImageIndex> = train.iter().copied().collect();
    let mut test: Vec<ImageIndex> = pool
        .iter()
        .copied()
        .filter(|idx| !chosen.contains(idx))
        .collect();

    train.shuffle(rng);
    test.shuffle(rng);
    Ok((train, test))
}
