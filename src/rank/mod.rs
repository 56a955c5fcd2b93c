pub mod cover;
pub mod normalize;
pub mod standard;
pub mod weights;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::tsquery::{QueryItem, QueryOperator, TsQuery};
use crate::tsvector::{Position, TsVector, WeightClass, WordEntry, MAX_POS};
pub use normalize::Normalization;
pub use weights::{Weights, DEFAULT_WEIGHTS};

/// Virtual position for entries stripped of position data: the last
/// representable slot of the document, at the lowest weight. Two of these
/// are never treated as co-located by the AND kernel.
static POS_NULL: [Position; 1] = [Position {
    pos: MAX_POS - 1,
    weight: WeightClass::D,
}];

/// An entry's positions, or the sentinel for position-less entries; the
/// flag reports which one was handed back.
pub(crate) fn positions_or_sentinel(entry: &WordEntry) -> (&[Position], bool) {
    if entry.positions.is_empty() {
        (&POS_NULL, true)
    } else {
        (&entry.positions, false)
    }
}

/// Weight table plus normalization mask, the per-call scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    pub weights: Weights,
    /// Bit-mask of [`Normalization`] values; 0 leaves the raw score.
    pub normalization: u32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        RankingConfig {
            weights: Weights::default(),
            normalization: Normalization::None as u32,
        }
    }
}

/// Standard rank: AND-rooted queries (phrases included, their distance being
/// invisible at this level) score by pairwise proximity, everything else by
/// the averaged per-operand kernel. NOT operands carry no special meaning
/// here; they participate as plain leaves.
pub fn rank(vector: &TsVector, query: &TsQuery, config: &RankingConfig) -> f32 {
    if vector.is_empty() || query.is_empty() {
        return 0.0;
    }

    let and_root = matches!(
        query.root(),
        Some(QueryItem::Operator(
            QueryOperator::And | QueryOperator::Phrase(_)
        ))
    );
    let mut res = if and_root {
        standard::rank_and(&config.weights, vector, query)
    } else {
        standard::rank_or(&config.weights, vector, query)
    };

    // "unset" marker from the AND kernel: nothing paired up
    if res < 0.0 {
        res = 1e-20f32;
    }

    let res = normalize::apply(config.normalization, res as f64, vector, None) as f32;
    trace!(res = res as f64, and_root, "standard rank computed");
    res
}

/// Cover-density rank: scores by minimal spans of the document satisfying
/// the whole query.
pub fn rank_cd(vector: &TsVector, query: &TsQuery, config: &RankingConfig) -> f32 {
    if vector.is_empty() || query.is_empty() {
        return 0.0;
    }
    cover::rank_cd(&config.weights, vector, query, config.normalization)
}

pub fn ts_rank(vector: &TsVector, query: &TsQuery) -> f32 {
    rank(vector, query, &RankingConfig::default())
}

pub fn ts_rank_normalized(vector: &TsVector, query: &TsQuery, method: u32) -> f32 {
    rank(
        vector,
        query,
        &RankingConfig {
            weights: Weights::default(),
            normalization: method,
        },
    )
}

pub fn ts_rank_weighted(weights: &Weights, vector: &TsVector, query: &TsQuery) -> f32 {
    rank(
        vector,
        query,
        &RankingConfig {
            weights: *weights,
            normalization: Normalization::None as u32,
        },
    )
}

pub fn ts_rank_weighted_normalized(
    weights: &Weights,
    vector: &TsVector,
    query: &TsQuery,
    method: u32,
) -> f32 {
    rank(
        vector,
        query,
        &RankingConfig {
            weights: *weights,
            normalization: method,
        },
    )
}

pub fn ts_rank_cd(vector: &TsVector, query: &TsQuery) -> f32 {
    rank_cd(vector, query, &RankingConfig::default())
}

pub fn ts_rank_cd_normalized(vector: &TsVector, query: &TsQuery, method: u32) -> f32 {
    rank_cd(
        vector,
        query,
        &RankingConfig {
            weights: Weights::default(),
            normalization: method,
        },
    )
}

pub fn ts_rank_cd_weighted(weights: &Weights, vector: &TsVector, query: &TsQuery) -> f32 {
    rank_cd(
        vector,
        query,
        &RankingConfig {
            weights: *weights,
            normalization: Normalization::None as u32,
        },
    )
}

pub fn ts_rank_cd_weighted_normalized(
    weights: &Weights,
    vector: &TsVector,
    query: &TsQuery,
    method: u32,
) -> f32 {
    rank_cd(
        vector,
        query,
        &RankingConfig {
            weights: *weights,
            normalization: method,
        },
    )
}
