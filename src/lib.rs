pub mod error;
pub mod rank;
pub mod tsquery;
pub mod tsvector;

#[cfg(test)]
mod tests;

pub use error::{RankError, RankResult, SyntaxKind};
pub use rank::{
    rank, rank_cd, ts_rank, ts_rank_cd, ts_rank_cd_normalized, ts_rank_cd_weighted,
    ts_rank_cd_weighted_normalized, ts_rank_normalized, ts_rank_weighted,
    ts_rank_weighted_normalized, Normalization, RankingConfig, Weights, DEFAULT_WEIGHTS,
};
pub use tsquery::evaluator::{evaluate, ts_match};
pub use tsquery::{QueryItem, QueryOperand, QueryOperator, TsQuery};
pub use tsvector::{Position, TsVector, WeightClass, WordEntry, MAX_NUM_POS, MAX_POS};
