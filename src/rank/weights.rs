use serde::{Deserialize, Serialize};

use crate::error::{RankError, RankResult};
use crate::tsvector::WeightClass;

/// Default per-class weights, indexed by weight class (D, C, B, A).
pub const DEFAULT_WEIGHTS: [f32; 4] = [0.1, 0.2, 0.4, 1.0];

/// Validated weight table mapping a [`WeightClass`] to a float in [0, 1].
/// Constructed once, then handed to the rank functions; scoring never
/// re-validates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights([f32; 4]);

impl Default for Weights {
    fn default() -> Self {
        Weights(DEFAULT_WEIGHTS)
    }
}

impl Weights {
    /// Builds a table from exactly four values, ordered D, C, B, A.
    /// A negative value falls back to the default for that slot; a value
    /// above 1.0 is rejected.
    pub fn new(values: [f32; 4]) -> RankResult<Self> {
        let mut ws = [0.0f32; 4];
        for (i, &v) in values.iter().enumerate() {
            ws[i] = if v < 0.0 { DEFAULT_WEIGHTS[i] } else { v };
            if ws[i] > 1.0 {
                return Err(RankError::WeightOutOfRange);
            }
        }
        Ok(Weights(ws))
    }

    /// Builds a table from a user-supplied array of at least four elements;
    /// extras are ignored.
    pub fn from_array(values: &[f32]) -> RankResult<Self> {
        if values.len() < 4 {
            return Err(RankError::WeightArrayTooShort);
        }
        Self::new([values[0], values[1], values[2], values[3]])
    }

    /// Like [`Weights::from_array`] for arrays with nullable elements, as
    /// handed over by hosts whose arrays admit nulls. Any null anywhere in
    /// the array is rejected.
    pub fn from_nullable_array(values: &[Option<f32>]) -> RankResult<Self> {
        if values.len() < 4 {
            return Err(RankError::WeightArrayTooShort);
        }
        if values.iter().any(|v| v.is_none()) {
            return Err(RankError::WeightArrayContainsNulls);
        }
        let mut ws = [0.0f32; 4];
        for (slot, value) in ws.iter_mut().zip(values) {
            *slot = value.unwrap_or_default();
        }
        Self::new(ws)
    }

    pub fn get(&self, class: WeightClass) -> f32 {
        self.0[class as usize]
    }

    pub fn as_array(&self) -> [f32; 4] {
        self.0
    }
}
