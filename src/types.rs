//! Core types shared by the sampler and its observers.

use crate::error::Result;
use crate::numeric::NumericValue;
use crate::partitioning::{Partitioner, Token};
use serde::{Deserialize, Serialize};

/// One derived token, as handed to presentation collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenObservation {
    /// Position of the key in the sample.
    pub index: u64,
    /// Strategy that produced the token.
    pub partitioner: Partitioner,
    /// Numeric value in the strategy's domain.
    pub value: NumericValue,
    /// Canonical token text.
    pub text: String,
}

impl TokenObservation {
    /// Build an observation from a derived token.
    pub fn new(index: u64, token: &Token) -> Self {
        Self {
            index,
            partitioner: token.partitioner(),
            value: token.value(),
            text: token.to_string(),
        }
    }

    /// Serialize the observation to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize an observation from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(data)?)
    }
}

/// `(index, value)` points for one partitioner, in sample order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSeries {
    pub partitioner: Partitioner,
    pub points: Vec<(u64, NumericValue)>,
}

impl TokenSeries {
    pub fn new(partitioner: Partitioner) -> Self {
        Self {
            partitioner,
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, index: u64, value: NumericValue) {
        self.points.push((index, value));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points projected onto `f64` for plotting.
    pub fn plot_points(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|(i, v)| (*i as f64, v.to_f64()))
            .collect()
    }
}
