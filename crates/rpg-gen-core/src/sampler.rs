//! Integer-weight sampling over a fixed list of entries
//!
//! Weights from documents are fractional; they are scaled by 100 and
//! truncated, keeping two decimal digits. Sampling uses cumulative weights and
//! a binary search (`rand`'s `WeightedIndex`): O(n) to build, O(log n) per pick.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

use crate::error::CompileError;

/// Factor applied to fractional weights before truncation.
pub const WEIGHT_SCALE: f64 = 100.0;

/// Convert a document weight to the integer domain.
///
/// Returns `None` for negative, NaN or infinite weights.
pub fn scale_weight(weight: f64) -> Option<u64> {
    if !weight.is_finite() || weight < 0.0 {
        return None;
    }
    // `as` saturates at u64::MAX; the overflow check happens when summing.
    Some((weight * WEIGHT_SCALE).floor() as u64)
}

/// One pickable value and its integer weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    value: String,
    weight: u64,
}

impl Entry {
    pub fn new<S: Into<String>>(value: S, weight: u64) -> Self {
        Self {
            value: value.into(),
            weight,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }
}

/// Weighted sampler with replacement.
#[derive(Debug, Clone)]
pub struct Sampler {
    entries: Vec<Entry>,
    index: WeightedIndex<u64>,
    total: u64,
}

impl Sampler {
    /// Build a sampler for the generator `name`.
    ///
    /// Fails when no entry has a positive weight or the weights overflow `u64`.
    pub fn new(name: &str, entries: Vec<Entry>) -> Result<Self, CompileError> {
        let mut total: u64 = 0;
        for entry in &entries {
            total = total
                .checked_add(entry.weight)
                .ok_or_else(|| CompileError::WeightOverflow(name.to_string()))?;
        }
        if total == 0 {
            return Err(CompileError::AllZeroWeight(name.to_string()));
        }

        let index = WeightedIndex::new(entries.iter().map(|e| e.weight))
            .map_err(|_| CompileError::AllZeroWeight(name.to_string()))?;

        Ok(Self {
            entries,
            index,
            total,
        })
    }

    /// Draw one value. Picks are independent; nothing is removed.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.entries[self.index.sample(rng)].value
    }

    /// All entries in declaration order, zero-weight ones included.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn total_weight(&self) -> u64 {
        self.total
    }

    /// Probability that a single pick returns entry `i`.
    pub fn probability(&self, i: usize) -> f64 {
        self.entries
            .get(i)
            .map_or(0.0, |e| e.weight as f64 / self.total as f64)
    }
}
