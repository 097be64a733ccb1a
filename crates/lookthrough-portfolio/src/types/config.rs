//! Configuration for a look-through run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration for portfolio aggregation.
///
/// Controls short handling, the fraction sanity check and parallelism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Skip short positions entirely instead of propagating negative amounts.
    pub ignore_shorts: bool,

    /// Allowed deviation of a fund's fraction total from 1 before warning.
    pub fraction_tolerance: Decimal,

    /// Enable parallel fetch-and-parse (requires 'parallel' feature).
    pub parallel: bool,

    /// Minimum number of positions to trigger parallel processing.
    pub parallel_threshold: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            ignore_shorts: false,
            fraction_tolerance: Decimal::new(2, 2),
            parallel: true,
            parallel_threshold: 8,
        }
    }
}

impl AggregationConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that always processes positions sequentially.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets whether short positions are skipped.
    #[must_use]
    pub fn with_ignore_shorts(mut self, ignore: bool) -> Self {
        self.ignore_shorts = ignore;
        self
    }

    /// Sets the fraction total tolerance.
    #[must_use]
    pub fn with_fraction_tolerance(mut self, tolerance: Decimal) -> Self {
        self.fraction_tolerance = tolerance;
        self
    }

    /// Sets whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel processing.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns true if parallel processing should be used for the given count.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }
}
