//! Conditional parallel iteration.
//!
//! Fetch-and-parse of independent fund positions may run on the rayon pool
//! when the `parallel` feature is enabled. Results always come back in input
//! order, so the sequential and parallel paths are interchangeable.

use crate::types::AggregationConfig;

/// Maps a function over items, conditionally using parallel iteration.
///
/// Uses parallel iteration when:
/// - The `parallel` feature is enabled
/// - `config.parallel` is true
/// - The collection size reaches `config.parallel_threshold`
///
/// # Example
///
/// ```ignore
/// let tables = maybe_parallel_map(&positions, &config, |p| load_holdings(p));
/// ```
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], config: &AggregationConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_preserved() {
        let items: Vec<u64> = (0..500).collect();
        let sequential = maybe_parallel_map(&items, &AggregationConfig::sequential(), |x| x * 3);
        let parallel = maybe_parallel_map(
            &items,
            &AggregationConfig::new().with_threshold(1),
            |x| x * 3,
        );
        assert_eq!(sequential, parallel);
        assert_eq!(parallel[499], 1497);
    }
}
