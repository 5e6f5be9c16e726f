//! Configuration for the flyweight memory pool.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interning limits for a memory pool.
///
/// These are performance boundaries only. A value that misses a cache is
/// allocated fresh and behaves identically under equality.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolConfig {
    /// Maximum entries per value-keyed interning table.
    pub cache_ceiling: usize,

    /// Lowest integer of the preallocated window.
    pub small_integer_min: i64,

    /// Highest integer of the preallocated window.
    pub small_integer_max: i64,

    /// Integers with magnitude up to this are value-keyed cached.
    pub interned_integer_magnitude: u64,

    /// Attribute names up to this many code points are interned.
    pub max_interned_name_len: usize,

    /// Headings up to this degree are interned.
    pub max_interned_heading_degree: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            cache_ceiling: 10_000,
            small_integer_min: -1,
            small_integer_max: 255,
            interned_integer_magnitude: 1 << 20,
            max_interned_name_len: 64,
            max_interned_heading_degree: 8,
        }
    }
}

impl PoolConfig {
    /// Creates a configuration that caches nothing beyond the singletons.
    #[must_use]
    pub fn uncached() -> Self {
        Self {
            cache_ceiling: 0,
            small_integer_min: 0,
            small_integer_max: 0,
            interned_integer_magnitude: 0,
            max_interned_name_len: 0,
            max_interned_heading_degree: 0,
        }
    }

    /// Creates a configuration for long-running virtual machines.
    #[must_use]
    pub fn large() -> Self {
        Self {
            cache_ceiling: 100_000,
            small_integer_min: -128,
            small_integer_max: 1023,
            interned_integer_magnitude: 1 << 32,
            max_interned_name_len: 128,
            max_interned_heading_degree: 16,
        }
    }

    /// Builder method to set the per-table ceiling.
    #[must_use]
    pub fn with_cache_ceiling(mut self, ceiling: usize) -> Self {
        self.cache_ceiling = ceiling;
        self
    }

    /// Builder method to set the preallocated integer window.
    ///
    /// An empty window (`min > max`) preallocates only zero.
    #[must_use]
    pub fn with_small_integers(mut self, min: i64, max: i64) -> Self {
        self.small_integer_min = min;
        self.small_integer_max = max;
        self
    }

    /// Builder method to set the cached integer magnitude.
    #[must_use]
    pub fn with_interned_integer_magnitude(mut self, magnitude: u64) -> Self {
        self.interned_integer_magnitude = magnitude;
        self
    }

    /// Builder method to set the longest interned attribute name.
    #[must_use]
    pub fn with_max_interned_name_len(mut self, len: usize) -> Self {
        self.max_interned_name_len = len;
        self
    }

    /// Builder method to set the largest interned heading degree.
    #[must_use]
    pub fn with_max_interned_heading_degree(mut self, degree: usize) -> Self {
        self.max_interned_heading_degree = degree;
        self
    }

    /// Returns true if `n` falls in the preallocated window.
    #[must_use]
    pub fn in_small_window(&self, n: i64) -> bool {
        (self.small_integer_min..=self.small_integer_max).contains(&n)
    }
}
