//! Resolver configuration
//!
//! Source maps come from build tooling that is usually, but not always, well behaved. These
//! options decide whether irregularities in the `mappings` data are tolerated (logged and
//! worked around) or reported as [`crate::Error::InvalidSourceMap`].

/// Configuration for source map decoding and backtrace resolution
///
/// The missing-field checks on `mappings` and `sources` always apply. Everything here is
/// additional validation of the decoded segment data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ResolverConfig {
    /// Reject lines whose segments are not in ascending generated-column order.
    /// Lookups on such lines stop at the first overshooting segment and may pick a poor match.
    pub validate_segment_order: bool,

    /// Reject segments whose source or name index falls outside `sources` / `names`.
    /// When disabled those segments resolve without a source or name.
    pub validate_indices: bool,

    /// Reject segments whose decoded positions are negative or exceed `u32`.
    /// When disabled those segments are dropped from the table.
    pub validate_positions: bool,

    /// Whether [`crate::BacktraceResolver`] keeps parsed source maps for reuse.
    pub cache_source_maps: bool,

    /// Maximum number of parsed source maps kept by [`crate::BacktraceResolver`].
    /// The oldest entry is evicted once the limit is reached; `0` is treated as `1`.
    pub source_map_cache_capacity: usize,
}

/// Default for [`ResolverConfig::source_map_cache_capacity`]
pub const DEFAULT_SOURCE_MAP_CACHE_CAPACITY: usize = 4;

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::lenient()
    }
}

impl ResolverConfig {
    /// Tolerate malformed segment data, the way engines and browsers do
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            validate_segment_order: false,
            validate_indices: false,
            validate_positions: false,
            cache_source_maps: true,
            source_map_cache_capacity: DEFAULT_SOURCE_MAP_CACHE_CAPACITY,
        }
    }

    /// Fail fast on any irregularity in the segment data
    ///
    /// Useful in build pipelines that want to catch a broken source map before it ships.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            validate_segment_order: true,
            validate_indices: true,
            validate_positions: true,
            cache_source_maps: true,
            source_map_cache_capacity: DEFAULT_SOURCE_MAP_CACHE_CAPACITY,
        }
    }

    /// Same checks as `self`, without source map caching
    #[must_use]
    pub fn uncached(self) -> Self {
        Self {
            cache_source_maps: false,
            ..self
        }
    }

    /// Same checks as `self`, keeping at most `capacity` parsed source maps
    #[must_use]
    pub fn with_cache_capacity(self, capacity: usize) -> Self {
        Self {
            source_map_cache_capacity: capacity,
            ..self
        }
    }
}
