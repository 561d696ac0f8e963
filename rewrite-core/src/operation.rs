//! Per-call operation state.
//!
//! An `OperationContext` lives for exactly one top-level rewrite. It counts
//! every match attempt made by every rule during that rewrite and enforces a
//! global ceiling, so a chain terminates no matter how large the individual
//! rule limits are. It must not be shared between concurrent rewrites.
//!
//! License: MIT OR APACHE 2.0

use crate::maps::LookupMaps;

/// Engine-wide default for both the global pass ceiling and the per-rule
/// pass limit.
pub const DEFAULT_MAX_PASSES: u32 = 100;

/// State threaded through all rule applications of a single rewrite.
#[derive(Debug, Clone)]
pub struct OperationContext<'a> {
    total_passes: u32,
    max_passes: u32,
    maps: Option<&'a LookupMaps>,
}

impl Default for OperationContext<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PASSES)
    }
}

impl<'a> OperationContext<'a> {
    /// Creates a context with the given global ceiling (clamped to at least 1).
    pub fn new(max_passes: u32) -> Self {
        Self {
            total_passes: 0,
            max_passes: max_passes.max(1),
            maps: None,
        }
    }

    /// Makes `maps` available to replacement templates.
    pub fn with_maps(mut self, maps: &'a LookupMaps) -> Self {
        self.maps = Some(maps);
        self
    }

    /// Number of match attempts made so far.
    pub fn total_passes(&self) -> u32 {
        self.total_passes
    }

    /// The global ceiling on match attempts.
    pub fn max_passes(&self) -> u32 {
        self.max_passes
    }

    /// True once the global ceiling has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.total_passes >= self.max_passes
    }

    pub fn maps(&self) -> Option<&'a LookupMaps> {
        self.maps
    }

    /// Counts one match attempt.
    pub(crate) fn record_pass(&mut self) {
        self.total_passes = self.total_passes.saturating_add(1);
    }
}
