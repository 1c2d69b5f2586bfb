//! Compiler-wide configuration: a small plain struct threaded through the
//! compiler rather than global state.

use std::path::PathBuf;

/// Settings that shape a single compilation, independent of the grammar or
/// source being compiled.
#[derive(Clone, Debug)]
pub struct Config {
    /// Bypass the table cache and always rebuild (§4.2 "Persistence").
    pub force_rebuild: bool,
    /// Directory the table cache is read from / written to.
    pub cache_dir: PathBuf,
    /// Starting offset for the counter registry. Tests inject a known
    /// non-zero value to assert monotonicity without depending on global
    /// state (§9's preferred redesign of the counters).
    pub counter_seed: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self { force_rebuild: false, cache_dir: PathBuf::from("tables"), counter_seed: 0 }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_force_rebuild(mut self, force: bool) -> Self {
        self.force_rebuild = force;
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_counter_seed(mut self, seed: u32) -> Self {
        self.counter_seed = seed;
        self
    }
}
