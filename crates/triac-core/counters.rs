//! The named-counter registry (§3 "Counters").
//!
//! The source keeps this as process-wide global mutable state. §9
//! flags that as the wrong design for anything but a single-threaded,
//! single-compilation process, and recommends threading a counter context
//! through the builder instead, reset per compilation. This is that
//! redesign: [`CounterRegistry`] is an explicit value, constructed fresh (or
//! from a known seed, for deterministic tests) and passed by `&mut` to
//! whichever phase needs fresh names.

use std::collections::HashMap;

/// Assigns each named prefix its own monotone counter.
#[derive(Clone, Debug, Default)]
pub struct CounterRegistry {
    counts: HashMap<String, u32>,
}

impl CounterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start every prefix's counter at `seed` instead of zero. Used by tests
    /// that want to assert counter monotonicity without caring about the
    /// absolute starting value.
    pub fn with_seed(seed: u32) -> Self {
        // The seed is stored lazily: a prefix's first `unique` call returns
        // `seed + 1`, matching a registry that had already counted up to
        // `seed` before this compilation began.
        let mut counts = HashMap::new();
        counts.insert(SEED_SENTINEL.to_string(), seed);
        Self { counts }
    }

    fn current(&self, prefix: &str) -> u32 {
        if let Some(&n) = self.counts.get(prefix) {
            return n;
        }
        self.counts.get(SEED_SENTINEL).copied().unwrap_or(0)
    }

    /// Advance `prefix`'s counter and return `"{prefix}{n}"`.
    pub fn unique(&mut self, prefix: &str) -> String {
        let next = self.current(prefix) + 1;
        self.counts.insert(prefix.to_string(), next);
        format!("{prefix}{next}")
    }

    /// Return the current value of `prefix`'s counter without advancing it.
    pub fn peek(&self, prefix: &str) -> u32 {
        self.current(prefix)
    }
}

const SEED_SENTINEL: &str = "\0seed";

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn counters_are_independent_per_prefix() {
        let mut reg = CounterRegistry::new();
        assert_eq!(reg.unique("r"), "r1");
        assert_eq!(reg.unique("_L"), "_L1");
        assert_eq!(reg.unique("r"), "r2");
        assert_eq!(reg.peek("_L"), 1);
        assert_eq!(reg.unique("_L"), "_L2");
    }

    #[test]
    fn seed_offsets_every_prefix() {
        let mut reg = CounterRegistry::with_seed(5);
        assert_eq!(reg.peek("_L"), 5);
        assert_eq!(reg.unique("_L"), "_L6");
    }
}
