//! LR(1) items and item sets.

use std::collections::BTreeSet;

/// A single LR(1) item: `(lhs, rhs, dot, lookahead)`. Two items are equal
/// iff all four fields match, which is exactly what `#[derive(PartialEq,
/// Eq)]` gives a plain struct of owned fields — pervasively relied on for
/// deduplication during closure.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub lhs: String,
    pub rhs: Vec<String>,
    pub dot: usize,
    pub lookahead: String,
}

impl Item {
    pub fn new(lhs: impl Into<String>, rhs: Vec<String>, dot: usize, lookahead: impl Into<String>) -> Self {
        Self { lhs: lhs.into(), rhs, dot, lookahead: lookahead.into() }
    }

    /// The symbol immediately after the dot, if the dot isn't at the end.
    pub fn symbol_after_dot(&self) -> Option<&str> {
        self.rhs.get(self.dot).map(|s| s.as_str())
    }

    /// All symbols after the one immediately following the dot — the
    /// pending tail a closure step looks past the next symbol to compute
    /// lookaheads from.
    pub fn tail_after_next(&self) -> &[String] {
        if self.dot + 1 < self.rhs.len() {
            &self.rhs[self.dot + 1..]
        } else {
            &[]
        }
    }

    /// True once the dot has consumed the entire RHS.
    pub fn is_complete(&self) -> bool {
        self.dot >= self.rhs.len()
    }

    /// A copy of this item with the dot advanced by one position.
    pub fn advance(&self) -> Item {
        Item { dot: self.dot + 1, ..self.clone() }
    }
}

/// An unordered collection of items, identified elsewhere by an integer
/// state index.
#[derive(Clone, Debug, Default)]
pub struct ItemSet {
    pub items: Vec<Item>,
}

impl ItemSet {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Insert `item` if no equal item is already present. Returns whether it
    /// was newly inserted; no two items in a set are ever equal.
    pub fn insert(&mut self, item: Item) -> bool {
        if self.items.contains(&item) {
            false
        } else {
            self.items.push(item);
            true
        }
    }

    /// Two item sets are the same *state* iff they contain exactly the same
    /// multiset of items, order notwithstanding. Duplicate items within one
    /// set are already ruled out on insert, so a plain set comparison
    /// suffices.
    pub fn same_items(&self, other: &ItemSet) -> bool {
        let a: BTreeSet<&Item> = self.items.iter().collect();
        let b: BTreeSet<&Item> = other.items.iter().collect();
        a == b
    }
}
