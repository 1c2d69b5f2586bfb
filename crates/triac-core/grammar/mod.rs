//! The grammar loader: parses a plain-text BNF-like grammar into a rule set,
//! partitioning symbols into terminals and non-terminals.

pub mod item;

use std::collections::HashMap;

use crate::error::{TriacError, TriacResult};
use crate::journal::{Journal, Phase};

/// The LHS of the first non-blank, non-comment line in `text`, used to pick
/// the symbol the augmenting `ACC` rule points at.
fn first_lhs(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .and_then(|line| line.split(' ').next())
        .map(str::to_string)
}

/// One right-hand-side alternative of a rule.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rule {
    pub symbols: Vec<String>,
}

impl Rule {
    pub fn new(symbols: Vec<String>) -> Self {
        Self { symbols }
    }
}

/// The augmented start non-terminal. Its single alternative is always
/// `program`, with lookahead `$`.
pub const ACCEPT: &str = "ACC";
/// The end-of-input sentinel terminal.
pub const END_OF_INPUT: &str = "$";

/// A loaded grammar: rules keyed by LHS, plus the derived terminal /
/// non-terminal partition, both in first-appearance order.
#[derive(Clone, Debug, Default)]
pub struct Grammar {
    names: Vec<String>,
    index: HashMap<String, usize>,
    alts: Vec<Vec<Rule>>,
    pub terminals: Vec<String>,
}

impl Grammar {
    /// Parse a textual grammar. The augmenting rule `ACC -> <start>` is
    /// always prepended, where `<start>` is the LHS of the first rule in the
    /// text (`program`, for this compiler's own grammar file — §3
    /// documents that case literally — but any other top-level non-terminal
    /// works the same way, which is what lets a standalone grammar fixture
    /// such as §8's golden `S -> C C` / `C -> c C | d` build its own
    /// complete canonical automaton rather than one disconnected from `S`).
    pub fn load(text: &str) -> TriacResult<Grammar> {
        let journal = Journal::new(Phase::GrammarLoad);
        let start = first_lhs(text).unwrap_or_else(|| "program".to_string());
        crate::jdebug!(journal, "augmenting rule ACC -> {start}");

        let mut g = Grammar::default();
        g.define(ACCEPT, Rule::new(vec![start]));

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            g.load_line(line, line_no)?;
        }

        g.derive_terminals();
        crate::jdebug!(
            journal,
            "loaded {} non-terminal(s), {} terminal(s)",
            g.names.len(),
            g.terminals.len()
        );
        Ok(g)
    }

    fn load_line(&mut self, line: &str, line_no: usize) -> TriacResult<()> {
        let tokens: Vec<&str> = line.split(' ').collect();
        if tokens.len() < 2 || tokens[1] != "->" {
            return Err(TriacError::Grammar {
                line: line_no,
                message: "expected 'LHS -> alt1 | alt2 | ...'".to_string(),
            });
        }
        let lhs = tokens[0].to_string();

        let mut last = 2;
        for (i, tok) in tokens.iter().enumerate().skip(2) {
            if *tok == "|" {
                let symbols = tokens[last..i].iter().map(|s| s.to_string()).collect();
                self.define(&lhs, Rule::new(symbols));
                last = i + 1;
            }
        }
        let symbols = tokens[last..].iter().map(|s| s.to_string()).collect();
        self.define(&lhs, Rule::new(symbols));
        Ok(())
    }

    fn define(&mut self, lhs: &str, rule: Rule) {
        if let Some(&i) = self.index.get(lhs) {
            self.alts[i].push(rule);
        } else {
            self.index.insert(lhs.to_string(), self.names.len());
            self.names.push(lhs.to_string());
            self.alts.push(vec![rule]);
        }
    }

    fn derive_terminals(&mut self) {
        let mut seen: HashMap<String, ()> = HashMap::new();
        let mut terminals = Vec::new();
        for alts in &self.alts {
            for rule in alts {
                for sym in &rule.symbols {
                    if !self.index.contains_key(sym) && !seen.contains_key(sym) {
                        seen.insert(sym.clone(), ());
                        terminals.push(sym.clone());
                    }
                }
            }
        }
        self.terminals = terminals;
    }

    /// Non-terminals in first-appearance order, starting with `ACC`.
    pub fn non_terminals(&self) -> &[String] {
        &self.names
    }

    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    pub fn is_terminal(&self, symbol: &str) -> bool {
        !self.is_non_terminal(symbol)
    }

    /// The ordered list of alternatives for a non-terminal, if it is one.
    pub fn alternatives(&self, lhs: &str) -> Option<&[Rule]> {
        self.index.get(lhs).map(|&i| self.alts[i].as_slice())
    }

    /// The index of `rhs` within `lhs`'s alternatives, used to recover the
    /// reduction index embedded in the ACTION table. Alternative order is
    /// significant and preserved from declaration order.
    pub fn alt_index(&self, lhs: &str, rhs: &[String]) -> Option<usize> {
        self.alternatives(lhs)?.iter().position(|r| r.symbols == rhs)
    }
}
