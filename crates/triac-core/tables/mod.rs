//! The LR(1) table builder (§4.2): closure, clean, successor
//! construction and ACTION/GOTO table emission.
//!
//! The source computes states by creating every successor unconditionally
//! and then running a post-hoc `cleanItemSets`/`updateSetNum` pass that
//! deletes merged-away indices and renumbers everything above the gap. That
//! renumbering pass is easy to get subtly wrong (an off-by-one corrupts
//! every transition recorded against a state above the deleted one). This
//! builder folds the merge step into successor construction instead: a
//! candidate successor is compared against every existing state *before* it
//! is given an index, so no index is ever created only to be deleted later.
//! Same algorithm, same output, no renumbering pass to get wrong.

pub mod cache;

use std::collections::{BTreeMap, HashMap};

use crate::error::{ConflictKind, TableConflict};
use crate::grammar::item::{Item, ItemSet};
use crate::grammar::{Grammar, ACCEPT, END_OF_INPUT};
use crate::journal::{Journal, Phase};

/// `state -> terminal -> action`.
pub type ActionTable = Vec<HashMap<String, Action>>;
/// `state -> non_terminal -> state`.
pub type GotoTable = Vec<HashMap<String, usize>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce { lhs: String, alt: usize, len: usize },
    Accept,
}

/// The complete output of table construction: every canonical item set, the
/// ACTION/GOTO tables derived from them, and any conflicts encountered along
/// the way (§4.2, §6).
#[derive(Clone, Debug)]
pub struct ParseTables {
    pub states: Vec<ItemSet>,
    pub action: ActionTable,
    pub goto: GotoTable,
    pub conflicts: Vec<TableConflict>,
}

/// Build the canonical LR(1) collection and its tables for `grammar`.
pub fn build(grammar: &Grammar) -> ParseTables {
    let journal = Journal::new(Phase::TableBuild);

    // `ACC`'s single alternative is whatever `Grammar::load` augmented with
    // (the first rule's LHS — `program` for this compiler's own grammar
    // file), not a literal "program" — a standalone fixture like §8's
    // golden `S -> C C` grammar has its own start symbol here.
    let seed_rhs = grammar
        .alternatives(ACCEPT)
        .and_then(|alts| alts.first())
        .map(|rule| rule.symbols.clone())
        .unwrap_or_else(|| vec!["program".to_string()]);

    let start = closure(
        ItemSet::new(vec![Item::new(ACCEPT, seed_rhs, 0, END_OF_INPUT)]),
        grammar,
        &journal,
    );

    let mut states: Vec<ItemSet> = vec![start];
    let mut transitions: BTreeMap<(usize, String), usize> = BTreeMap::new();

    // Each round re-scans every state discovered so far for outgoing
    // transitions; new states found along the way extend `states` and are
    // visited on a later round. Terminates once a pass finds nothing new.
    let mut frontier = 0;
    while frontier < states.len() {
        let idx = frontier;
        frontier += 1;

        let symbols = outgoing_symbols(&states[idx]);
        for symbol in symbols {
            let candidate = closure(successor(&states[idx], &symbol), grammar, &journal);
            if candidate.items.is_empty() {
                continue;
            }

            let target = match states.iter().position(|s| s.same_items(&candidate)) {
                Some(existing) => {
                    crate::jdebug!(journal, "merged successor of state {idx} on '{symbol}' into existing state {existing}");
                    existing
                }
                None => {
                    states.push(candidate);
                    let new_idx = states.len() - 1;
                    crate::jdebug!(journal, "state {idx} on '{symbol}' discovers new state {new_idx}");
                    new_idx
                }
            };
            transitions.insert((idx, symbol), target);
        }
    }

    let (action, goto, conflicts) = emit_tables(&states, &transitions, grammar, &journal);

    ParseTables { states, action, goto, conflicts }
}

/// Expand an item set with every item implied by a non-terminal sitting
/// right after the dot (§4.2 closure rule, including the lookahead
/// propagation the source calls the "clean" step). Each pass that adds at
/// least one item is traced at debug level, mirroring the source's own
/// `logging.debug("Closing out itemset %s", setNum)` call per closure
/// iteration.
fn closure(mut set: ItemSet, grammar: &Grammar, journal: &Journal) -> ItemSet {
    loop {
        let mut additions = Vec::new();
        for item in &set.items {
            let Some(symbol) = item.symbol_after_dot() else { continue };
            if !grammar.is_non_terminal(symbol) {
                continue;
            }
            let Some(alts) = grammar.alternatives(symbol) else { continue };

            for lookahead in lookaheads_for(item, grammar) {
                for rule in alts {
                    additions.push(Item::new(symbol, rule.symbols.clone(), 0, lookahead.clone()));
                }
            }
        }

        let mut added = 0usize;
        for item in additions {
            if set.insert(item) {
                added += 1;
            }
        }
        if added == 0 {
            return set;
        }
        crate::jdebug!(journal, "closure pass added {added} item(s), {} total", set.items.len());
    }
}

/// The lookahead set to propagate onto a closure item derived from `item`:
/// the terminal FIRST set of the tail following the triggering non-terminal,
/// or `item`'s own lookahead if that tail is empty. This computes the same
/// terminals the source's iterative "clean" step converges to, just in one
/// pass instead of repeatedly replacing non-terminal-lookahead items (§4.2
/// explicitly permits substituting a standard FIRST-set computation as long
/// as the emitted ACTION/GOTO tables match).
fn lookaheads_for(item: &Item, grammar: &Grammar) -> Vec<String> {
    match item.tail_after_next().first() {
        Some(next) => {
            let mut seen = Vec::new();
            first_set(next, grammar, &mut seen)
        }
        None => vec![item.lookahead.clone()],
    }
}

/// The terminal FIRST set of a single symbol. This grammar has no nullable
/// non-terminals (every alternative is non-empty), so FIRST(X) for a
/// terminal X is just `{X}`, and for a non-terminal is the union of
/// FIRST(first symbol) over its alternatives. `seen` breaks left-recursion
/// cycles (e.g. `A -> A b`) by refusing to re-enter a non-terminal already
/// on the call stack.
fn first_set(symbol: &str, grammar: &Grammar, seen: &mut Vec<String>) -> Vec<String> {
    if grammar.is_terminal(symbol) {
        return vec![symbol.to_string()];
    }
    if seen.iter().any(|s| s == symbol) {
        return Vec::new();
    }
    seen.push(symbol.to_string());

    let mut out = Vec::new();
    if let Some(alts) = grammar.alternatives(symbol) {
        for rule in alts {
            if let Some(first) = rule.symbols.first() {
                for t in first_set(first, grammar, seen) {
                    if !out.iter().any(|s: &String| *s == t) {
                        out.push(t);
                    }
                }
            }
        }
    }
    out
}

/// Every distinct symbol sitting immediately after some item's dot.
fn outgoing_symbols(set: &ItemSet) -> Vec<String> {
    let mut seen = Vec::new();
    for item in &set.items {
        if let Some(sym) = item.symbol_after_dot() {
            if !seen.iter().any(|s: &String| s == sym) {
                seen.push(sym.to_string());
            }
        }
    }
    seen
}

/// The kernel of the state reached by shifting `symbol` out of `set`: every
/// item whose dot sits right before `symbol`, advanced by one (§4.2
/// "Successor construction").
fn successor(set: &ItemSet, symbol: &str) -> ItemSet {
    let items = set
        .items
        .iter()
        .filter(|item| item.symbol_after_dot() == Some(symbol))
        .map(Item::advance)
        .collect();
    ItemSet::new(items)
}

fn emit_tables(
    states: &[ItemSet],
    transitions: &BTreeMap<(usize, String), usize>,
    grammar: &Grammar,
    journal: &Journal,
) -> (ActionTable, GotoTable, Vec<TableConflict>) {
    let mut action: ActionTable = vec![HashMap::new(); states.len()];
    let mut goto: GotoTable = vec![HashMap::new(); states.len()];
    let mut conflicts = Vec::new();

    // Reduce (and accept) actions first, from each state's complete items.
    for (state_idx, set) in states.iter().enumerate() {
        for item in &set.items {
            if !item.is_complete() {
                continue;
            }
            let new_action = if item.lhs == ACCEPT {
                Action::Accept
            } else {
                let alt = grammar.alt_index(&item.lhs, &item.rhs).unwrap_or(0);
                Action::Reduce { lhs: item.lhs.clone(), alt, len: item.rhs.len() }
            };

            if let Some(existing) = action[state_idx].get(&item.lookahead) {
                if *existing != new_action {
                    conflicts.push(TableConflict {
                        state: state_idx,
                        terminal: item.lookahead.clone(),
                        kind: ConflictKind::ReduceReduce,
                    });
                    crate::jwarn!(
                        journal,
                        "reduce/reduce conflict in state {state_idx} on '{}'",
                        item.lookahead
                    );
                }
            }
            action[state_idx].insert(item.lookahead.clone(), new_action);
        }
    }

    // Shift actions (and GOTOs) next; a shift overwrites a reduce recorded
    // on the same cell, matching the source's observed precedence.
    for (&(from, ref symbol), &to) in transitions {
        if grammar.is_terminal(symbol) {
            if let Some(existing) = action[from].get(symbol) {
                if !matches!(existing, Action::Shift(s) if *s == to) {
                    conflicts.push(TableConflict {
                        state: from,
                        terminal: symbol.clone(),
                        kind: ConflictKind::ShiftReduce,
                    });
                    crate::jwarn!(journal, "shift/reduce conflict in state {from} on '{symbol}'");
                }
            }
            action[from].insert(symbol.clone(), Action::Shift(to));
        } else {
            goto[from].insert(symbol.clone(), to);
        }
    }

    (action, goto, conflicts)
}
