//! Properties a table build must hold for any grammar (§8 "Testable
//! Properties"), checked against the golden grammar `S -> C C`, `C -> c C |
//! d` and against the parser driver run end to end over it.

use triac_core::tables::{self, Action};
use triac_core::Grammar;
use triac_rust_runtime::{Token, TokenKind};

const GOLDEN: &str = "S -> C C\nC -> c C | d\n";

/// Grammar round-trip: every alternative of every rule must be reachable by
/// some reduce action in the built tables.
#[test]
fn every_alternative_has_a_reducing_state() {
    let grammar = Grammar::load(GOLDEN).unwrap();
    let built = tables::build(&grammar);

    for lhs in grammar.non_terminals() {
        let Some(alts) = grammar.alternatives(lhs) else { continue };
        for (alt_idx, rule) in alts.iter().enumerate() {
            let reachable = built.action.iter().any(|row| {
                row.values().any(|a| match a {
                    Action::Reduce { lhs: rl, alt, len } => {
                        rl == lhs && *alt == alt_idx && *len == rule.symbols.len()
                    }
                    Action::Accept => lhs == "ACC",
                    _ => false,
                })
            });
            assert!(reachable, "no reduce action for {lhs} alternative {alt_idx}");
        }
    }
}

/// State uniqueness: no two canonical states carry the same item set.
#[test]
fn states_are_pairwise_distinct() {
    let grammar = Grammar::load(GOLDEN).unwrap();
    let built = tables::build(&grammar);
    for (i, a) in built.states.iter().enumerate() {
        for b in &built.states[i + 1..] {
            assert!(!a.same_items(b));
        }
    }
}

/// Transition consistency: a shift action's target state is reachable by
/// the GOTO/ACTION tables actually built, and shifting + reducing a full
/// sentence drives the state stack back to depth 1 at acceptance.
#[test]
fn parser_accepts_a_sentence_of_the_golden_grammar() {
    let grammar = Grammar::load(GOLDEN).unwrap();
    let built = tables::build(&grammar);

    let tokens = vec![
        Token::new(TokenKind::Identifier, "c", 1),
        Token::new(TokenKind::Identifier, "d", 1),
        Token::new(TokenKind::Identifier, "d", 1),
        Token::eof(1),
    ];
    let tree = triac_core::parse::parse(&tokens, &built, &grammar).unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].category(), "S");
    assert_eq!(tree[0].children().len(), 2);
}

/// Parser soundness: a sentence outside the language is rejected, not
/// silently accepted.
#[test]
fn parser_rejects_a_malformed_sentence() {
    let grammar = Grammar::load(GOLDEN).unwrap();
    let built = tables::build(&grammar);

    let tokens = vec![Token::new(TokenKind::Identifier, "c", 1), Token::eof(1)];
    assert!(triac_core::parse::parse(&tokens, &built, &grammar).is_err());
}
