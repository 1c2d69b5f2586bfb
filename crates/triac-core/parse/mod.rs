//! The shift-reduce parser driver (§4.3).

pub mod tree;

use triac_rust_runtime::Token;

use crate::error::{TriacError, TriacResult};
use crate::grammar::{Grammar, ACCEPT};
use crate::journal::{Journal, Phase};
use crate::tables::{Action, ParseTables};
use tree::Node;

/// Drive `tokens` through `tables` against `grammar`, producing the top-level
/// nodes of the parse tree.
///
/// Three parallel stacks track state indices, grammar symbols, and parse-tree
/// fragments (§4.3 "State"); a lookahead cursor indexes into `tokens`. Every
/// shift and reduce is traced at debug level through a [`Journal`] tagged
/// [`Phase::Parse`].
pub fn parse(tokens: &[Token], tables: &ParseTables, grammar: &Grammar) -> TriacResult<Vec<Node>> {
    let journal = Journal::new(Phase::Parse);
    let mut state_stack: Vec<usize> = vec![0];
    let mut symbol_stack: Vec<String> = Vec::new();
    let mut tree_stack: Vec<Node> = Vec::new();
    let mut cursor = 0;

    loop {
        let token = tokens.get(cursor).ok_or_else(|| TriacError::Parse {
            message: "token stream ended without an end-of-input token".to_string(),
            state: *state_stack.last().unwrap(),
            lookahead_index: cursor,
        })?;
        let state = *state_stack.last().unwrap();
        let terminal = token.lookup_key(&grammar.terminals).to_string();

        let action = tables.action[state].get(&terminal).cloned().ok_or_else(|| TriacError::Parse {
            message: format!("no action for '{terminal}' in state {state}"),
            state,
            lookahead_index: cursor,
        })?;

        match action {
            Action::Shift(next) => {
                crate::jdebug!(journal, "shift '{terminal}' -> state {next}");
                state_stack.push(next);
                symbol_stack.push(terminal);
                tree_stack.push(Node::Terminal(token.clone()));
                cursor += 1;
            }

            Action::Reduce { lhs, alt, len } => {
                crate::jdebug!(journal, "reduce by {lhs}#{alt} (state {state}, lookahead {cursor})");
                let rhs = grammar
                    .alternatives(&lhs)
                    .and_then(|alts| alts.get(alt))
                    .ok_or_else(|| TriacError::Parse {
                        message: format!("reduce references unknown alternative {lhs}#{alt}"),
                        state,
                        lookahead_index: cursor,
                    })?
                    .symbols
                    .clone();

                if symbol_stack.len() < len || symbol_stack[symbol_stack.len() - len..] != rhs[..] {
                    return Err(TriacError::Parse {
                        message: format!(
                            "stack top doesn't match rule {lhs} -> {}",
                            rhs.join(" ")
                        ),
                        state,
                        lookahead_index: cursor,
                    });
                }

                symbol_stack.truncate(symbol_stack.len() - len);
                state_stack.truncate(state_stack.len() - len);
                let children: Vec<Node> = tree_stack.split_off(tree_stack.len() - len);

                let top = *state_stack.last().unwrap();
                let goto = tables.goto[top].get(&lhs).copied().ok_or_else(|| TriacError::Parse {
                    message: format!("no GOTO for '{lhs}' from state {top}"),
                    state: top,
                    lookahead_index: cursor,
                })?;
                state_stack.push(goto);
                symbol_stack.push(lhs.clone());

                if lhs != ACCEPT {
                    tree_stack.push(Node::interior(lhs, children));
                } else {
                    return Ok(children);
                }
            }

            Action::Accept => {
                return Ok(tree_stack);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use triac_rust_runtime::TokenKind;

    const GOLDEN: &str = "S -> C C\nC -> c C | d\n";

    fn tok(kind: TokenKind, content: &str) -> Token {
        Token::new(kind, content, 1)
    }

    #[test]
    fn parses_ccdd_into_nested_tree() {
        let grammar = Grammar::load(GOLDEN).unwrap();
        let tables = crate::tables::build(&grammar);
        let tokens = vec![
            tok(TokenKind::Identifier, "c"),
            tok(TokenKind::Identifier, "c"),
            tok(TokenKind::Identifier, "d"),
            tok(TokenKind::Identifier, "d"),
            Token::eof(1),
        ];
        let tree = parse(&tokens, &tables, &grammar).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].category(), "S");
    }

    #[test]
    fn reports_parse_error_on_empty_action_cell() {
        let grammar = Grammar::load(GOLDEN).unwrap();
        let tables = crate::tables::build(&grammar);
        let tokens = vec![tok(TokenKind::Identifier, "d"), Token::eof(1)];
        let err = parse(&tokens, &tables, &grammar).unwrap_err();
        assert!(matches!(err, TriacError::Parse { .. }));
    }
}
