//! Keyword and punctuation tables consulted by the lexer.
//!
//! Flat lists checked by exact text match, punctuation ordered longest-first
//! so e.g. `+=` is not mistakenly split into `+` and `=`.

use crate::token::TokenKind;

/// Type keywords. These lex to `TokenKind::TypeSpecifier` (a typed terminal
/// matched by kind, not by literal text) rather than to their own keyword
/// kind.
pub const TYPE_SPECIFIERS: &[&str] = &["int", "void", "char"];

/// Keywords that lex to their own dedicated kind.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("return", TokenKind::Return),
    ("break", TokenKind::Break),
];

/// The `#include` directive keyword. Handled separately from [`KEYWORDS`]
/// because it changes how the remainder of the line is lexed: everything
/// after it resolves to a single `filename` token instead of being lexed
/// normally.
pub const INCLUDE_KEYWORD: &str = "#include";

/// Punctuation symbols, longest text first so multi-character operators are
/// preferred over their single-character prefixes.
pub const PUNCTUATION: &[(&str, TokenKind)] = &[
    ("++", TokenKind::PlusPlus),
    ("--", TokenKind::MinusMinus),
    ("+=", TokenKind::PlusEquals),
    ("-=", TokenKind::MinusEquals),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::Ne),
    ("<=", TokenKind::Le),
    (">=", TokenKind::Ge),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::OrOr),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("=", TokenKind::Assign),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
];
