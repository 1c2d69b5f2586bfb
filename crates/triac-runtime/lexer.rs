//! The lexer: turns source text into the token stream the parser driver
//! consumes.
//!
//! Understands quoted string/character literals, `//` and `/* */` comments
//! (the latter spanning lines), and `#include` directives.

use std::fmt;

use crate::constants::{INCLUDE_KEYWORD, KEYWORDS, PUNCTUATION, TYPE_SPECIFIERS};
use crate::token::{Token, TokenKind};

/// Lexical errors. Aborts the compilation; there is no recovery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LexError {
    /// A chunk of source text did not match any recognized keyword,
    /// identifier, number, or punctuation form.
    Unrecognized { line: usize, chunk: String },
    /// A `"`/`'`-delimited literal was never closed before end of line.
    UnterminatedLiteral { line: usize, opened_with: char },
    /// A `/* ... */` comment was never closed before end of input.
    UnterminatedComment { line: usize },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::Unrecognized { line, chunk } => {
                write!(f, "line {line}: unrecognized token '{chunk}'")
            }
            LexError::UnterminatedLiteral { line, opened_with } => {
                write!(f, "line {line}: unterminated {opened_with}-quoted literal")
            }
            LexError::UnterminatedComment { line } => {
                write!(f, "line {line}: unterminated /* */ comment")
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Tokenize an entire source buffer, appending a final [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut in_block_comment = false;

    for (line_no, line) in source.lines().enumerate() {
        let line_no = line_no + 1;
        tokenize_line(line, line_no, &mut in_block_comment, &mut tokens)?;
    }

    if in_block_comment {
        return Err(LexError::UnterminatedComment { line: source.lines().count() });
    }

    tokens.push(Token::eof(source.lines().count() + 1));
    Ok(tokens)
}

/// Tokenize a single line, carrying block-comment state across lines.
fn tokenize_line(
    line: &str,
    line_no: usize,
    in_block_comment: &mut bool,
    out: &mut Vec<Token>,
) -> Result<(), LexError> {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0usize;
    let mut chunk_start: Option<usize> = None;

    macro_rules! flush_chunk {
        ($end:expr) => {
            if let Some(start) = chunk_start.take() {
                if start < $end {
                    let text: String = chars[start..$end].iter().collect();
                    out.push(classify_chunk(&text, line_no)?);
                }
            }
        };
    }

    while i < chars.len() {
        if *in_block_comment {
            if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                *in_block_comment = false;
                i += 2;
            } else {
                i += 1;
            }
            continue;
        }

        // `#include <path>` / `#include "path"` — the whole remainder of the
        // directive becomes a single `Filename` token.
        if chunk_start.is_none() && line[byte_index(&chars, i)..].starts_with(INCLUDE_KEYWORD) {
            let rest = line[byte_index(&chars, i) + INCLUDE_KEYWORD.len()..].trim();
            let path = rest.trim_matches(|c| c == '<' || c == '>' || c == '"');
            out.push(Token::new(TokenKind::Filename, path, line_no));
            return Ok(());
        }

        if chars[i] == '/' && chars.get(i + 1) == Some(&'/') {
            flush_chunk!(i);
            return Ok(());
        }

        if chars[i] == '/' && chars.get(i + 1) == Some(&'*') {
            flush_chunk!(i);
            *in_block_comment = true;
            i += 2;
            continue;
        }

        if chars[i] == '"' || chars[i] == '\'' {
            flush_chunk!(i);
            let delim = chars[i];
            let (literal, end) = scan_quoted(&chars, i, delim, line_no)?;
            let kind = if delim == '"' { TokenKind::Str } else { TokenKind::Character };
            out.push(Token::new(kind, literal, line_no));
            i = end + 1;
            continue;
        }

        if chars[i].is_whitespace() {
            flush_chunk!(i);
            i += 1;
            continue;
        }

        if let Some((text, kind)) = match_punctuation(&chars, i) {
            flush_chunk!(i);
            out.push(Token::new(kind, text, line_no));
            i += text.chars().count();
            continue;
        }

        if chunk_start.is_none() {
            chunk_start = Some(i);
        }
        i += 1;
    }

    flush_chunk!(chars.len());
    Ok(())
}

fn byte_index(chars: &[char], char_index: usize) -> usize {
    chars[..char_index].iter().map(|c| c.len_utf8()).sum()
}

fn match_punctuation(chars: &[char], at: usize) -> Option<(&'static str, TokenKind)> {
    for (text, kind) in PUNCTUATION {
        let len = text.chars().count();
        if chars.len() >= at + len && chars[at..at + len].iter().collect::<String>() == *text {
            return Some((text, *kind));
        }
    }
    None
}

fn scan_quoted(
    chars: &[char],
    start: usize,
    delim: char,
    line_no: usize,
) -> Result<(String, usize), LexError> {
    let mut i = start + 1;
    let mut literal = String::new();
    while i < chars.len() {
        if chars[i] == '\\' && chars.get(i + 1) == Some(&delim) {
            literal.push(delim);
            i += 2;
            continue;
        }
        if chars[i] == delim {
            return Ok((literal, i));
        }
        literal.push(chars[i]);
        i += 1;
    }
    Err(LexError::UnterminatedLiteral { line: line_no, opened_with: delim })
}

/// Classify a whitespace/punctuation-delimited chunk as a type specifier,
/// keyword, identifier, or number.
fn classify_chunk(text: &str, line_no: usize) -> Result<Token, LexError> {
    if TYPE_SPECIFIERS.contains(&text) {
        return Ok(Token::new(TokenKind::TypeSpecifier, text, line_no));
    }
    if let Some((_, kind)) = KEYWORDS.iter().find(|(kw, _)| *kw == text) {
        return Ok(Token::new(*kind, text, line_no));
    }
    if is_identifier(text) {
        return Ok(Token::new(TokenKind::Identifier, text, line_no));
    }
    if text.chars().all(|c| c.is_ascii_digit()) && !text.is_empty() {
        return Ok(Token::new(TokenKind::Number, text, line_no));
    }
    Err(LexError::Unrecognized { line: line_no, chunk: text.to_string() })
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tokenizes_function_with_return() {
        let src = "int f() { return 1; }";
        let toks = tokenize(src).unwrap();
        let kinds: Vec<TokenKind> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::TypeSpecifier,
                TokenKind::Identifier,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Return,
                TokenKind::Number,
                TokenKind::Semicolon,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_line_comment() {
        let src = "int x = 1; // trailing comment\nint y = 2;";
        let toks = tokenize(src).unwrap();
        assert!(toks.iter().all(|t| !t.content.contains("trailing")));
    }

    #[test]
    fn spans_block_comment_across_lines() {
        let src = "int x /* this\nspans lines */ = 1;";
        let toks = tokenize(src).unwrap();
        let kinds: Vec<TokenKind> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::TypeSpecifier,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Number,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn reads_quoted_string() {
        let src = r#"str s = "hello world";"#;
        let toks = tokenize(src).unwrap();
        let s = toks.iter().find(|t| t.kind == TokenKind::Str).unwrap();
        assert_eq!(s.content, "hello world");
    }

    #[test]
    fn resolves_include_directive() {
        let src = "#include <stdio.h>";
        let toks = tokenize(src).unwrap();
        assert_eq!(toks[0].kind, TokenKind::Filename);
        assert_eq!(toks[0].content, "stdio.h");
    }

    #[test]
    fn reports_unterminated_string() {
        let src = "str s = \"oops;";
        let err = tokenize(src).unwrap_err();
        assert!(matches!(err, LexError::UnterminatedLiteral { .. }));
    }
}
