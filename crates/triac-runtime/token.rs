//! The token-stream contract between the lexer and the parser driver.

use std::fmt;

/// The closed set of lexical categories the lexer can produce.
///
/// [`TokenKind::desc`] returns the *kind name* used for ACTION-table lookup
/// when the lookahead's kind belongs to the grammar's terminal set (the typed
/// categories below). Keyword and punctuation kinds deliberately describe
/// themselves with a name distinct from their literal text, so table lookup
/// falls through to the token's `content` for those — see
/// [`Token::lookup_key`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Number,
    Str,
    Character,
    Filename,
    TypeSpecifier,
    Eof,

    If,
    Else,
    While,
    Return,
    Break,
    Include,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    PlusEquals,
    MinusEquals,
    PlusPlus,
    MinusMinus,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    Ne,
    AndAnd,
    OrOr,
}

impl TokenKind {
    /// The kind name used for grammar terminal matching. Typed kinds return
    /// their exact terminal identifiers (`"identifier"`, `"number"`, ...);
    /// keyword and punctuation kinds return a descriptor that never collides
    /// with a literal grammar terminal, so the parser driver's terminal-
    /// selection rule falls back to `content` for them.
    pub fn desc(&self) -> &'static str {
        use TokenKind::*;
        match self {
            Identifier => "identifier",
            Number => "number",
            Str => "string",
            Character => "character",
            Filename => "filename",
            TypeSpecifier => "typeSpecifier",
            Eof => "$",
            If => "<kw:if>",
            Else => "<kw:else>",
            While => "<kw:while>",
            Return => "<kw:return>",
            Break => "<kw:break>",
            Include => "<kw:include>",
            Plus => "<sym:+>",
            Minus => "<sym:->",
            Star => "<sym:*>",
            Slash => "<sym:/>",
            Percent => "<sym:%>",
            Assign => "<sym:=>",
            PlusEquals => "<sym:+=>",
            MinusEquals => "<sym:-=>",
            PlusPlus => "<sym:++>",
            MinusMinus => "<sym:-->",
            LParen => "<sym:(>",
            RParen => "<sym:)>",
            LBrace => "<sym:{>",
            RBrace => "<sym:}>",
            Semicolon => "<sym:;>",
            Comma => "<sym:,>",
            Lt => "<sym:<>",
            Gt => "<sym:>>",
            Le => "<sym:<=>",
            Ge => "<sym:>=>",
            EqEq => "<sym:==>",
            Ne => "<sym:!=>",
            AndAnd => "<sym:&&>",
            OrOr => "<sym:||>",
        }
    }
}

/// A single lexical token: a kind paired with the literal source text it was
/// recognized from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    /// 1-based source line the token was produced from, used for diagnostics.
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, content: impl Into<String>, line: usize) -> Self {
        Self { kind, content: content.into(), line }
    }

    pub fn eof(line: usize) -> Self {
        Self::new(TokenKind::Eof, "$", line)
    }

    /// The string the parser driver uses to index the ACTION table: the
    /// kind's description if it names a declared terminal, otherwise the
    /// token's literal content.
    pub fn lookup_key<'a>(&'a self, terminals: &[String]) -> &'a str {
        let desc = self.kind.desc();
        if terminals.iter().any(|t| t == desc) {
            desc
        } else {
            &self.content
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind.desc(), self.content)
    }
}
