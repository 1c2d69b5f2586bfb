//! Runtime types shared between the compiler core and its drivers.
//!
//! A small crate split off from the heavier core crate: this crate owns the
//! token-stream contract (the wire format between a lexer and the parser
//! driver) and the lexer that produces it. Nothing here depends on the
//! grammar, the table builder, or the IR.

pub mod constants;
pub mod lexer;
pub mod token;

pub use lexer::{tokenize, LexError};
pub use token::{Token, TokenKind};
