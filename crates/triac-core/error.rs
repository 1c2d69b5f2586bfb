//! Error taxonomy (§7): a single hand-written enum covering every failure
//! mode the compiler can surface, rather than a derive-macro error crate.

use std::fmt;
use std::path::PathBuf;

use triac_rust_runtime::LexError;

/// Every error a `triac` compilation can surface to a caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TriacError {
    /// A grammar line was malformed (no `->`). Aborts table construction
    /// (§7: `GrammarError`).
    Grammar { line: usize, message: String },

    /// No ACTION cell for `(state, terminal)`, or a reduce whose top-of-stack
    /// symbols didn't match the rule RHS. No recovery (§7:
    /// `ParseError`).
    Parse { message: String, state: usize, lookahead_index: usize },

    /// Unrecognized source chunk or unterminated literal/comment (§7:
    /// `LexError`).
    Lex(LexError),

    /// A required input file was missing or unreadable (§7: `IOError`).
    Io { path: PathBuf, message: String },
}

impl fmt::Display for TriacError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriacError::Grammar { line, message } => {
                write!(f, "grammar error at line {line}: {message}")
            }
            TriacError::Parse { message, state, lookahead_index } => {
                write!(
                    f,
                    "parse error at token {lookahead_index} (state {state}): {message}"
                )
            }
            TriacError::Lex(e) => write!(f, "{e}"),
            TriacError::Io { path, message } => {
                write!(f, "io error reading {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for TriacError {}

impl From<LexError> for TriacError {
    fn from(e: LexError) -> Self {
        TriacError::Lex(e)
    }
}

pub type TriacResult<T> = Result<T, TriacError>;

/// A duplicate write to a single ACTION-table cell (§4.2, §7:
/// `TableConflict`). These are collected rather than treated as fatal: the
/// later write wins, matching the source's observable behavior, but the
/// collision is reported via [`log`] so an implementer/operator can see it
/// (§4.2's "SHOULD be reported").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableConflict {
    pub state: usize,
    pub terminal: String,
    pub kind: ConflictKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

impl fmt::Display for TableConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ConflictKind::ShiftReduce => "shift/reduce",
            ConflictKind::ReduceReduce => "reduce/reduce",
        };
        write!(f, "{kind} conflict in state {} on '{}'", self.state, self.terminal)
    }
}
