//! The parse-tree node model (§4.4).
//!
//! The parser driver constructs every interior node the same way —
//! "a freshly constructed interior node of category L owning the popped
//! tree fragments in the same order" — so there is a single [`Node`] shape
//! rather than one enum variant per grammar category. What makes a category
//! "typed" instead of "general" is that the IR builder (`crate::ir`) knows
//! how to derive semantic fields (name, type, arguments, expression) from
//! its ordered children; [`Node::category`] is exactly that registry key.

use triac_rust_runtime::Token;

/// One parse-tree node: either a terminal leaf carrying its token, or an
/// interior node labeled with a grammar category and its ordered children.
/// Ownership is exclusive — a child only ever appears under one parent — so
/// the tree is a strict tree, never cyclic (§3 "Parse Tree").
#[derive(Clone, Debug)]
pub enum Node {
    Terminal(Token),
    Interior { category: String, children: Vec<Node> },
}

impl Node {
    pub fn interior(category: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Interior { category: category.into(), children }
    }

    pub fn category(&self) -> &str {
        match self {
            Node::Terminal(t) => t.kind.desc(),
            Node::Interior { category, .. } => category,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Terminal(_) => &[],
            Node::Interior { children, .. } => children,
        }
    }

    /// The token content of a terminal leaf, descending through
    /// single-child pass-through wrappers (`expression`, `nestedExpr`, and
    /// similar structural-only categories) until a terminal is reached.
    pub fn content(&self) -> Option<&str> {
        match self {
            Node::Terminal(t) => Some(&t.content),
            Node::Interior { children, .. } => children.first().and_then(Node::content),
        }
    }
}
