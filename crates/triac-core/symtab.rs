//! The symbol table (§1 Non-goal: full type-checking is out of scope;
//! §6 "Symbol table contract"): this module supplies exactly the
//! query the IR builder depends on, `variables(name) -> count`, built by
//! walking each function's declarations once rather than during a
//! semantic-analysis pass.

use std::collections::HashMap;

use crate::parse::tree::Node;

/// Per-function declared-local counts, keyed by function name.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    variables: HashMap<String, usize>,
}

impl SymbolTable {
    /// Walk every `functionDeclaration` in `program`, counting `varDec`
    /// nodes (declared locals) plus the declared arguments in its
    /// `argList` — matching the source's `symbolTable.table[name]["variables"]`,
    /// which counts both.
    pub fn from_program(program: &[Node]) -> Self {
        let mut variables = HashMap::new();
        for node in program {
            walk_declarations(node, &mut variables);
        }
        Self { variables }
    }

    pub fn variables(&self, function_name: &str) -> usize {
        self.variables.get(function_name).copied().unwrap_or(0)
    }
}

fn walk_declarations(node: &Node, out: &mut HashMap<String, usize>) {
    if node.category() == "functionDeclaration" {
        // Semantic fields are the first three children (type, name,
        // arguments); anything after that is the function body, present in
        // the tree for traversal even though §4.4 only calls out the
        // first three as derived fields.
        if let Some((name_node, rest)) = node.children().get(1).zip(node.children().get(2..)) {
            if let Some(name) = name_node.content() {
                let args_count = node.children().get(2).map(arg_count).unwrap_or(0);
                let local_count: usize = rest.iter().skip(1).map(count_var_decs).sum();
                out.insert(name.to_string(), args_count + local_count);
            }
        }
        return;
    }
    for child in node.children() {
        walk_declarations(child, out);
    }
}

fn arg_count(args_node: &Node) -> usize {
    args_node
        .children()
        .iter()
        .filter(|arg| arg.category() == "arg" && arg.children().len() == 2)
        .count()
}

fn count_var_decs(node: &Node) -> usize {
    let mut total = if node.category() == "varDec" { 1 } else { 0 };
    for child in node.children() {
        total += count_var_decs(child);
    }
    total
}

#[cfg(test)]
mod test {
    use super::*;
    use triac_rust_runtime::{Token, TokenKind};

    fn ident(s: &str) -> Node {
        Node::Terminal(Token::new(TokenKind::Identifier, s, 1))
    }

    #[test]
    fn counts_arguments_and_locals() {
        let args = Node::interior(
            "argList",
            vec![Node::interior("arg", vec![ident("int"), ident("x")])],
        );
        let var_dec = Node::interior("varDec", vec![ident("int"), ident("y")]);
        let body = Node::interior("statementList", vec![var_dec]);
        let func = Node::interior("functionDeclaration", vec![ident("int"), ident("f"), args, body]);

        let table = SymbolTable::from_program(&[func]);
        assert_eq!(table.variables("f"), 2);
        assert_eq!(table.variables("unknown"), 0);
    }
}
