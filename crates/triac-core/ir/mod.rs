//! The IR builder (§4.5): a single pre-order/post-order combined walk
//! over the parse tree that emits three-address instructions, carves them
//! into basic blocks, and backpatches while-loop control flow.

pub mod program;

use crate::counters::CounterRegistry;
use crate::journal::{Journal, Phase};
use crate::parse::tree::Node;
use crate::symtab::SymbolTable;
use program::{BasicBlock, FunctionRecord, Instruction, Program};

/// Drives the walk described in §4.5 over every top-level declaration
/// in `program`, producing a lowered [`Program`].
pub struct IrBuilder<'a> {
    symtab: &'a SymbolTable,
    counters: CounterRegistry,
    program: Program,
    current: Option<usize>,
    stack: Vec<Instruction>,
    journal: Journal,
}

impl<'a> IrBuilder<'a> {
    pub fn new(symtab: &'a SymbolTable, counters: CounterRegistry) -> Self {
        Self {
            symtab,
            counters,
            program: Program::default(),
            current: None,
            stack: Vec::new(),
            journal: Journal::new(Phase::IrBuild),
        }
    }

    pub fn build(mut self, declarations: &[Node]) -> Program {
        for node in declarations {
            self.visit(node);
        }
        self.program
    }

    /// Save the pending instruction stack as a new block and start a fresh
    /// one, if there's anything pending (§4.5 "closeBlock"). An empty
    /// stack allocates no label and no block — this is load-bearing: the
    /// `+2`/`+3` forward-jump arithmetic assumes every `closeBlock` call at
    /// a structural boundary produces exactly one new block.
    fn close_block(&mut self) {
        if self.stack.is_empty() {
            return;
        }
        let label = self.counters.unique("_L");
        crate::jdebug!(self.journal, "closing block {label} with {} instruction(s)", self.stack.len());
        let body = std::mem::take(&mut self.stack);
        let idx = self.current.expect("closeBlock called outside a function");
        self.program.functions[idx].blocks.push(BasicBlock::new(label, body));
    }

    fn current_function_mut(&mut self) -> &mut FunctionRecord {
        &mut self.program.functions[self.current.expect("no active function")]
    }

    /// Visit a node, returning the string value it contributes to an
    /// enclosing expression (a terminal's content, a freshly allocated
    /// temporary, or a pass-through of a single child) — `None` for nodes
    /// with no such notion (statements, structural anchors).
    fn visit(&mut self, node: &Node) -> Option<String> {
        match node {
            Node::Terminal(token) => Some(token.content.clone()),
            Node::Interior { category, children } => self.visit_interior(category, children),
        }
    }

    fn visit_interior(&mut self, category: &str, children: &[Node]) -> Option<String> {
        match category {
            "functionDeclaration" => self.visit_function_declaration(children),
            "ifStatement" => self.visit_if_statement(children),
            "whileStatement" => self.visit_while_statement(children),
            "returnStatement" => self.visit_return_statement(children),

            "elseStatement" => {
                self.close_block();
                self.visit_all(children);
                self.close_block();
                None
            }
            "labelDeclaration" => {
                self.visit_all(children);
                if let Some(name) = children.first().and_then(Node::content) {
                    self.stack.insert(0, Instruction::new(["label".to_string(), name.to_string()]));
                }
                self.close_block();
                None
            }
            "condition" => {
                self.close_block();
                let value = self.visit_all(children).into_iter().flatten().next().unwrap_or_default();
                let next = self.counters.peek("_L");
                self.stack.push(Instruction::new([
                    "if".to_string(),
                    value,
                    "GOTO".to_string(),
                    format!("_L{}", next + 2),
                    "else".to_string(),
                    "GOTO".to_string(),
                    format!("_L{}", next + 3),
                ]));
                self.close_block();
                None
            }
            "whileCondition" => {
                self.close_block();
                let value = self.visit_all(children).into_iter().flatten().next().unwrap_or_default();
                let next = self.counters.peek("_L");
                self.stack.push(Instruction::new([
                    "REPLACEME".to_string(),
                    "if".to_string(),
                    value,
                    "GOTO".to_string(),
                    format!("_L{}", next + 2),
                    "else".to_string(),
                    "GOTO".to_string(),
                    "UNKNOWN".to_string(),
                ]));
                self.close_block();
                None
            }

            "argList" => {
                let names: Vec<String> = children.iter().filter_map(|c| self.visit(c)).collect();
                Some(names.join(", "))
            }
            "arg" => Some(children.get(1).and_then(Node::content).unwrap_or("None").to_string()),
            "paramList" => {
                let values: Vec<String> = children.iter().filter_map(|c| self.visit(c)).collect();
                Some(values.join(", "))
            }
            "param" => children.first().and_then(|c| self.visit(c)),

            "varDec" => {
                let values = self.visit_all(children);
                let name = children.get(1).and_then(Node::content).unwrap_or_default().to_string();
                let value = if children.len() == 3 {
                    values.get(2).cloned().flatten().unwrap_or_default()
                } else {
                    "null".to_string()
                };
                self.stack.push(Instruction::new([name, "=".to_string(), value]));
                None
            }

            "assignment" | "exprAssignment" | "callAssignment" => {
                self.visit_all(children);
                let name = children.first().and_then(Node::content).unwrap_or_default().to_string();
                let recent = self.counters.peek("r");
                self.stack.push(Instruction::new([name, "=".to_string(), format!("r{recent}")]));
                None
            }
            "incAssignment" => self.emit_inc_dec(children, "+"),
            "decAssignment" => self.emit_inc_dec(children, "-"),
            "incEqualAssignment" => self.emit_compound_assign(children, "+"),
            "decEqualAssignment" => self.emit_compound_assign(children, "-"),

            "addExpr" => self.emit_binary(children, "+"),
            "subExpr" => self.emit_binary(children, "-"),
            "multExpr" => self.emit_binary(children, "*"),
            "divExpr" => self.emit_binary(children, "/"),
            "modExpr" => self.emit_binary(children, "%"),

            "callStatement" => {
                self.visit_all(children);
                let callee = children.first().and_then(Node::content).unwrap_or_default().to_string();
                let params = children.get(1).and_then(Node::content).unwrap_or_default().to_string();
                self.stack.push(Instruction::new(["call".to_string(), callee, format!("({params})")]));
                None
            }

            "ifBody" => unreachable!("ifBody is visited explicitly by visit_if_statement"),

            // Not in the source's node registry at all (its break handling
            // is itself incomplete — see DESIGN.md) but required to produce
            // the `(break,)` marker that `whileStatement`'s post-order
            // backpatch rewrites into a `goto`.
            "breakStatement" => {
                self.stack.push(Instruction::new(["break".to_string()]));
                None
            }

            // Pass-through interior nodes (program, declarationList, statement,
            // expression, nestedExpr, and the supplemented boolean/comparison/
            // for/include categories): no instruction of their own, value (if
            // any) comes from the first child.
            _ => {
                let values = self.visit_all(children);
                values.into_iter().flatten().next()
            }
        }
    }

    fn visit_all(&mut self, children: &[Node]) -> Vec<Option<String>> {
        children.iter().map(|c| self.visit(c)).collect()
    }

    fn visit_function_declaration(&mut self, children: &[Node]) -> Option<String> {
        let name = children.get(1).and_then(Node::content).unwrap_or_default().to_string();
        let declarations = self.symtab.variables(&name);
        crate::jdebug!(self.journal, "lowering function '{name}' ({declarations} declared local(s))");

        self.program.functions.push(FunctionRecord {
            name: name.clone(),
            arguments: String::new(),
            declarations,
            blocks: Vec::new(),
        });
        self.current = Some(self.program.functions.len() - 1);

        let values = self.visit_all(children);
        let arguments = children.get(2).and(values.get(2).cloned().flatten()).unwrap_or_default();
        self.current_function_mut().arguments = arguments;
        self.close_block();
        None
    }

    fn visit_if_statement(&mut self, children: &[Node]) -> Option<String> {
        self.close_block();
        let has_else = children.len() > 2;

        if let Some(condition) = children.first() {
            self.visit(condition);
        }
        if let Some(if_body) = children.get(1) {
            self.visit_if_body(if_body, has_else);
        }
        if let Some(else_stmt) = children.get(2) {
            self.visit(else_stmt);
        }

        self.close_block();
        None
    }

    fn visit_if_body(&mut self, node: &Node, has_else: bool) {
        self.visit_all(node.children());
        if has_else {
            let next = self.counters.peek("_L");
            self.stack.push(Instruction::new(["goto".to_string(), format!("_L{}", next + 3)]));
        }
        self.close_block();
    }

    fn visit_while_statement(&mut self, children: &[Node]) -> Option<String> {
        self.close_block();
        let saved_label = self.counters.peek("_L");

        self.visit_all(children);

        self.stack.push(Instruction::new(["goto".to_string(), format!("_L{}", saved_label + 1)]));
        self.close_block();

        let break_label = format!("_L{}", self.counters.peek("_L") - saved_label + 2);
        self.backpatch_while(saved_label, &break_label);
        None
    }

    fn backpatch_while(&mut self, saved_label: usize, break_label: &str) {
        let blocks = &mut self.current_function_mut().blocks;

        let patched = if let Some(cond_block) = blocks.get_mut(saved_label) {
            if let Some(instr) = cond_block.instructions.iter_mut().find(|i| i.op() == Some("REPLACEME")) {
                instr.0.remove(0);
                *instr.0.last_mut().unwrap() = break_label.to_string();
                true
            } else {
                false
            }
        } else {
            false
        };
        // A `whileCondition` always pushes the `REPLACEME` placeholder before
        // closing its block (§4.5), so `saved_label` must name that exact
        // block. Failing to find it is a builder bug, not a user-facing
        // error (§7 "indicates a bug in the IR builder").
        debug_assert!(patched, "while-condition block at _L{saved_label} missing its REPLACEME sentinel");

        for block in blocks.iter_mut().skip(saved_label) {
            for instr in block.instructions.iter_mut() {
                if instr.0 == ["break"] {
                    *instr = Instruction::new(["goto".to_string(), break_label.to_string()]);
                }
            }
        }
    }

    fn visit_return_statement(&mut self, children: &[Node]) -> Option<String> {
        let values = self.visit_all(children);
        let value = values.into_iter().flatten().next().unwrap_or_default();
        self.stack.push(Instruction::new(["ret".to_string(), value]));
        self.close_block();
        None
    }

    fn emit_inc_dec(&mut self, children: &[Node], op: &str) -> Option<String> {
        self.visit_all(children);
        let name = children.first().and_then(Node::content).unwrap_or_default().to_string();
        let temp = self.counters.unique("r");
        self.stack.push(Instruction::new([temp.clone(), "=".to_string(), name, op.to_string(), "1".to_string()]));
        Some(temp)
    }

    fn emit_compound_assign(&mut self, children: &[Node], op: &str) -> Option<String> {
        let values = self.visit_all(children);
        let name = children.first().and_then(Node::content).unwrap_or_default().to_string();
        let expr = values.get(1).cloned().flatten().unwrap_or_default();
        let temp = self.counters.unique("r");
        self.stack.push(Instruction::new([temp.clone(), "=".to_string(), name, op.to_string(), expr]));
        Some(temp)
    }

    fn emit_binary(&mut self, children: &[Node], op: &str) -> Option<String> {
        let values = self.visit_all(children);
        let left = values.first().cloned().flatten().unwrap_or_default();
        let right = values.get(1).cloned().flatten().unwrap_or_default();
        let temp = self.counters.unique("r");
        self.stack.push(Instruction::new([temp.clone(), "=".to_string(), left, op.to_string(), right]));
        Some(temp)
    }
}
