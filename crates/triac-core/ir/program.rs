//! The IR program model (§3 "IR Program") and its on-disk JSON format
//! (§6 "IR file"): a flat array mixing function headers, label
//! markers, and instructions, even though in memory it is organized as a
//! map of function name to an ordered list of basic blocks.

use serde_json::Value;

use crate::error::{TriacError, TriacResult};

/// A flat ordered tuple of operator and operands, e.g. `(assign, t, x, "+",
/// y)` or `(ret, v)` (§3 "instruction").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction(pub Vec<String>);

impl Instruction {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Instruction(parts.into_iter().map(Into::into).collect())
    }

    pub fn op(&self) -> Option<&str> {
        self.0.first().map(|s| s.as_str())
    }
}

/// A label plus its ordered instruction list, whose first entry is always
/// the pseudo-instruction `(label, L)` (§3 "basic block").
#[derive(Clone, Debug)]
pub struct BasicBlock {
    pub label: String,
    pub instructions: Vec<Instruction>,
}

impl BasicBlock {
    pub fn new(label: impl Into<String>, mut body: Vec<Instruction>) -> Self {
        let label = label.into();
        body.insert(0, Instruction::new(["label".to_string(), label.clone()]));
        Self { label, instructions: body }
    }
}

/// One function's lowered form: its declared argument string, its declared
/// local count (from the symbol table), and its basic blocks in emission
/// order.
#[derive(Clone, Debug, Default)]
pub struct FunctionRecord {
    pub name: String,
    pub arguments: String,
    pub declarations: usize,
    pub blocks: Vec<BasicBlock>,
}

/// The complete lowered program: every function, in the order they were
/// declared.
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub functions: Vec<FunctionRecord>,
}

impl Program {
    pub fn function(&self, name: &str) -> Option<&FunctionRecord> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Flatten to the §6 wire format: one JSON array of arrays, with
    /// function headers, label markers and instructions interleaved in
    /// emission order.
    pub fn to_json(&self) -> Value {
        let mut entries = Vec::new();
        for function in &self.functions {
            entries.push(Value::Array(vec![
                Value::String(format!(".{}", function.name)),
                Value::String(function.arguments.clone()),
                Value::Number((function.declarations as u64).into()),
            ]));
            for block in &function.blocks {
                for instr in &block.instructions {
                    entries.push(Value::Array(
                        instr.0.iter().cloned().map(Value::String).collect(),
                    ));
                }
            }
        }
        Value::Array(entries)
    }

    /// Re-materialize a program from the flattened wire format (§6
    /// "Deserialization of IR"): entries beginning `.` start a function;
    /// `(label, L)` entries start a new basic block; everything else
    /// appends to the block currently being built.
    pub fn from_json(value: &Value) -> TriacResult<Program> {
        let entries = value.as_array().ok_or_else(|| TriacError::Io {
            path: "<ir>".into(),
            message: "expected a top-level JSON array".to_string(),
        })?;

        let mut program = Program::default();
        let mut current_block: Option<(String, Vec<Instruction>)> = None;

        let flush = |program: &mut Program, current_block: &mut Option<(String, Vec<Instruction>)>| {
            if let Some((label, instrs)) = current_block.take() {
                if let Some(func) = program.functions.last_mut() {
                    func.blocks.push(BasicBlock { label, instructions: instrs });
                }
            }
        };

        for entry in entries {
            let row = entry.as_array().ok_or_else(|| TriacError::Io {
                path: "<ir>".into(),
                message: "expected an array entry".to_string(),
            })?;
            let command = row
                .first()
                .and_then(Value::as_str)
                .ok_or_else(|| TriacError::Io { path: "<ir>".into(), message: "empty entry".to_string() })?;

            if let Some(name) = command.strip_prefix('.') {
                flush(&mut program, &mut current_block);
                let arguments = row.get(1).and_then(Value::as_str).unwrap_or("").to_string();
                let declarations = row.get(2).and_then(Value::as_u64).unwrap_or(0) as usize;
                program.functions.push(FunctionRecord {
                    name: name.to_string(),
                    arguments,
                    declarations,
                    blocks: Vec::new(),
                });
            } else if command == "label" {
                flush(&mut program, &mut current_block);
                let label = row.get(1).and_then(Value::as_str).unwrap_or("").to_string();
                // The flattened entry is the block's own leading
                // pseudo-instruction; `BasicBlock::new` would re-insert it,
                // so the in-progress instruction list starts empty and the
                // label row is re-added by `BasicBlock::new` on flush. To
                // avoid double-inserting we build the block directly here.
                current_block = Some((label.clone(), vec![Instruction::new(["label".to_string(), label])]));
            } else {
                let instr = Instruction::new(row.iter().filter_map(Value::as_str).map(str::to_string));
                if let Some((_, instrs)) = current_block.as_mut() {
                    instrs.push(instr);
                }
            }
        }
        flush(&mut program, &mut current_block);

        Ok(program)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips_a_single_function_through_json() {
        let block = BasicBlock::new("_L1", vec![Instruction::new(["ret".to_string(), "1".to_string()])]);
        let program = Program {
            functions: vec![FunctionRecord {
                name: "f".to_string(),
                arguments: "".to_string(),
                declarations: 0,
                blocks: vec![block],
            }],
        };

        let json = program.to_json();
        let restored = Program::from_json(&json).unwrap();
        let func = restored.function("f").unwrap();
        assert_eq!(func.blocks.len(), 1);
        assert_eq!(func.blocks[0].instructions[0].0, vec!["label", "_L1"]);
        assert_eq!(func.blocks[0].instructions[1].0, vec!["ret", "1"]);
    }
}
