//! Table cache persistence (§4.2 "Persistence", §6 "Table cache
//! file"): two JSON lines, ACTION then GOTO, with state keys serialized as
//! decimal strings and re-integerized on load.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{TriacError, TriacResult};
use crate::tables::{Action, ActionTable, GotoTable, ParseTables};

/// The cache path for a grammar file: its basename with a `.tables` suffix,
/// under `cache_dir`.
pub fn cache_path(cache_dir: &Path, grammar_file: &Path) -> PathBuf {
    let stem = grammar_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "grammar".to_string());
    cache_dir.join(format!("{stem}.tables"))
}

/// Load tables from `path` if present and `force_rebuild` is false,
/// otherwise build fresh from `grammar` and write the result back.
pub fn load_or_build(
    path: &Path,
    force_rebuild: bool,
    grammar: &crate::grammar::Grammar,
) -> TriacResult<ParseTables> {
    if !force_rebuild {
        if let Ok(text) = std::fs::read_to_string(path) {
            if let Some(tables) = parse(&text, grammar)? {
                return Ok(tables);
            }
        }
    }

    let tables = super::build(grammar);
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let rendered = render(&tables.action, &tables.goto);
    std::fs::write(path, rendered).map_err(|e| TriacError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(tables)
}

/// Render the ACTION/GOTO pair as the two-line cache format (§6).
pub fn render(action: &ActionTable, goto: &GotoTable) -> String {
    let mut action_obj = serde_json::Map::new();
    for (state, row) in action.iter().enumerate() {
        let mut cell = serde_json::Map::new();
        for (terminal, a) in row {
            let encoded = match a {
                Action::Shift(j) => format!("s {j}"),
                Action::Reduce { lhs, alt, .. } => format!("r {lhs} {alt}"),
                Action::Accept => "acc".to_string(),
            };
            cell.insert(terminal.clone(), Value::String(encoded));
        }
        action_obj.insert(state.to_string(), Value::Object(cell));
    }

    let mut goto_obj = serde_json::Map::new();
    for (state, row) in goto.iter().enumerate() {
        let mut cell = serde_json::Map::new();
        for (nonterm, j) in row {
            cell.insert(nonterm.clone(), Value::Number((*j as u64).into()));
        }
        goto_obj.insert(state.to_string(), Value::Object(cell));
    }

    format!(
        "{}\n{}\n",
        Value::Object(action_obj),
        Value::Object(goto_obj)
    )
}

/// Parse the two-line cache format back into tables. Returns `Ok(None)` if
/// `text` isn't well-formed (treated as a cache miss rather than an error,
/// matching the source's tolerant reload). `grammar` recovers a reduce
/// cell's rule length from its `(lhs, alt)` pair — §6's wire encoding
/// (`"r <L> <k>"`) carries the alternative index, not its length.
fn parse(text: &str, grammar: &crate::grammar::Grammar) -> TriacResult<Option<ParseTables>> {
    let mut lines = text.lines();
    let Some(action_line) = lines.next() else { return Ok(None) };
    let Some(goto_line) = lines.next() else { return Ok(None) };

    let Ok(action_value) = serde_json::from_str::<Value>(action_line) else { return Ok(None) };
    let Ok(goto_value) = serde_json::from_str::<Value>(goto_line) else { return Ok(None) };

    let Some(action_map) = action_value.as_object() else { return Ok(None) };
    let Some(goto_map) = goto_value.as_object() else { return Ok(None) };

    let state_count = action_map.len().max(goto_map.len());
    let mut action: ActionTable = vec![HashMap::new(); state_count];
    let mut goto: GotoTable = vec![HashMap::new(); state_count];

    for (key, row) in action_map {
        let Ok(state) = key.parse::<usize>() else { return Ok(None) };
        let Some(row) = row.as_object() else { return Ok(None) };
        for (terminal, encoded) in row {
            let Some(encoded) = encoded.as_str() else { return Ok(None) };
            let Some(a) = decode_action(encoded, grammar) else { return Ok(None) };
            action[state].insert(terminal.clone(), a);
        }
    }

    for (key, row) in goto_map {
        let Ok(state) = key.parse::<usize>() else { return Ok(None) };
        let Some(row) = row.as_object() else { return Ok(None) };
        for (nonterm, j) in row {
            let Some(j) = j.as_u64() else { return Ok(None) };
            goto[state].insert(nonterm.clone(), j as usize);
        }
    }

    Ok(Some(ParseTables { states: Vec::new(), action, goto, conflicts: Vec::new() }))
}

fn decode_action(encoded: &str, grammar: &crate::grammar::Grammar) -> Option<Action> {
    if encoded == "acc" {
        return Some(Action::Accept);
    }
    let mut parts = encoded.split(' ');
    match parts.next()? {
        "s" => Some(Action::Shift(parts.next()?.parse().ok()?)),
        "r" => {
            let lhs = parts.next()?.to_string();
            let alt = parts.next()?.parse().ok()?;
            let len = grammar.alternatives(&lhs)?.get(alt)?.symbols.len();
            Some(Action::Reduce { lhs, alt, len })
        }
        _ => None,
    }
}
