//! Front-end compiler core: grammar loading, LR(1) table construction, the
//! shift-reduce parser driver, the symbol table, and the IR builder.
//!
//! The pipeline a caller drives (see `triac-cli`) is: [`grammar::Grammar`]
//! load, [`tables`] build-or-load, [`parse`] a token stream into a tree,
//! [`symtab::SymbolTable`] from that tree, then [`ir::IrBuilder`] to lower
//! it into a [`ir::program::Program`].

pub mod config;
pub mod counters;
pub mod error;
pub mod grammar;
pub mod ir;
pub mod journal;
pub mod parse;
pub mod symtab;
pub mod tables;

pub use config::Config;
pub use counters::CounterRegistry;
pub use error::{TriacError, TriacResult};
pub use grammar::Grammar;
pub use ir::program::Program;
pub use ir::IrBuilder;
pub use parse::tree::Node;
pub use symtab::SymbolTable;
pub use tables::ParseTables;

use std::path::Path;

use triac_rust_runtime::Token;

/// Run the full pipeline end to end: build-or-load tables for `grammar`,
/// parse `tokens` against them, derive a symbol table, and lower to IR.
/// This is the composition `triac-cli`'s `compile` subcommand drives; it's
/// exposed here too so integration tests can exercise the whole front end
/// without going through the CLI layer.
pub fn compile(
    grammar: &Grammar,
    tokens: &[Token],
    config: &Config,
    grammar_file: &Path,
) -> TriacResult<Program> {
    let journal = journal::Journal::new(journal::Phase::TableBuild);
    let cache_file = tables::cache::cache_path(&config.cache_dir, grammar_file);
    let built = tables::cache::load_or_build(&cache_file, config.force_rebuild, grammar)?;
    if !built.conflicts.is_empty() {
        crate::jwarn!(journal, "{} table conflict(s) recorded", built.conflicts.len());
    }

    let tree = parse::parse(tokens, &built, grammar)?;
    let symtab = SymbolTable::from_program(&tree);
    let counters = CounterRegistry::with_seed(config.counter_seed);
    Ok(IrBuilder::new(&symtab, counters).build(&tree))
}
