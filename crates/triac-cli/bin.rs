//! `triac`: the command-line driver for the front-end compiler.
//!
//! Thin glue over `triac_core`: read the files a subcommand names, run one
//! pipeline stage, print or write the result. No logic that belongs in the
//! library lives here.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use triac_core::tables::cache;
use triac_core::{Config, Grammar};
use triac_rust_runtime::tokenize;

#[derive(Parser)]
#[command(name = "triac", version, about = "LR(1) front-end compiler for the toy C-like language")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory the table cache is read from / written to.
    #[arg(long, global = true, default_value = "tables")]
    cache_dir: PathBuf,

    /// Rebuild the LR(1) tables even if a cache entry exists.
    #[arg(long, global = true)]
    force_rebuild: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Build (or load from cache) the ACTION/GOTO tables for a grammar.
    BuildTables {
        grammar_file: PathBuf,
    },
    /// Parse a source file against a grammar's tables and print the tree's
    /// top-level node categories.
    Parse {
        grammar_file: PathBuf,
        source_file: PathBuf,
    },
    /// Run the full pipeline and write the lowered IR as JSON.
    Compile {
        grammar_file: PathBuf,
        source_file: PathBuf,
        #[arg(long, default_value = "out.ir.json")]
        out: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::BuildTables { grammar_file } => build_tables(&cli, grammar_file),
        Command::Parse { grammar_file, source_file } => parse(&cli, grammar_file, source_file),
        Command::Compile { grammar_file, source_file, out } => {
            compile(&cli, grammar_file, source_file, out)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("triac: {message}");
            ExitCode::FAILURE
        }
    }
}

fn read_grammar(path: &PathBuf) -> Result<Grammar, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    Grammar::load(&text).map_err(|e| e.to_string())
}

fn config(cli: &Cli) -> Config {
    Config::new().with_cache_dir(cli.cache_dir.clone()).with_force_rebuild(cli.force_rebuild)
}

fn build_tables(cli: &Cli, grammar_file: &PathBuf) -> Result<(), String> {
    let grammar = read_grammar(grammar_file)?;
    let cfg = config(cli);
    let path = cache::cache_path(&cfg.cache_dir, grammar_file);
    let tables = cache::load_or_build(&path, cfg.force_rebuild, &grammar).map_err(|e| e.to_string())?;
    println!(
        "built {} state(s), {} conflict(s), cached at {}",
        tables.states.len().max(tables.action.len()),
        tables.conflicts.len(),
        path.display()
    );
    Ok(())
}

fn parse(cli: &Cli, grammar_file: &PathBuf, source_file: &PathBuf) -> Result<(), String> {
    let grammar = read_grammar(grammar_file)?;
    let source = std::fs::read_to_string(source_file).map_err(|e| e.to_string())?;
    let tokens = tokenize(&source).map_err(|e| e.to_string())?;

    let cfg = config(cli);
    let path = cache::cache_path(&cfg.cache_dir, grammar_file);
    let tables = cache::load_or_build(&path, cfg.force_rebuild, &grammar).map_err(|e| e.to_string())?;

    let tree = triac_core::parse::parse(&tokens, &tables, &grammar).map_err(|e| e.to_string())?;
    for node in &tree {
        println!("{}", node.category());
    }
    Ok(())
}

fn compile(cli: &Cli, grammar_file: &PathBuf, source_file: &PathBuf, out: &PathBuf) -> Result<(), String> {
    let grammar = read_grammar(grammar_file)?;
    let source = std::fs::read_to_string(source_file).map_err(|e| e.to_string())?;
    let tokens = tokenize(&source).map_err(|e| e.to_string())?;
    let cfg = config(cli);

    let program = triac_core::compile(&grammar, &tokens, &cfg, grammar_file).map_err(|e| e.to_string())?;
    let json = program.to_json();
    std::fs::write(out, json.to_string()).map_err(|e| format!("writing {}: {e}", out.display()))?;
    println!("wrote {} function(s) to {}", program.functions.len(), out.display());
    Ok(())
}
