//! Cache idempotence (§8): building tables, persisting them, and
//! reloading from disk must produce ACTION/GOTO tables indistinguishable
//! from a fresh build, and a `force_rebuild` request must ignore whatever is
//! on disk.

use triac_core::tables::{self, cache};
use triac_core::Grammar;

const GOLDEN: &str = "S -> C C\nC -> c C | d\n";

#[test]
fn reloaded_tables_match_a_fresh_build() {
    let grammar = Grammar::load(GOLDEN).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let grammar_file = dir.path().join("golden.grammar");
    std::fs::write(&grammar_file, GOLDEN).unwrap();

    let cache_dir = dir.path().join("tables");
    let path = cache::cache_path(&cache_dir, &grammar_file);

    let built = cache::load_or_build(&path, false, &grammar).unwrap();
    assert!(path.exists());

    let reloaded = cache::load_or_build(&path, false, &grammar).unwrap();
    assert_eq!(reloaded.action.len(), built.action.len());
    for (a, b) in built.action.iter().zip(&reloaded.action) {
        assert_eq!(a, b);
    }
    for (a, b) in built.goto.iter().zip(&reloaded.goto) {
        assert_eq!(a, b);
    }
}

#[test]
fn force_rebuild_ignores_a_stale_cache_file() {
    let grammar = Grammar::load(GOLDEN).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("golden.tables");

    std::fs::write(&path, "not json at all\nstill not json\n").unwrap();
    let built = cache::load_or_build(&path, true, &grammar).unwrap();
    assert_eq!(built.action.len(), tables::build(&grammar).action.len());
}

#[test]
fn cache_path_is_stable_across_calls() {
    let dir = tempfile::tempdir().unwrap();
    let grammar_file = dir.path().join("sub").join("golden.grammar");
    let a = cache::cache_path(dir.path(), &grammar_file);
    let b = cache::cache_path(dir.path(), &grammar_file);
    assert_eq!(a, b);
    assert_eq!(a.file_name().unwrap(), "golden.tables");
}
