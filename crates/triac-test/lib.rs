//! Integration tests for the full `triac` pipeline: grammar load, table
//! build, the shift-reduce driver, the symbol table, and the IR builder,
//! exercised together the way `triac-cli` drives them rather than unit by
//! unit (those live next to the code they test in `triac-core`).

#[cfg(test)]
mod tables_properties;

#[cfg(test)]
mod cache_roundtrip;

#[cfg(test)]
mod ir_scenarios;
