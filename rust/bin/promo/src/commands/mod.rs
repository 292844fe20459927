//! Subcommand implementations.
//!
//! Every command prints either a plain table or pretty JSON (`-o json`).

pub mod promotion;
pub mod score;
pub mod user;

use serde::Serialize;

/// Print `value` as JSON, or run `table` for the human-readable form.
pub(crate) fn emit<T: Serialize>(json: bool, value: &T, table: impl FnOnce(&T)) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        table(value);
    }
    Ok(())
}

pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
