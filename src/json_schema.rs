//! JSON Schema generation for the catalog file and CLI JSON output.
//!
//! Schemas are generated using the schemars crate and can be printed via the `schema` subcommand.

use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// Returns all JSON schemas.
/// Uses BTreeMap for deterministic ordering (important for diffable output).
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    // YAML catalog files
    schemas.insert(
        "catalog",
        schema_for!(invoiceme_erd::catalog::config::CatalogFile),
    );

    // check --json
    schemas.insert("check", schema_for!(crate::cmd::CheckJsonOutput));

    // export --format json
    schemas.insert(
        "graph",
        schema_for!(invoiceme_erd::graph::format::ErdJson),
    );

    // default render with --json
    schemas.insert("render", schema_for!(crate::cmd::RenderJsonOutput));

    schemas
}

/// Generate a single schema by name.
pub fn get_schema(name: &str) -> Option<Schema> {
    all_schemas().remove(name)
}

/// List all available schema names.
pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}
