//! Check command: validate a catalog without drawing it.

use anyhow::{bail, Result};
use invoiceme_erd::catalog::config::load_catalog;
use invoiceme_erd::catalog::CatalogIssue;
use schemars::JsonSchema;
use serde::Serialize;
use std::path::PathBuf;

/// JSON output for the check command
#[derive(Serialize, JsonSchema)]
pub struct CheckJsonOutput {
    pub title: String,
    pub valid: bool,
    pub table_count: usize,
    pub column_count: usize,
    pub relationship_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub issues: Vec<CatalogIssue>,
}

pub fn run(catalog: Option<PathBuf>, strict: bool, json: bool) -> Result<()> {
    let catalog = load_catalog(catalog.as_deref())?;
    let issues = catalog.validate();

    let error_count = issues.iter().filter(|i| i.is_error()).count();
    let warning_count = issues.len() - error_count;
    let failed = error_count > 0 || (strict && warning_count > 0);

    if json {
        let output = CheckJsonOutput {
            title: catalog.title.clone(),
            valid: !failed,
            table_count: catalog.table_count(),
            column_count: catalog.column_count(),
            relationship_count: catalog.relationship_count(),
            error_count,
            warning_count,
            issues,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for issue in &issues {
            eprintln!("{}", issue);
        }
        eprintln!(
            "\n{}: {} tables, {} columns, {} relationships, {} error(s), {} warning(s)",
            catalog.title,
            catalog.table_count(),
            catalog.column_count(),
            catalog.relationship_count(),
            error_count,
            warning_count
        );
    }

    if failed {
        if error_count > 0 {
            bail!("catalog check failed with {} error(s)", error_count);
        }
        bail!("catalog check failed with {} warning(s) (--strict)", warning_count);
    }

    Ok(())
}
