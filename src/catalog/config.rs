//! YAML catalog files.
//!
//! A catalog file has the same shape as the built-in catalog:
//!
//! ```yaml
//! title: Shop Schema
//! tables:
//!   - name: users
//!     columns: ["id (PK, UUID)", "email (UNIQUE)"]
//!   - name: orders
//!     columns: ["id (PK)", "user_id (FK)"]
//! relationships:
//!   - parent: users
//!     child: orders
//!     column: user_id
//!     cardinality: "1:N"
//!     on_delete: CASCADE
//! ```

use super::{Cardinality, Catalog, DeleteAction, Relationship, TableDef};
use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk representation of a catalog
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CatalogFile {
    /// Diagram title (defaults to "Database Schema")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub tables: Vec<TableEntry>,
    #[serde(default)]
    pub relationships: Vec<RelationshipEntry>,
}

/// A table with its column annotations
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableEntry {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
}

/// A foreign-key relationship
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RelationshipEntry {
    pub parent: String,
    pub child: String,
    /// FK column on the child table
    pub column: String,
    #[serde(default)]
    pub cardinality: Cardinality,
    pub on_delete: DeleteAction,
}

impl CatalogFile {
    /// Load a catalog from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("failed to parse catalog file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let file: Self = serde_yaml_ng::from_str(content)?;
        Ok(file)
    }

    /// Save the catalog to a YAML file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_yaml_ng::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn into_catalog(self) -> Catalog {
        let mut catalog =
            Catalog::new(self.title.unwrap_or_else(|| "Database Schema".to_string()));

        for table in self.tables {
            catalog.add_table(TableDef::new(table.name, &table.columns));
        }

        for rel in self.relationships {
            catalog.add_relationship(Relationship::new(
                rel.parent,
                rel.child,
                rel.column,
                rel.cardinality,
                rel.on_delete,
            ));
        }

        catalog
    }
}

impl From<&Catalog> for CatalogFile {
    fn from(catalog: &Catalog) -> Self {
        Self {
            title: Some(catalog.title.clone()),
            tables: catalog
                .tables()
                .iter()
                .map(|t| TableEntry {
                    name: t.name.clone(),
                    columns: t.columns.iter().map(|c| c.annotation.clone()).collect(),
                })
                .collect(),
            relationships: catalog
                .relationships()
                .iter()
                .map(|r| RelationshipEntry {
                    parent: r.parent.clone(),
                    child: r.child.clone(),
                    column: r.column.clone(),
                    cardinality: r.cardinality,
                    on_delete: r.on_delete,
                })
                .collect(),
        }
    }
}

/// Load the catalog from `path`, or the built-in InvoiceMe catalog when `None`
pub fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    let catalog = match path {
        Some(path) => CatalogFile::load(path)?.into_catalog(),
        None => super::builtin::invoiceme(),
    };

    tracing::debug!(
        title = %catalog.title,
        tables = catalog.table_count(),
        relationships = catalog.relationship_count(),
        "catalog loaded"
    );

    Ok(catalog)
}
