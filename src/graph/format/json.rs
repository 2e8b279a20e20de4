//! JSON format output for ERD data.

use crate::graph::view::ErdView;
use schemars::JsonSchema;
use serde::Serialize;

/// JSON representation of the ERD
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErdJson {
    pub title: String,
    pub tables: Vec<TableJson>,
    pub relationships: Vec<RelationshipJson>,
    pub stats: ErdStats,
}

/// JSON representation of a table, columns in catalog order
#[derive(Debug, Serialize, JsonSchema)]
pub struct TableJson {
    pub name: String,
    pub columns: Vec<ColumnJson>,
}

/// JSON representation of a column
#[derive(Debug, Serialize, JsonSchema)]
pub struct ColumnJson {
    pub name: String,
    /// Annotation as shown in the diagram
    pub label: String,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub is_unique: bool,
    pub is_nullable: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
}

/// JSON representation of a relationship
#[derive(Debug, Serialize, JsonSchema)]
pub struct RelationshipJson {
    pub parent: String,
    pub child: String,
    pub column: String,
    pub cardinality: String,
    pub on_delete: String,
}

/// ERD statistics
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErdStats {
    pub table_count: usize,
    pub column_count: usize,
    pub relationship_count: usize,
}

impl ErdStats {
    pub fn from_view(view: &ErdView) -> Self {
        Self {
            table_count: view.table_count(),
            column_count: view.column_count(),
            relationship_count: view.edge_count(),
        }
    }
}

/// Generate JSON output from a graph view
pub fn to_json(view: &ErdView) -> String {
    let erd = build_erd_json(view);
    serde_json::to_string_pretty(&erd).unwrap_or_else(|_| "{}".to_string())
}

/// Build the JSON structure
pub fn build_erd_json(view: &ErdView) -> ErdJson {
    let tables = view
        .tables
        .iter()
        .map(|table| TableJson {
            name: table.name.clone(),
            columns: table
                .columns
                .iter()
                .map(|col| ColumnJson {
                    name: col.name.clone(),
                    label: col.annotation.clone(),
                    is_primary_key: col.is_primary_key,
                    is_foreign_key: col.is_foreign_key,
                    is_unique: col.is_unique,
                    is_nullable: col.is_nullable,
                    type_hint: col.type_hint.clone(),
                })
                .collect(),
        })
        .collect();

    let relationships = view
        .edges
        .iter()
        .map(|edge| RelationshipJson {
            parent: edge.parent.clone(),
            child: edge.child.clone(),
            column: edge.column.clone(),
            cardinality: edge.cardinality.to_string(),
            on_delete: edge.on_delete.to_string(),
        })
        .collect();

    ErdJson {
        title: view.title.clone(),
        tables,
        relationships,
        stats: ErdStats::from_view(view),
    }
}
