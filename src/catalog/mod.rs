//! Schema and relationship catalogs for ERD generation.
//!
//! This module provides:
//! - Table and column descriptors, kept in declaration order
//! - Foreign-key relationships with cardinality and delete action
//! - Catalog validation (dangling references, missing FK columns, ...)
//! - The built-in InvoiceMe catalog and YAML catalog files

pub mod builtin;
pub mod config;

use ahash::{AHashMap, AHashSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A column annotation such as `customer_id (FK, nullable)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Annotation exactly as declared; this is what the diagram shows
    pub annotation: String,
    /// Column name (text before the marker list)
    pub name: String,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub is_unique: bool,
    pub is_nullable: bool,
    /// Any marker that is not a key/constraint flag, e.g. `UUID`
    pub type_hint: Option<String>,
}

impl ColumnDef {
    /// Parse an annotation. Never fails: text without a marker list is a bare name.
    pub fn parse(annotation: &str) -> Self {
        let annotation = annotation.trim();
        let (name, markers) = match annotation.find(" (") {
            Some(idx) if annotation.ends_with(')') => (
                annotation[..idx].trim(),
                &annotation[idx + 2..annotation.len() - 1],
            ),
            _ => (annotation, ""),
        };

        let mut column = ColumnDef {
            annotation: annotation.to_string(),
            name: name.to_string(),
            is_primary_key: false,
            is_foreign_key: false,
            is_unique: false,
            is_nullable: false,
            type_hint: None,
        };

        for marker in markers.split(',').map(str::trim).filter(|m| !m.is_empty()) {
            match marker.to_ascii_uppercase().as_str() {
                "PK" => column.is_primary_key = true,
                "FK" => column.is_foreign_key = true,
                "UNIQUE" => column.is_unique = true,
                "NULLABLE" | "NULL" => column.is_nullable = true,
                _ => column.type_hint = Some(marker.to_string()),
            }
        }

        column
    }
}

/// A table and its columns in declaration order
#[derive(Debug, Clone)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    pub fn new<S: AsRef<str>>(name: impl Into<String>, columns: &[S]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| ColumnDef::parse(c.as_ref())).collect(),
        }
    }

    /// Find a column by name (case-insensitive)
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Relationship cardinality, displayed in its short form (`1:N`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum Cardinality {
    #[default]
    #[serde(rename = "1:N")]
    OneToMany,
    #[serde(rename = "1:1")]
    OneToOne,
}

impl Cardinality {
    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::OneToMany => "1:N",
            Cardinality::OneToOne => "1:1",
        }
    }

    /// Mermaid ERD notation, parent on the left
    pub fn as_mermaid(self) -> &'static str {
        match self {
            Cardinality::OneToMany => "||--o{",
            Cardinality::OneToOne => "||--o|",
        }
    }
}

impl FromStr for Cardinality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1:N" | "ONE-TO-MANY" => Ok(Cardinality::OneToMany),
            "1:1" | "ONE-TO-ONE" => Ok(Cardinality::OneToOne),
            _ => Err(format!(
                "Unknown cardinality: {}. Valid options: 1:N, 1:1",
                s
            )),
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Referential action applied to child rows when the parent row is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DeleteAction {
    #[serde(rename = "RESTRICT")]
    Restrict,
    #[serde(rename = "CASCADE")]
    Cascade,
    #[serde(rename = "SET NULL")]
    SetNull,
}

impl DeleteAction {
    pub fn as_str(self) -> &'static str {
        match self {
            DeleteAction::Restrict => "RESTRICT",
            DeleteAction::Cascade => "CASCADE",
            DeleteAction::SetNull => "SET NULL",
        }
    }
}

impl FromStr for DeleteAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('_', " ").as_str() {
            "RESTRICT" => Ok(DeleteAction::Restrict),
            "CASCADE" => Ok(DeleteAction::Cascade),
            "SET NULL" => Ok(DeleteAction::SetNull),
            _ => Err(format!(
                "Unknown delete action: {}. Valid options: RESTRICT, CASCADE, SET NULL",
                s
            )),
        }
    }
}

impl fmt::Display for DeleteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A foreign-key relationship from a parent table to a child table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub parent: String,
    pub child: String,
    /// FK column on the child table
    pub column: String,
    pub cardinality: Cardinality,
    pub on_delete: DeleteAction,
}

impl Relationship {
    pub fn new(
        parent: impl Into<String>,
        child: impl Into<String>,
        column: impl Into<String>,
        cardinality: Cardinality,
        on_delete: DeleteAction,
    ) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
            column: column.into(),
            cardinality,
            on_delete,
        }
    }
}

/// Issue severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// A problem found while validating a catalog
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CatalogIssue {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl CatalogIssue {
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            table: None,
        }
    }

    pub fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            table: None,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.severity, self.code)?;
        if let Some(ref table) = self.table {
            write!(f, " table '{}'", table)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Schema catalog (tables) plus relationship catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Diagram title, written as the DOT comment
    pub title: String,
    tables: Vec<TableDef>,
    /// Table name exactly as declared -> index into `tables`
    index: AHashMap<String, usize>,
    /// Lowercased names, so `users` and `Users` count as one table
    folded: AHashSet<String>,
    relationships: Vec<Relationship>,
    duplicate_tables: Vec<String>,
}

impl Catalog {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Add a table. A repeated name is kept out of the catalog and reported by `validate`.
    pub fn add_table(&mut self, table: TableDef) {
        if !self.folded.insert(table.name.to_lowercase()) {
            self.duplicate_tables.push(table.name);
            return;
        }
        self.index.insert(table.name.clone(), self.tables.len());
        self.tables.push(table);
    }

    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Get a table by its exact declared name. Node IDs in the diagram are
    /// case-sensitive, so relationships must spell names the same way.
    pub fn get_table(&self, name: &str) -> Option<&TableDef> {
        self.index.get(name).map(|&idx| &self.tables[idx])
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Declared spelling of a table whose name differs from `name` only in case
    fn similar_table(&self, name: &str) -> Option<&str> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .map(|t| t.name.as_str())
    }

    fn unknown_table(
        &self,
        code: &'static str,
        role: &str,
        name: &str,
        rel: &Relationship,
    ) -> CatalogIssue {
        let mut message = format!(
            "relationship {} -> {} references unknown {} table '{}'",
            rel.parent, rel.child, role, name
        );
        if let Some(declared) = self.similar_table(name) {
            message.push_str(&format!(" (did you mean '{}'?)", declared));
        }
        CatalogIssue::error(code, message).with_table(name.to_string())
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    /// Check the catalog for structural problems
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        for name in &self.duplicate_tables {
            issues.push(
                CatalogIssue::error(
                    "DUPLICATE_TABLE",
                    format!("table '{}' is declared more than once", name),
                )
                .with_table(name.clone()),
            );
        }

        for table in &self.tables {
            if table.columns.is_empty() {
                issues.push(
                    CatalogIssue::warning("EMPTY_TABLE", "table has no columns")
                        .with_table(table.name.clone()),
                );
            }

            let mut seen = AHashSet::new();
            for col in &table.columns {
                if !seen.insert(col.name.to_lowercase()) {
                    issues.push(
                        CatalogIssue::error(
                            "DUPLICATE_COLUMN",
                            format!("column '{}' is declared more than once", col.name),
                        )
                        .with_table(table.name.clone()),
                    );
                }
            }
        }

        for rel in &self.relationships {
            if !self.contains_table(&rel.parent) {
                issues.push(self.unknown_table("DANGLING_PARENT", "parent", &rel.parent, rel));
            }

            let Some(child) = self.get_table(&rel.child) else {
                issues.push(self.unknown_table("DANGLING_CHILD", "child", &rel.child, rel));
                continue;
            };

            match child.get_column(&rel.column) {
                None => issues.push(
                    CatalogIssue::error(
                        "MISSING_FK_COLUMN",
                        format!(
                            "FK column '{}' (from {}) does not exist",
                            rel.column, rel.parent
                        ),
                    )
                    .with_table(child.name.clone()),
                ),
                Some(col) => {
                    if !col.is_foreign_key {
                        issues.push(
                            CatalogIssue::warning(
                                "FK_NOT_MARKED",
                                format!("column '{}' is used as FK but not marked FK", col.name),
                            )
                            .with_table(child.name.clone()),
                        );
                    }
                    if rel.on_delete == DeleteAction::SetNull && !col.is_nullable {
                        issues.push(
                            CatalogIssue::warning(
                                "SET_NULL_NOT_NULLABLE",
                                format!(
                                    "ON DELETE SET NULL on column '{}' which is not marked nullable",
                                    col.name
                                ),
                            )
                            .with_table(child.name.clone()),
                        );
                    }
                }
            }
        }

        issues
    }

    /// Fail on the first error-level issue; returns the warnings otherwise
    pub fn ensure_valid(&self) -> anyhow::Result<Vec<CatalogIssue>> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(|i| i.is_error());

        if let Some(first) = errors.first() {
            if errors.len() == 1 {
                anyhow::bail!("invalid catalog: {}", first);
            }
            anyhow::bail!(
                "invalid catalog: {} (and {} more error(s))",
                first,
                errors.len() - 1
            );
        }

        Ok(warnings)
    }
}
