//! Graph view with table filtering for ERD generation.

use crate::catalog::{Cardinality, Catalog, ColumnDef, DeleteAction};
use ahash::AHashSet;
use glob::Pattern;

/// A table node: header plus one row per column, in catalog order
#[derive(Debug, Clone)]
pub struct TableNode {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

/// A directed edge from parent to child for one FK relationship
#[derive(Debug, Clone)]
pub struct EdgeInfo {
    pub parent: String,
    pub child: String,
    /// FK column on the child table
    pub column: String,
    pub cardinality: Cardinality,
    pub on_delete: DeleteAction,
}

impl EdgeInfo {
    /// Label lines: FK column, cardinality, delete action
    pub fn label_lines(&self) -> [&str; 3] {
        [
            self.column.as_str(),
            self.cardinality.as_str(),
            self.on_delete.as_str(),
        ]
    }
}

/// A filtered, ordered view of a catalog for ERD visualization
#[derive(Debug, Clone)]
pub struct ErdView {
    pub title: String,
    pub tables: Vec<TableNode>,
    pub edges: Vec<EdgeInfo>,
}

impl ErdView {
    /// Create a full view of the catalog (all tables and edges)
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let tables = catalog
            .tables()
            .iter()
            .map(|t| TableNode {
                name: t.name.clone(),
                columns: t.columns.clone(),
            })
            .collect();

        let edges = catalog
            .relationships()
            .iter()
            .map(|r| EdgeInfo {
                parent: r.parent.clone(),
                child: r.child.clone(),
                column: r.column.clone(),
                cardinality: r.cardinality,
                on_delete: r.on_delete,
            })
            .collect();

        Self {
            title: catalog.title.clone(),
            tables,
            edges,
        }
    }

    /// Filter to include only tables matching the given patterns
    pub fn filter_tables(&mut self, patterns: &[Pattern]) {
        if patterns.is_empty() {
            return;
        }

        let matching: AHashSet<String> = self
            .tables
            .iter()
            .map(|t| t.name.clone())
            .filter(|name| patterns.iter().any(|p| p.matches(name)))
            .collect();

        self.apply_node_filter(&matching);
    }

    /// Exclude tables matching the given patterns
    pub fn exclude_tables(&mut self, patterns: &[Pattern]) {
        if patterns.is_empty() {
            return;
        }

        let remaining: AHashSet<String> = self
            .tables
            .iter()
            .map(|t| t.name.clone())
            .filter(|name| !patterns.iter().any(|p| p.matches(name)))
            .collect();

        self.apply_node_filter(&remaining);
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn get_table(&self, name: &str) -> Option<&TableNode> {
        self.tables.iter().find(|t| t.name == name)
    }

    fn apply_node_filter(&mut self, keep: &AHashSet<String>) {
        self.tables.retain(|t| keep.contains(&t.name));
        self.edges
            .retain(|e| keep.contains(&e.parent) && keep.contains(&e.child));
    }
}

/// Include/exclude table patterns applied to a view
#[derive(Debug, Clone, Default)]
pub struct ViewFilter {
    pub tables: Vec<Pattern>,
    pub exclude: Vec<Pattern>,
}

impl ViewFilter {
    /// Build from comma-separated `--tables` / `--exclude` lists
    pub fn from_lists(tables: Option<&str>, exclude: Option<&str>) -> anyhow::Result<Self> {
        Ok(Self {
            tables: tables.map(parse_patterns).transpose()?.unwrap_or_default(),
            exclude: exclude.map(parse_patterns).transpose()?.unwrap_or_default(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.exclude.is_empty()
    }

    pub fn apply(&self, view: &mut ErdView) {
        view.filter_tables(&self.tables);
        view.exclude_tables(&self.exclude);
    }
}

/// Parse comma-separated glob patterns, rejecting invalid ones
pub fn parse_patterns(list: &str) -> anyhow::Result<Vec<Pattern>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Pattern::new(s).map_err(|e| anyhow::anyhow!("invalid table pattern '{}': {}", s, e))
        })
        .collect()
}
