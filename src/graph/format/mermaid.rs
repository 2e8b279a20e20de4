//! Mermaid erDiagram format output.

use crate::catalog::ColumnDef;
use crate::graph::view::ErdView;

/// Placeholder attribute type; catalog annotations rarely carry one
const UNTYPED: &str = "column";

/// Generate Mermaid erDiagram from a graph view
pub fn to_mermaid(view: &ErdView) -> String {
    let mut output = String::new();

    if !view.title.is_empty() {
        output.push_str(&format!("---\ntitle: {}\n---\n", view.title));
    }
    output.push_str("erDiagram\n");

    for table in &view.tables {
        output.push_str(&format!("    {} {{\n", escape_mermaid_id(&table.name)));

        for col in &table.columns {
            output.push_str(&format!("        {}\n", format_attribute(col)));
        }

        output.push_str("    }\n");
    }

    if !view.edges.is_empty() {
        output.push('\n');
    }

    for edge in &view.edges {
        output.push_str(&format!(
            "    {} {} {} : \"{} ({})\"\n",
            escape_mermaid_id(&edge.parent),
            edge.cardinality.as_mermaid(),
            escape_mermaid_id(&edge.child),
            edge.column.replace('"', "'"),
            edge.on_delete
        ));
    }

    output
}

fn format_attribute(col: &ColumnDef) -> String {
    let col_type = col
        .type_hint
        .as_deref()
        .map(escape_mermaid_type)
        .unwrap_or_else(|| UNTYPED.to_string());

    let mut keys = Vec::new();
    if col.is_primary_key {
        keys.push("PK");
    }
    if col.is_foreign_key {
        keys.push("FK");
    }
    if col.is_unique {
        keys.push("UK");
    }

    let mut attr = format!("{} {}", col_type, escape_mermaid_id(&col.name));
    if !keys.is_empty() {
        attr.push(' ');
        attr.push_str(&keys.join(", "));
    }
    if col.is_nullable {
        attr.push_str(" \"nullable\"");
    }
    attr
}

/// Escape identifier for Mermaid (replace invalid chars with underscore)
fn escape_mermaid_id(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Mermaid attribute types may not contain spaces or parentheses
fn escape_mermaid_type(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '(' || c == ')' || c == ',' { '_' } else { c })
        .collect()
}
