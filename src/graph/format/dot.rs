//! Graphviz DOT format output for ERD diagrams.

use crate::graph::format::Layout;
use crate::graph::view::{ErdView, TableNode};

/// Highest accepted `dpi` graph attribute
pub const MAX_DPI: u32 = 2400;

/// DOT keywords; an unquoted node ID spelled like one (in any case) is a statement
const DOT_KEYWORDS: &[&str] = &["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// Check a DPI value before it reaches the graph attributes
pub fn validate_dpi(dpi: u32) -> anyhow::Result<u32> {
    if dpi == 0 || dpi > MAX_DPI {
        anyhow::bail!("DPI must be between 1 and {}, got {}", MAX_DPI, dpi);
    }
    Ok(dpi)
}

/// Graph-level styling for DOT output
#[derive(Debug, Clone)]
pub struct DotOptions {
    pub layout: Layout,
    pub dpi: u32,
    /// Maximum drawing size in inches, `"width,height"`
    pub size: String,
    pub fill_color: String,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            layout: Layout::TB,
            dpi: 300,
            size: "12,16".to_string(),
            fill_color: "lightblue".to_string(),
        }
    }
}

/// Generate DOT source: one HTML-label node per table, one crow's-foot edge per FK
pub fn to_dot(view: &ErdView, options: &DotOptions) -> String {
    let mut output = String::new();

    // Header
    if !view.title.is_empty() {
        output.push_str(&format!("// {}\n", view.title.replace('\n', " ")));
    }
    output.push_str("digraph {\n");

    let rankdir = match options.layout {
        Layout::LR => "LR",
        Layout::TB => "TB",
    };
    output.push_str(&format!(
        "\tgraph [dpi={} rankdir={} size=\"{}\"]\n",
        options.dpi,
        rankdir,
        escape_dot_string(&options.size)
    ));
    output.push_str(&format!(
        "\tnode [fillcolor={} shape=box style=\"rounded,filled\"]\n",
        escape_dot_id(&options.fill_color)
    ));

    for table in &view.tables {
        output.push_str(&format!(
            "\t{} [label=<{}> shape=plaintext]\n",
            escape_dot_id(&table.name),
            generate_table_label(table, &options.fill_color)
        ));
    }

    for edge in &view.edges {
        let label = edge
            .label_lines()
            .iter()
            .map(|line| escape_dot_string(line))
            .collect::<Vec<_>>()
            .join("\\n");

        output.push_str(&format!(
            "\t{} -> {} [label=\"{}\" arrowhead=crow]\n",
            escape_dot_id(&edge.parent),
            escape_dot_id(&edge.child),
            label
        ));
    }

    output.push_str("}\n");
    output
}

/// Generate HTML-like table label for DOT
fn generate_table_label(table: &TableNode, header_color: &str) -> String {
    let mut html = String::new();

    html.push_str("<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\">");
    html.push_str(&format!(
        "<TR><TD COLSPAN=\"2\" BGCOLOR=\"{}\"><B>{}</B></TD></TR>",
        escape_html(header_color),
        escape_html(&table.name)
    ));

    for col in &table.columns {
        html.push_str(&format!(
            "<TR><TD ALIGN=\"LEFT\">{}</TD></TR>",
            escape_html(&col.annotation)
        ));
    }

    html.push_str("</TABLE>");
    html
}

/// Escape a string for use in DOT HTML labels
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape text placed inside a double-quoted DOT string
fn escape_dot_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Escape a string for use as a DOT node ID
fn escape_dot_id(s: &str) -> String {
    let is_plain = !s.is_empty()
        && !s.starts_with(|c: char| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !DOT_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(s));

    if is_plain {
        s.to_string()
    } else {
        format!("\"{}\"", escape_dot_string(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Cardinality, Catalog, DeleteAction, Relationship, TableDef};

    fn create_test_view() -> ErdView {
        let mut catalog = Catalog::new("Shop Schema");
        catalog.add_table(TableDef::new("users", &["id (PK, UUID)", "email (UNIQUE)"]));
        catalog.add_table(TableDef::new("order items", &["id (PK)", "user_id (FK)"]));
        catalog.add_relationship(Relationship::new(
            "users",
            "order items",
            "user_id",
            Cardinality::OneToMany,
            DeleteAction::SetNull,
        ));
        ErdView::from_catalog(&catalog)
    }

    #[test]
    fn test_dot_header() {
        let output = to_dot(&create_test_view(), &DotOptions::default());

        assert!(output.starts_with("// Shop Schema\ndigraph {\n"));
        assert!(output.contains("\tgraph [dpi=300 rankdir=TB size=\"12,16\"]\n"));
        assert!(output.contains("node [fillcolor=lightblue shape=box style=\"rounded,filled\"]"));
        assert!(output.ends_with("}\n"));
    }

    #[test]
    fn test_dot_table_label() {
        let output = to_dot(&create_test_view(), &DotOptions::default());

        assert!(output.contains(
            "\tusers [label=<<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\">\
             <TR><TD COLSPAN=\"2\" BGCOLOR=\"lightblue\"><B>users</B></TD></TR>\
             <TR><TD ALIGN=\"LEFT\">id (PK, UUID)</TD></TR>\
             <TR><TD ALIGN=\"LEFT\">email (UNIQUE)</TD></TR>\
             </TABLE>> shape=plaintext]\n"
        ));
    }

    #[test]
    fn test_dot_edge_with_quoted_id() {
        let output = to_dot(&create_test_view(), &DotOptions::default());

        assert!(output.contains(
            "\tusers -> \"order items\" [label=\"user_id\\n1:N\\nSET NULL\" arrowhead=crow]\n"
        ));
    }

    #[test]
    fn test_dot_layout_and_dpi() {
        let options = DotOptions {
            layout: Layout::LR,
            dpi: 96,
            ..Default::default()
        };
        let output = to_dot(&create_test_view(), &options);
        assert!(output.contains("graph [dpi=96 rankdir=LR"));
    }

    #[test]
    fn test_escape_helpers() {
        assert_eq!(escape_html("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
        assert_eq!(escape_dot_id("line_items"), "line_items");
        assert_eq!(escape_dot_id("2fa"), "\"2fa\"");
        assert_eq!(escape_dot_id("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_keyword_ids_are_quoted() {
        let keywords = ["node", "edge", "graph", "digraph", "subgraph", "strict"];
        for keyword in keywords.into_iter().chain(["Node", "EDGE"]) {
            assert_eq!(escape_dot_id(keyword), format!("\"{}\"", keyword));
        }
        assert_eq!(escape_dot_id("nodes"), "nodes");

        let mut catalog = Catalog::new("Keywords");
        catalog.add_table(TableDef::new("node", &["id (PK)"]));
        catalog.add_table(TableDef::new("edge", &["id (PK)", "node_id (FK)"]));
        catalog.add_relationship(Relationship::new(
            "node",
            "edge",
            "node_id",
            Cardinality::OneToMany,
            DeleteAction::Cascade,
        ));
        let output = to_dot(&ErdView::from_catalog(&catalog), &DotOptions::default());

        assert!(output.contains("\t\"node\" [label=<"));
        assert!(output.contains("\t\"edge\" [label=<"));
        assert!(output.contains("\t\"node\" -> \"edge\" [label="));
        assert!(!output.contains("\tnode [label="));
    }

    #[test]
    fn test_validate_dpi() {
        assert_eq!(validate_dpi(300).unwrap(), 300);
        assert_eq!(validate_dpi(MAX_DPI).unwrap(), MAX_DPI);
        assert!(validate_dpi(0).is_err());
        assert!(validate_dpi(MAX_DPI + 1).is_err());
    }
}
