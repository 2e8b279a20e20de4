//! Default command: draw the catalog with Graphviz.

use super::{load_view, print_warnings, RenderArgs};
use anyhow::Result;
use invoiceme_erd::catalog::CatalogIssue;
use invoiceme_erd::graph::format::ErdStats;
use invoiceme_erd::graph::{to_dot, ImageFormat, Layout};
use invoiceme_erd::render::{write_outputs, Graphviz, RenderConfig};
use schemars::JsonSchema;
use serde::Serialize;

/// JSON output for the render command
#[derive(Serialize, JsonSchema)]
pub struct RenderJsonOutput {
    /// Rendered image, absent with --no-render
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// DOT source file
    pub source: String,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphviz_version: Option<String>,
    pub stats: ErdStats,
    pub warnings: Vec<CatalogIssue>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let format = args
        .format
        .parse::<ImageFormat>()
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let layout = args
        .style
        .layout
        .parse::<Layout>()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let config = RenderConfig::builder()
        .catalog(args.catalog.catalog)
        .tables(args.catalog.tables)
        .exclude(args.catalog.exclude)
        .layout(layout)
        .dpi(args.style.dpi)
        .output(args.output)
        .format(format)
        .program(args.program)
        .no_render(args.no_render)
        .build()?;

    // Capability check comes first: nothing is written without a working Graphviz
    let graphviz = if config.render {
        Some(Graphviz::detect(&config.program)?)
    } else {
        None
    };

    let (view, warnings) = load_view(config.catalog.as_deref(), &config.filter)?;
    if !args.json {
        print_warnings(&warnings);
    }

    let dot_source = to_dot(&view, &config.dot);
    let files = write_outputs(&dot_source, &config.target, graphviz.as_ref())?;

    if args.json {
        let output = RenderJsonOutput {
            image: files.image.as_ref().map(|p| p.display().to_string()),
            source: files.source.display().to_string(),
            format: config.target.format().to_string(),
            graphviz_version: graphviz.as_ref().map(|g| g.version().to_string()),
            stats: ErdStats::from_view(&view),
            warnings,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let Some(ref image) = files.image {
        println!("ERD diagram generated: {}", image.display());
    }
    println!("ERD source file: {}", files.source.display());

    eprintln!(
        "\nERD: {} tables, {} columns, {} relationships",
        view.table_count(),
        view.column_count(),
        view.edge_count()
    );

    Ok(())
}
