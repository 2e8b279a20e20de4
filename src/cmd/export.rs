//! Export command: diagram as DOT, Mermaid or JSON text.

use super::{load_view, print_warnings, CatalogArgs, StyleArgs};
use anyhow::Result;
use invoiceme_erd::graph::{
    to_dot, to_json, to_mermaid, validate_dpi, DotOptions, ExportFormat, Layout, ViewFilter,
};
use std::fs;
use std::path::PathBuf;

pub fn run(
    output: Option<PathBuf>,
    format: Option<String>,
    catalog: CatalogArgs,
    style: StyleArgs,
) -> Result<()> {
    let format = if let Some(ref f) = format {
        f.parse::<ExportFormat>()
            .map_err(|e| anyhow::anyhow!("{}", e))?
    } else if let Some(ref out) = output {
        out.extension()
            .and_then(|e| e.to_str())
            .and_then(ExportFormat::from_extension)
            .unwrap_or_default()
    } else {
        ExportFormat::Dot
    };

    let layout = style
        .layout
        .parse::<Layout>()
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let dpi = validate_dpi(style.dpi)?;
    let filter = ViewFilter::from_lists(catalog.tables.as_deref(), catalog.exclude.as_deref())?;

    let (view, warnings) = load_view(catalog.catalog.as_deref(), &filter)?;
    print_warnings(&warnings);

    let content = match format {
        ExportFormat::Dot => to_dot(
            &view,
            &DotOptions {
                layout,
                dpi,
                ..Default::default()
            },
        ),
        ExportFormat::Mermaid => to_mermaid(&view),
        ExportFormat::Json => to_json(&view),
    };

    match output {
        Some(ref path) => {
            fs::write(path, content.as_bytes())?;
            eprintln!("ERD written to: {}", path.display());
        }
        None => print!("{}", content),
    }

    Ok(())
}
