mod check;
mod export;
mod render;
mod schema;

pub(crate) use check::CheckJsonOutput;
pub(crate) use render::RenderJsonOutput;

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use invoiceme_erd::catalog::{config::load_catalog, CatalogIssue};
use invoiceme_erd::graph::{ErdView, ViewFilter};
use std::io;
use std::path::{Path, PathBuf};

/// Run without a subcommand to render erd.png and erd.gv into the current directory.
#[derive(Parser)]
#[command(name = "invoiceme-erd")]
#[command(version)]
#[command(about = "Render the InvoiceMe database schema as an entity-relationship diagram", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub render: RenderArgs,

    /// Show diagnostic output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Options for the default render
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Output base name; writes <BASE>.gv and <BASE>.<FORMAT>
    #[arg(short, long, default_value = "erd")]
    pub output: PathBuf,

    /// Image format: png, svg, pdf, jpg
    #[arg(short, long, default_value = "png")]
    pub format: String,

    /// Graphviz program to run
    #[arg(long = "dot", value_name = "PROGRAM", default_value = "dot")]
    pub program: PathBuf,

    /// Write only the DOT source; do not run Graphviz
    #[arg(long)]
    pub no_render: bool,

    /// Output results as JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    #[command(flatten)]
    pub style: StyleArgs,
}

/// Which catalog to draw and which of its tables
#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// YAML catalog file (default: built-in InvoiceMe schema)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Only include these tables (comma-separated, glob patterns supported)
    #[arg(short, long)]
    pub tables: Option<String>,

    /// Exclude these tables (comma-separated, glob patterns supported)
    #[arg(short, long)]
    pub exclude: Option<String>,
}

/// Diagram styling
#[derive(Args, Debug, Clone)]
pub struct StyleArgs {
    /// Layout direction: tb (top-bottom) or lr (left-right)
    #[arg(long, default_value = "tb")]
    pub layout: String,

    /// Image resolution
    #[arg(long, default_value_t = 300)]
    pub dpi: u32,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export the diagram as DOT, Mermaid or JSON text (no Graphviz needed)
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: dot, mermaid, json (default: from extension, else dot)
        #[arg(short, long)]
        format: Option<String>,

        #[command(flatten)]
        catalog: CatalogArgs,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Validate a catalog (dangling references, missing FK columns, ...)
    Check {
        /// YAML catalog file (default: built-in InvoiceMe schema)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Treat warnings as errors (non-zero exit on any warning)
        #[arg(long)]
        strict: bool,

        /// Output results as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },

    /// Print JSON Schemas for the catalog file and JSON outputs
    Schema {
        /// Schema name: catalog, graph, render, check (default: all)
        name: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        None => render::run(cli.render),
        Some(Commands::Export {
            output,
            format,
            catalog,
            style,
        }) => export::run(output, format, catalog, style),
        Some(Commands::Check {
            catalog,
            strict,
            json,
        }) => check::run(catalog, strict, json),
        Some(Commands::Schema { name }) => schema::run(name),
        Some(Commands::Completions { shell }) => {
            generate(
                shell,
                &mut Cli::command(),
                "invoiceme-erd",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}

/// Load and validate a catalog, then build the filtered view.
///
/// Warnings are returned, errors abort before any output is produced.
fn load_view(
    catalog: Option<&Path>,
    filter: &ViewFilter,
) -> anyhow::Result<(ErdView, Vec<CatalogIssue>)> {
    let catalog = load_catalog(catalog)?;
    let warnings = catalog.ensure_valid()?;

    let mut view = ErdView::from_catalog(&catalog);
    filter.apply(&mut view);

    if view.is_empty() {
        anyhow::bail!("no tables left to draw after applying table filters");
    }

    Ok((view, warnings))
}

fn print_warnings(warnings: &[CatalogIssue]) {
    for warning in warnings {
        eprintln!("{}", warning);
    }
}
