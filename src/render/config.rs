//! Configuration types for rendering.

use crate::graph::{validate_dpi, DotOptions, ImageFormat, Layout, ViewFilter};
use crate::render::{OutputTarget, DEFAULT_PROGRAM};
use std::path::PathBuf;

/// Base name of the output files when none is given
pub const DEFAULT_OUTPUT: &str = "erd";

/// Runtime configuration for a render run
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// YAML catalog file (None = built-in catalog)
    pub catalog: Option<PathBuf>,
    /// Table include/exclude patterns
    pub filter: ViewFilter,
    /// DOT styling
    pub dot: DotOptions,
    /// Where `.gv` and the image go
    pub target: OutputTarget,
    /// Graphviz program to invoke
    pub program: PathBuf,
    /// Run Graphviz (false = write the DOT source only)
    pub render: bool,
}

impl RenderConfig {
    /// Create a new builder
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }
}

/// Builder for RenderConfig
#[derive(Debug, Default)]
pub struct RenderConfigBuilder {
    catalog: Option<PathBuf>,
    tables: Option<String>,
    exclude: Option<String>,
    layout: Option<Layout>,
    dpi: Option<u32>,
    output: Option<PathBuf>,
    format: Option<ImageFormat>,
    program: Option<PathBuf>,
    no_render: bool,
}

impl RenderConfigBuilder {
    pub fn catalog(mut self, path: Option<PathBuf>) -> Self {
        self.catalog = path;
        self
    }

    pub fn tables(mut self, tables: Option<String>) -> Self {
        self.tables = tables;
        self
    }

    pub fn exclude(mut self, exclude: Option<String>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    pub fn output(mut self, base: PathBuf) -> Self {
        self.output = Some(base);
        self
    }

    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn program(mut self, program: PathBuf) -> Self {
        self.program = Some(program);
        self
    }

    pub fn no_render(mut self, no_render: bool) -> Self {
        self.no_render = no_render;
        self
    }

    /// Build the RenderConfig
    pub fn build(self) -> anyhow::Result<RenderConfig> {
        let defaults = DotOptions::default();
        let dpi = validate_dpi(self.dpi.unwrap_or(defaults.dpi))?;

        let base = self.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
        if base.as_os_str().is_empty() || base.file_name().is_none() {
            anyhow::bail!("Output base name must name a file: {:?}", base);
        }

        let target = OutputTarget::new(base, self.format.unwrap_or_default());
        if !target.dir().is_dir() {
            anyhow::bail!("Output directory not found: {:?}", target.dir());
        }

        let filter = ViewFilter::from_lists(self.tables.as_deref(), self.exclude.as_deref())?;

        Ok(RenderConfig {
            catalog: self.catalog,
            filter,
            dot: DotOptions {
                layout: self.layout.unwrap_or(defaults.layout),
                dpi,
                ..defaults
            },
            target,
            program: self
                .program
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM)),
            render: !self.no_render,
        })
    }
}
