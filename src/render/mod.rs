//! Graphviz rendering.
//!
//! The `dot` program is checked once up front (`dot -V`) so a missing install is
//! reported before anything is written. Outputs are staged as temporary files in
//! the target directory and moved into place only after Graphviz succeeds.

pub mod config;

pub use config::{RenderConfig, RenderConfigBuilder};

use crate::graph::ImageFormat;
use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::{Builder, NamedTempFile};

/// Default Graphviz layout program
pub const DEFAULT_PROGRAM: &str = "dot";

/// Graphviz could not be started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphvizMissing {
    pub program: String,
}

impl fmt::Display for GraphvizMissing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Graphviz not installed: '{}' was not found.",
            self.program
        )?;
        writeln!(f, "Install the Graphviz system package:")?;
        writeln!(f, "  macOS: brew install graphviz")?;
        write!(f, "  Ubuntu: sudo apt-get install graphviz")
    }
}

impl std::error::Error for GraphvizMissing {}

/// A Graphviz installation that answered `-V`
#[derive(Debug, Clone)]
pub struct Graphviz {
    program: PathBuf,
    version: String,
}

impl Graphviz {
    /// Run `program -V`; fails with [`GraphvizMissing`] if it cannot be started
    pub fn detect(program: impl Into<PathBuf>) -> Result<Self> {
        let program = program.into();

        let output = match Command::new(&program)
            .arg("-V")
            .stdin(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(GraphvizMissing {
                    program: program.display().to_string(),
                }
                .into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to run {}", program.display()))
            }
        };

        if !output.status.success() {
            bail!(
                "{} -V failed with status: {}",
                program.display(),
                output.status
            );
        }

        // dot prints its version banner on stderr
        let banner = if output.stderr.is_empty() {
            &output.stdout
        } else {
            &output.stderr
        };
        let version = String::from_utf8_lossy(banner).trim().to_string();

        tracing::info!(program = %program.display(), %version, "graphviz detected");

        Ok(Self { program, version })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Render a DOT source file to `output`. Blocks until Graphviz exits.
    pub fn render(&self, source: &Path, format: ImageFormat, output: &Path) -> Result<()> {
        tracing::debug!(
            source = %source.display(),
            output = %output.display(),
            %format,
            "running graphviz"
        );

        let result = Command::new(&self.program)
            .arg(format!("-T{}", format.extension()))
            .arg("-o")
            .arg(output)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to run {}", self.program.display()))?;

        if !result.status.success() {
            bail!(
                "Graphviz {} command failed with status {}: {}",
                self.program.display(),
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            );
        }

        Ok(())
    }
}

/// Fixed output locations: `<base>.gv` and `<base>.<format>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    base: PathBuf,
    format: ImageFormat,
}

impl OutputTarget {
    pub fn new(base: impl Into<PathBuf>, format: ImageFormat) -> Self {
        Self {
            base: base.into(),
            format,
        }
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn image_path(&self) -> PathBuf {
        with_suffix(&self.base, self.format.extension())
    }

    pub fn source_path(&self) -> PathBuf {
        with_suffix(&self.base, "gv")
    }

    /// Directory the outputs land in
    pub fn dir(&self) -> &Path {
        match self.base.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

/// Append `.ext` without replacing an existing extension (`v1.erd` -> `v1.erd.png`)
fn with_suffix(base: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Files written by [`write_outputs`]
#[derive(Debug, Clone)]
pub struct RenderedFiles {
    /// `None` when rendering was skipped
    pub image: Option<PathBuf>,
    pub source: PathBuf,
}

/// Write the DOT source and, with a Graphviz handle, the rendered image.
///
/// Existing files at the target paths are replaced. If rendering fails nothing is
/// left behind.
pub fn write_outputs(
    dot_source: &str,
    target: &OutputTarget,
    graphviz: Option<&Graphviz>,
) -> Result<RenderedFiles> {
    let dir = target.dir();

    let mut source_tmp = stage_file(dir, "gv")?;
    source_tmp.write_all(dot_source.as_bytes())?;
    source_tmp.flush()?;

    let image = match graphviz {
        Some(graphviz) => {
            let image_tmp = stage_file(dir, target.format().extension())?;
            graphviz.render(source_tmp.path(), target.format(), image_tmp.path())?;

            let path = target.image_path();
            persist(image_tmp, &path)?;
            Some(path)
        }
        None => None,
    };

    let source = target.source_path();
    if let Err(e) = persist(source_tmp, &source) {
        // An image without its source is a partial result
        if let Some(ref path) = image {
            if let Err(remove_err) = std::fs::remove_file(path) {
                tracing::warn!(path = %path.display(), error = %remove_err, "failed to remove image");
            }
        }
        return Err(e);
    }

    Ok(RenderedFiles { image, source })
}

fn stage_file(dir: &Path, ext: &str) -> Result<NamedTempFile> {
    Builder::new()
        .prefix(".erd-")
        .suffix(&format!(".{}", ext))
        .tempfile_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))
}

fn persist(file: NamedTempFile, path: &Path) -> Result<()> {
    file.persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    // Staged files are created owner-only; outputs are ordinary documents
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))?;
    }

    Ok(())
}
