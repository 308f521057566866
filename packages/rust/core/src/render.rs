//! External renderer collaborators.
//!
//! The core hands normalized HTML to a renderer and treats a page as
//! converted only once the render step's completion has been observed;
//! both implementations block until the output file exists (or the failure
//! is known). [`PandocRenderer`] shells out to pandoc the way the export
//! tooling expects; [`HtmdRenderer`] is the in-process fallback used when
//! the pandoc binary is not installed.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use spacedown_shared::{RendererConfig, Result, SpacedownError};

/// Renders normalized HTML into a text file at the given path.
pub trait Renderer {
    /// Render `html` to `out_path`. Blocking; returns once the outcome is known.
    fn render(&self, html: &str, out_path: &Path) -> Result<()>;

    /// Human-readable renderer name for logging.
    fn name(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Pandoc
// ---------------------------------------------------------------------------

/// Invokes the external pandoc binary, one process per page.
pub struct PandocRenderer {
    command: String,
    format: String,
    extra_args: Vec<String>,
}

impl PandocRenderer {
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            command: config.command.clone(),
            format: config.format.clone(),
            extra_args: config.extra_args.clone(),
        }
    }
}

impl Renderer for PandocRenderer {
    fn render(&self, html: &str, out_path: &Path) -> Result<()> {
        // The renderer input is staged next to the output file and removed
        // once the invocation finished, success or not.
        let temp_input = out_path.with_extension("md~");
        std::fs::write(&temp_input, html).map_err(|e| SpacedownError::io(&temp_input, e))?;

        let output = Command::new(&self.command)
            .arg("-f")
            .arg("html")
            .arg("-t")
            .arg(&self.format)
            .args(&self.extra_args)
            .arg("-o")
            .arg(out_path)
            .arg(&temp_input)
            .output();

        let result = match output {
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SpacedownError::RendererUnavailable(
                format!("'{}' was not found on PATH", self.command),
            )),
            Err(e) => Err(SpacedownError::Render(format!(
                "failed to run '{}': {e}",
                self.command
            ))),
            Ok(out) if !out.status.success() => Err(SpacedownError::Render(format!(
                "'{}' exited with {}: {}",
                self.command,
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            ))),
            Ok(_) => Ok(()),
        };

        let _ = std::fs::remove_file(&temp_input);
        result
    }

    fn name(&self) -> &'static str {
        "pandoc"
    }
}

// ---------------------------------------------------------------------------
// htmd fallback
// ---------------------------------------------------------------------------

/// In-process HTML→Markdown conversion via the `htmd` crate.
pub struct HtmdRenderer;

impl Renderer for HtmdRenderer {
    fn render(&self, html: &str, out_path: &Path) -> Result<()> {
        let converter = htmd::HtmlToMarkdown::builder()
            .skip_tags(vec!["script", "style", "head"])
            .build();

        let markdown = converter
            .convert(html)
            .map_err(|e| SpacedownError::Render(format!("htmd conversion failed: {e}")))?;

        std::fs::write(out_path, markdown).map_err(|e| SpacedownError::io(out_path, e))
    }

    fn name(&self) -> &'static str {
        "htmd"
    }
}
