//! Application configuration for spacedown.
//!
//! User config lives at `~/.spacedown/spacedown.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpacedownError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "spacedown.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".spacedown";

// ---------------------------------------------------------------------------
// Config structs (matching spacedown.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// External renderer settings.
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Output / reporting settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[renderer]` section — how the external HTML→Markdown renderer is invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Renderer binary to invoke.
    #[serde(default = "default_command")]
    pub command: String,

    /// Output format passed to the renderer (`-t` flag).
    #[serde(default = "default_format")]
    pub format: String,

    /// Extra arguments appended to every renderer invocation.
    #[serde(default = "default_extra_args")]
    pub extra_args: Vec<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            format: default_format(),
            extra_args: default_extra_args(),
        }
    }
}

fn default_command() -> String {
    "pandoc".into()
}
fn default_format() -> String {
    "markdown_github".into()
}
fn default_extra_args() -> Vec<String> {
    vec!["--wrap=none".into()]
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default verbosity: debug, info, warning, or error.
    #[serde(default = "default_verbosity")]
    pub verbosity: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            verbosity: default_verbosity(),
        }
    }
}

fn default_verbosity() -> String {
    "info".into()
}

// ---------------------------------------------------------------------------
// Verbosity
// ---------------------------------------------------------------------------

/// Validated logging verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Debug,
    Info,
    Warning,
    Error,
}

impl FromStr for Verbosity {
    type Err = SpacedownError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(SpacedownError::config(format!(
                "invalid verbosity level '{other}' (expected debug, info, warning, or error)"
            ))),
        }
    }
}

impl Verbosity {
    /// The `tracing` level filter directive for this verbosity.
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error => "error",
        }
    }
}

impl AppConfig {
    /// Validate the configured verbosity, failing before any page is touched.
    pub fn verbosity(&self) -> Result<Verbosity> {
        self.output.verbosity.parse()
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.spacedown/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SpacedownError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.spacedown/spacedown.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SpacedownError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SpacedownError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SpacedownError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SpacedownError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SpacedownError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
