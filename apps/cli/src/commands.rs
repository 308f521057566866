//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use spacedown_core::pipeline::{ConvertConfig, ConvertResult, ProgressReporter};
use spacedown_core::render::PandocRenderer;
use spacedown_shared::{
    AppConfig, Verbosity, config_file_path, init_config, load_config, load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// spacedown — turn a wiki HTML export into a Markdown tree.
#[derive(Parser)]
#[command(
    name = "spacedown",
    version,
    about = "Convert an exported wiki HTML tree into a hierarchy of Markdown files.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv); overrides the configured default.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to an alternate config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Convert an exported HTML tree into a Markdown tree.
    Convert {
        /// Directory with the exported HTML files (or one file).
        input: PathBuf,

        /// Directory where the Markdown files are generated.
        output: PathBuf,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing from the validated config verbosity and CLI flags.
fn init_tracing(cli: &Cli, verbosity: Verbosity) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => format!("spacedown={}", verbosity.as_filter()),
        1 => "spacedown=debug".to_string(),
        _ => "spacedown=trace".to_string(),
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    // Invalid verbosity halts here, before any page is touched.
    let verbosity = config.verbosity()?;
    init_tracing(&cli, verbosity);

    match &cli.command {
        Command::Convert { input, output } => run_convert(&config, input, output),
        Command::Config { action } => run_config(&config, action),
    }
}

fn run_convert(config: &AppConfig, input: &PathBuf, output: &PathBuf) -> Result<()> {
    if !input.exists() {
        return Err(eyre!("input path does not exist: {}", input.display()));
    }

    info!(source = %input.display(), "using source");
    info!(destination = %output.display(), "using destination");

    let convert_config = ConvertConfig {
        dir_in: input.clone(),
        dir_out: output.clone(),
    };
    let renderer = Box::new(PandocRenderer::new(&config.renderer));
    let progress = IndicatifProgress::new();

    let result = spacedown_core::convert(&convert_config, renderer, &progress)?;

    if result.pages_failed > 0 {
        println!(
            "Converted {} of {} pages ({} failed, see log)",
            result.pages_converted, result.pages_total, result.pages_failed
        );
    } else {
        println!(
            "Converted {} pages in {:.1}s",
            result.pages_converted,
            result.elapsed.as_secs_f64()
        );
    }
    Ok(())
}

fn run_config(config: &AppConfig, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = init_config()?;
            println!("Wrote {}", path.display());
        }
        ConfigAction::Show => {
            println!("# {}", config_file_path()?.display());
            println!("{}", toml::to_string_pretty(config)?);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Progress bar
// ---------------------------------------------------------------------------

/// Bridges the pipeline's progress callbacks to an indicatif spinner/bar.
struct IndicatifProgress {
    bar: ProgressBar,
}

impl IndicatifProgress {
    fn new() -> Self {
        let bar = ProgressBar::no_length();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg} [{pos}/{len}]")
                .expect("valid progress template"),
        );
        Self { bar }
    }
}

impl ProgressReporter for IndicatifProgress {
    fn phase(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn page_converted(&self, path: &str, current: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(current as u64);
        self.bar.set_message(path.to_string());
    }

    fn done(&self, _result: &ConvertResult) {
        self.bar.finish_and_clear();
    }
}
