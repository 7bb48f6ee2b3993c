//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use pipedoc_core::{Compiler, resolved_sections};
use pipedoc_markdown::extract_fragments;
use pipedoc_shared::{AppConfig, CompileOptions, init_config, load_config};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// pipedoc: markdown pipeline documents in, config trees out.
#[derive(Parser)]
#[command(
    name = "pipedoc",
    version,
    about = "Compile markdown pipeline documents into hierarchical JSON configuration.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

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
    /// Compile a markdown document or notebook to JSON.
    Compile {
        /// Input document (.md, or a notebook by extension).
        path: PathBuf,

        /// Do not append the auto-logs section.
        #[arg(long)]
        no_auto_logs: bool,

        /// Print single-line JSON regardless of config.
        #[arg(long)]
        compact: bool,

        /// Fail on the first rejected metadata payload instead of emitting a partial tree.
        #[arg(long)]
        strict: bool,

        /// Write the JSON here instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List the sections of a document with their resolved parents.
    Sections {
        /// Input document.
        path: PathBuf,
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

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout stays JSON.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pipedoc=info",
        1 => "pipedoc=debug",
        _ => "pipedoc=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Compile {
            path,
            no_auto_logs,
            compact,
            strict,
            out,
        } => cmd_compile(&path, no_auto_logs, compact, strict, out.as_deref()),
        Command::Sections { path } => cmd_sections(&path),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

/// Compile options from the user config, with CLI flags applied on top.
fn compile_options(config: &AppConfig, no_auto_logs: bool) -> CompileOptions {
    let mut options = CompileOptions::from(config);
    if no_auto_logs {
        options.auto_logs_disabled = true;
    }
    options
}

fn cmd_compile(
    path: &Path,
    no_auto_logs: bool,
    compact: bool,
    strict: bool,
    out: Option<&Path>,
) -> Result<()> {
    let config = load_config()?;
    let options = compile_options(&config, no_auto_logs);
    let pretty = config.output.pretty && !compact;

    info!(path = %path.display(), strict, "compiling document");

    // Issues are already logged as warnings by the compiler.
    let compilation = Compiler::new(options).compile_file(path)?;
    let json = if strict {
        compilation.into_strict()?.to_json(pretty)?
    } else {
        compilation.to_json(pretty)?
    };

    match out {
        Some(target) => {
            std::fs::write(target, format!("{json}\n"))
                .wrap_err_with(|| format!("failed to write {}", target.display()))?;
            info!(out = %target.display(), "config written");
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn cmd_sections(path: &Path) -> Result<()> {
    let config = load_config()?;
    let document = Compiler::new(compile_options(&config, false)).load_document(path)?;
    let sections = resolved_sections(&document);

    if sections.is_empty() {
        println!("No sections found.");
        return Ok(());
    }

    println!(
        "{:<5} {:<6} {:<7} {:<10} TITLE",
        "ROW", "DEPTH", "PARENT", "FRAGMENTS"
    );
    for section in &sections {
        let parent = match section.parent_row {
            Some(row) => row.to_string(),
            None if section.depth == 1 => "-".to_string(),
            None => "orphan".to_string(),
        };
        let fragments = extract_fragments(&section.lead).len();
        let indent = "  ".repeat(usize::from(section.depth.saturating_sub(1)));
        println!(
            "{:<5} {:<6} {:<7} {:<10} {indent}{}",
            section.row, section.depth, parent, fragments, section.title
        );
    }

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
