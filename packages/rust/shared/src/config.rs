//! Application configuration for pipedoc.
//!
//! User config lives at `~/.pipedoc/pipedoc.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipedocError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pipedoc.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pipedoc";

// ---------------------------------------------------------------------------
// Config structs (matching pipedoc.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Compile behaviour.
    #[serde(default)]
    pub compile: CompileConfig,

    /// Output rendering.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[compile]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Append the canned logging section when a document lacks one.
    #[serde(default = "default_true")]
    pub auto_logs: bool,

    /// File extension routed through the notebook importer.
    #[serde(default = "default_notebook_extension")]
    pub notebook_extension: String,

    /// Fence tag given to notebook code cells.
    #[serde(default = "default_notebook_code_language")]
    pub notebook_code_language: String,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            auto_logs: true,
            notebook_extension: default_notebook_extension(),
            notebook_code_language: default_notebook_code_language(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_notebook_extension() -> String {
    "ipynb".into()
}
fn default_notebook_code_language() -> String {
    "python".into()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Two-space-indented JSON instead of a single line.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

// ---------------------------------------------------------------------------
// Compile options (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime compile options, merged from config file and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Skip the auto-logs injector.
    pub auto_logs_disabled: bool,
    /// Extension (without the dot) that marks a notebook input.
    pub notebook_extension: String,
    /// Fence tag given to notebook code cells.
    pub notebook_code_language: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for CompileOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            auto_logs_disabled: !config.compile.auto_logs,
            notebook_extension: config.compile.notebook_extension.clone(),
            notebook_code_language: config.compile.notebook_code_language.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pipedoc/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PipedocError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pipedoc/pipedoc.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| PipedocError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| PipedocError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PipedocError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PipedocError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PipedocError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("auto_logs = true"));
        assert!(toml_str.contains("notebook_extension"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert!(parsed.compile.auto_logs);
        assert_eq!(parsed.compile.notebook_code_language, "python");
        assert!(parsed.output.pretty);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[compile]
auto_logs = false
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert!(!config.compile.auto_logs);
        assert_eq!(config.compile.notebook_extension, "ipynb");
        assert!(config.output.pretty);
    }

    #[test]
    fn compile_options_from_app_config() {
        let mut app = AppConfig::default();
        app.compile.auto_logs = false;
        app.compile.notebook_code_language = "sql".into();

        let opts = CompileOptions::from(&app);
        assert!(opts.auto_logs_disabled);
        assert_eq!(opts.notebook_extension, "ipynb");
        assert_eq!(opts.notebook_code_language, "sql");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config_from(Path::new("/definitely/not/here/pipedoc.toml")).unwrap_err();
        assert!(matches!(err, PipedocError::Io { .. }));
    }
}
