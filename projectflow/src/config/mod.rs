//! Configuration for the `ProjectFlow` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/projectflow/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    ui: UiFileConfig,
    gateway: GatewayFileConfig,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
    toast_timeout_ms: Option<u64>,
    recent_tasks_limit: Option<usize>,
}

/// `[gateway]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct GatewayFileConfig {
    latency_ms: Option<u64>,
    seed_file: Option<PathBuf>,
    seed_demo_tasks: Option<bool>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    // -- UI --
    /// Poll timeout for the TUI event loop.
    pub poll_timeout: Duration,
    /// How long a notification toast stays on screen.
    pub toast_timeout: Duration,
    /// Number of recent tasks listed on the dashboard.
    pub recent_tasks_limit: usize,

    // -- Gateway --
    /// Simulated latency of every gateway call.
    pub latency: Duration,
    /// JSON task list to seed the in-memory gateway from.
    pub seed_file: Option<PathBuf>,
    /// Seed sample tasks when no seed file is given.
    pub seed_demo_tasks: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(50),
            toast_timeout: Duration::from_millis(3000),
            recent_tasks_limit: 5,
            latency: Duration::ZERO,
            seed_file: None,
            seed_demo_tasks: true,
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an error.
    /// Otherwise the default path (`~/.config/projectflow/config.toml`) is
    /// tried and silently ignored if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file exists but cannot be read or
    /// parsed, or if an explicit `--config` path cannot be read.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve a `ClientConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            toast_timeout: file
                .ui
                .toast_timeout_ms
                .map_or(defaults.toast_timeout, Duration::from_millis),
            recent_tasks_limit: file
                .ui
                .recent_tasks_limit
                .unwrap_or(defaults.recent_tasks_limit),
            latency: cli
                .latency_ms
                .or(file.gateway.latency_ms)
                .map_or(defaults.latency, Duration::from_millis),
            seed_file: cli
                .seed_file
                .clone()
                .or_else(|| file.gateway.seed_file.clone()),
            seed_demo_tasks: file
                .gateway
                .seed_demo_tasks
                .unwrap_or(defaults.seed_demo_tasks),
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal task manager")]
pub struct CliArgs {
    /// Path to config file (default: `~/.config/projectflow/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON task list to start from instead of the sample tasks.
    #[arg(long, env = "PROJECTFLOW_SEED")]
    pub seed_file: Option<PathBuf>,

    /// Simulated gateway latency in milliseconds.
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "PROJECTFLOW_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/projectflow.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    let path = config_dir.join("projectflow").join("config.toml");

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
