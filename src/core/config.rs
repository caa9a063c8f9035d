//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.ccmanager/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Tab;
use crate::api::mock::Latency;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ManagerConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub mock: MockConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub initial_tab: Option<Tab>,
    pub log_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub render_markdown: Option<bool>,
    pub command_search_debounce_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MockConfig {
    /// "realistic" or "none"
    pub latency: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ExportConfig {
    pub dir: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_COMMAND_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_LOG_FILE: &str = "ccmanager.log";

pub const ENV_RENDER_MARKDOWN: &str = "CCMANAGER_RENDER_MARKDOWN";
pub const ENV_EXPORT_DIR: &str = "CCMANAGER_EXPORT_DIR";
pub const ENV_LATENCY: &str = "CCMANAGER_LATENCY";
pub const ENV_LOG_FILE: &str = "CCMANAGER_LOG_FILE";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub initial_tab: Tab,
    pub render_markdown: bool,
    pub latency: Latency,
    pub export_dir: PathBuf,
    pub command_search_debounce: Duration,
    pub log_file: PathBuf,
}

/// Values from command-line flags. `None`/`false` means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub tab: Option<Tab>,
    pub no_latency: bool,
    pub plain: bool,
    pub export_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.ccmanager/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".ccmanager").join("config.toml"))
}

/// Load config from `~/.ccmanager/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ManagerConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ManagerConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ManagerConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ManagerConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ManagerConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ManagerConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# ccmanager configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# initial_tab = "sessions"           # overview, sessions, commands, todos, settings, files
# log_file = "ccmanager.log"         # Or set CCMANAGER_LOG_FILE, or --log-file

# [display]
# render_markdown = true             # Or CCMANAGER_RENDER_MARKDOWN, or --plain to disable
# command_search_debounce_ms = 300

# [mock]
# latency = "realistic"              # "realistic" or "none"; CCMANAGER_LATENCY, --no-latency

# [export]
# dir = "~/Downloads"                # Or CCMANAGER_EXPORT_DIR, or --export-dir
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ManagerConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env(
    config: &ManagerConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Initial tab: CLI → config → default
    let initial_tab = cli
        .tab
        .or(config.general.initial_tab)
        .unwrap_or_default();

    // Markdown: --plain → env → config → default (on)
    let render_markdown = if cli.plain {
        false
    } else {
        env(ENV_RENDER_MARKDOWN)
            .and_then(|v| parse_bool(&v))
            .or(config.display.render_markdown)
            .unwrap_or(true)
    };

    // Latency: --no-latency → env → config → default
    let latency = if cli.no_latency {
        Latency::None
    } else {
        env(ENV_LATENCY)
            .and_then(|v| Latency::from_name(&v))
            .or_else(|| config.mock.latency.as_deref().and_then(Latency::from_name))
            .unwrap_or_default()
    };

    // Export dir: CLI → env → config → Downloads → home → cwd
    let export_dir = cli
        .export_dir
        .clone()
        .or_else(|| env(ENV_EXPORT_DIR).map(|d| expand_home(&d)))
        .or_else(|| config.export.dir.as_deref().map(expand_home))
        .unwrap_or_else(default_export_dir);

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| env(ENV_LOG_FILE).map(PathBuf::from))
        .or_else(|| config.general.log_file.as_deref().map(expand_home))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    ResolvedConfig {
        initial_tab,
        render_markdown,
        latency,
        export_dir,
        command_search_debounce: Duration::from_millis(
            config
                .display
                .command_search_debounce_ms
                .unwrap_or(DEFAULT_COMMAND_SEARCH_DEBOUNCE_MS),
        ),
        log_file,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            warn!("Ignoring unrecognized boolean value: {:?}", other);
            None
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}
