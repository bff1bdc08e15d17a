use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::error;

const DEFAULT_LOG: &str = "info";
const DEFAULT_LOG_FORMAT: &str = "pretty";
const TASKS_FILE_NAME: &str = "tasks.json";
const LOG_FILE_NAME: &str = "taskdeck.log";

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// Path of the task snapshot file (default: `{data_dir}/tasks.json`).
    tasks_file: Option<PathBuf>,
    /// Log level filter string, e.g. "debug", "info,taskdeck=trace" (default: "info").
    log: Option<String>,
    /// Log file path (default: `{data_dir}/taskdeck.log`).
    log_file: Option<PathBuf>,
    /// Log output format: "pretty" (default) | "json".
    log_format: Option<String>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── Config ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Backing snapshot for the task list.
    pub tasks_file: PathBuf,
    /// Log level filter string.
    pub log: String,
    /// Log destination. The TUI owns stdout, so logs always go to a file.
    pub log_file: PathBuf,
    /// Log output format: "pretty" | "json".
    pub log_format: String,
}

impl Config {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        data_dir: Option<PathBuf>,
        tasks_file: Option<PathBuf>,
        log: Option<String>,
        log_file: Option<PathBuf>,
        log_format: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        let tasks_file = tasks_file
            .or(toml.tasks_file)
            .unwrap_or_else(|| data_dir.join(TASKS_FILE_NAME));
        let log = log.or(toml.log).unwrap_or_else(|| DEFAULT_LOG.to_string());
        let log_file = log_file
            .or(toml.log_file)
            .unwrap_or_else(|| data_dir.join(LOG_FILE_NAME));
        let log_format = log_format
            .or(toml.log_format)
            .unwrap_or_else(|| DEFAULT_LOG_FORMAT.to_string());

        Self {
            data_dir,
            tasks_file,
            log,
            log_file,
            log_format,
        }
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/taskdeck
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("taskdeck");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/taskdeck or ~/.local/share/taskdeck
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("taskdeck");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("taskdeck");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\taskdeck
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("taskdeck");
        }
    }
    // Fallback
    PathBuf::from(".taskdeck")
}
