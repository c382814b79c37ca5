use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

static INIT: OnceCell<()> = OnceCell::new();

const DEFAULT_LOG_FILE: &str = "recipe.logs.jsonl";

/// Logging settings read from the process environment.
///
/// - `RECIPE_OBSERVABILITY_ENABLED`: enable/disable flag (default enabled).
/// - `RECIPE_LOG_LEVEL`: level or filter directive; falls back to `RUST_LOG`, then `info`.
/// - `RECIPE_JSON_LOG_PATH`: when set, events go to that file as JSON lines
///   instead of the compact console format on stderr.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    pub disabled: bool,
    pub level: Option<String>,
    pub json_log_path: Option<PathBuf>,
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        let disabled = std::env::var("RECIPE_OBSERVABILITY_ENABLED")
            .ok()
            .and_then(|value| parse_bool_env(&value))
            .is_some_and(|enabled| !enabled);
        Self {
            disabled,
            level: non_empty_var("RECIPE_LOG_LEVEL"),
            json_log_path: non_empty_var("RECIPE_JSON_LOG_PATH").map(PathBuf::from),
        }
    }

    fn env_filter(&self) -> EnvFilter {
        if let Some(level) = &self.level
            && let Ok(filter) = EnvFilter::try_new(level)
        {
            return filter;
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_bool_env(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "enabled" => Some(true),
        "0" | "false" | "no" | "off" | "disabled" => Some(false),
        _ => None,
    }
}

/// Installs the global subscriber from [`ObservabilityConfig::from_env`].
/// Later calls are no-ops.
pub fn init_observability() {
    init_with(ObservabilityConfig::from_env());
}

pub fn init_with(config: ObservabilityConfig) {
    INIT.get_or_init(|| {
        if config.disabled {
            return;
        }
        let env_filter = config.env_filter();
        match &config.json_log_path {
            Some(path) => {
                let (dir, file_name) = split_log_path(path);
                let _ = std::fs::create_dir_all(&dir);
                let writer = tracing_appender::rolling::never(dir, file_name);
                let json_layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(false)
                    .with_writer(writer);
                let _ = tracing_subscriber::registry()
                    .with(env_filter)
                    .with(json_layer)
                    .try_init();
            }
            None => {
                // stdout carries command output in the CLI
                let console_layer = tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr);
                let _ = tracing_subscriber::registry()
                    .with(env_filter)
                    .with(console_layer)
                    .try_init();
            }
        }
    });
}

fn split_log_path(path: &Path) -> (PathBuf, String) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_LOG_FILE)
        .to_owned();
    (dir, file_name)
}
