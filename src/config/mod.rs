mod defaults;
mod validation;

use crate::cli::Args;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use defaults::{default_history_dir, default_log_filter, default_persist, is_truthy};
pub use validation::expand_env_var_in_string;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HistoryConfig {
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default)]
    pub persist: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
    /// `tracing_subscriber::EnvFilter` directive, e.g. `chatsync=debug`
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub history_dir: PathBuf,
    pub persist: bool,
    pub verbose: bool,
    pub log_filter: String,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load()?;
        let env_lookup = |name: &str| env::var(name).ok();
        Ok(Self::from_sources(args, &file_config, &env_lookup))
    }

    /// Resolve every setting with precedence CLI > env > file > default.
    pub fn from_sources(
        args: &Args,
        file_config: &FileConfig,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Self {
        let history_dir = args
            .history_dir
            .clone()
            .or_else(|| env("CHATSYNC_HISTORY_DIR"))
            .or(file_config.history.dir.clone())
            .map(|dir| expand_env_var_in_string(&dir, env))
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_history_dir);

        let persist = args.persist
            || env("CHATSYNC_PERSIST")
                .map(|v| is_truthy(&v))
                .or(file_config.history.persist)
                .unwrap_or_else(default_persist);

        let verbose = args.verbose
            || env("CHATSYNC_VERBOSE")
                .map(|v| is_truthy(&v))
                .or(file_config.logging.verbose)
                .unwrap_or(false);

        let log_filter = env("RUST_LOG")
            .or(file_config.logging.filter.clone())
            .unwrap_or_else(|| default_log_filter(verbose));

        Config {
            history_dir,
            persist,
            verbose,
            log_filter,
        }
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        // No config file found, return default
        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config = if is_yaml {
            serde_yaml::from_str(&contents).with_context(|| {
                format!("Failed to parse YAML config file: {}", path.display())
            })?
        } else {
            serde_json::from_str(&contents).with_context(|| {
                format!("Failed to parse JSON config file: {}", path.display())
            })?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            // 1. Current directory (local override)
            PathBuf::from(".chatsync.yaml"),
            PathBuf::from(".chatsync.yml"),
            PathBuf::from(".chatsync.json"),
        ];

        // 2. User's config directory
        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("chatsync");
            paths.push(config_dir.join("chatsync.yaml"));
            paths.push(config_dir.join("chatsync.yml"));
            paths.push(config_dir.join("chatsync.json"));
        }

        paths
    }
}
