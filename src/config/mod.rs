//! Shell configuration from the environment
//!
//! - TUSH_ERROR_FORMAT (`json` or text)
//! - TUSH_PROMPT (prompt suffix, default `> `)
//! - TUSH_HISTORY (history file, default `~/.tush_history`)
//! - TUSH_HISTORY_SIZE (entries kept, default 1000)
//! - TUSH_LOG (tracing filter, default `warn`)

use std::env;
use std::path::PathBuf;

pub const DEFAULT_PROMPT: &str = "> ";
pub const DEFAULT_HISTORY_FILE: &str = ".tush_history";
pub const DEFAULT_HISTORY_SIZE: usize = 1000;
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub json_errors: bool,
    pub prompt: String,
    /// `None` when no home directory is known and TUSH_HISTORY is unset.
    pub history_path: Option<PathBuf>,
    pub history_size: usize,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            json_errors: false,
            prompt: DEFAULT_PROMPT.to_string(),
            history_path: dirs::home_dir().map(|home| home.join(DEFAULT_HISTORY_FILE)),
            history_size: DEFAULT_HISTORY_SIZE,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset, empty or malformed
    /// values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(format) = get("TUSH_ERROR_FORMAT") {
            config.json_errors = format.eq_ignore_ascii_case("json");
        }
        if let Some(prompt) = get("TUSH_PROMPT") {
            config.prompt = prompt;
        }
        if let Some(path) = get("TUSH_HISTORY") {
            config.history_path = Some(PathBuf::from(path));
        }
        if let Some(size) = get("TUSH_HISTORY_SIZE") {
            match size.parse::<usize>() {
                Ok(size) if size > 0 => config.history_size = size,
                _ => tracing::warn!(%size, "ignoring invalid TUSH_HISTORY_SIZE"),
            }
        }
        config.log_filter = log_filter_from_lookup(&lookup);

        config
    }
}

/// The tracing filter alone, so logging can be installed before the rest
/// of the configuration is read and its warnings are not lost.
pub fn log_filter_from_env() -> String {
    log_filter_from_lookup(|key| env::var(key).ok())
}

fn log_filter_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> String {
    lookup("TUSH_LOG")
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert!(!config.json_errors);
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.history_size, 1000);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("TUSH_ERROR_FORMAT", "JSON"),
            ("TUSH_PROMPT", "$ "),
            ("TUSH_HISTORY", "/tmp/hist"),
            ("TUSH_HISTORY_SIZE", "50"),
            ("TUSH_LOG", "tush=debug"),
        ]);
        assert!(config.json_errors);
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.history_path, Some(PathBuf::from("/tmp/hist")));
        assert_eq!(config.history_size, 50);
        assert_eq!(config.log_filter, "tush=debug");
    }

    #[test]
    fn test_log_filter_read_on_its_own() {
        assert_eq!(log_filter_from_lookup(|_| None), DEFAULT_LOG_FILTER);
        assert_eq!(log_filter_from_lookup(|_| Some(String::new())), DEFAULT_LOG_FILTER);
        assert_eq!(
            log_filter_from_lookup(|key| (key == "TUSH_LOG").then(|| "trace".to_string())),
            "trace"
        );
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = config(&[("TUSH_HISTORY_SIZE", "lots"), ("TUSH_PROMPT", "")]);
        assert_eq!(config.history_size, DEFAULT_HISTORY_SIZE);
        assert_eq!(config.prompt, DEFAULT_PROMPT);
    }
}
