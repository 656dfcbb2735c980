//! Configuration loading and saving utilities.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::schema::Config;

/// Get the default configuration file path (`~/.nanochat/config.json`).
pub fn get_config_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".nanochat").join("config.json")
}

/// Load configuration from a file, or return a default [`Config`] if the
/// file does not exist or cannot be parsed.
///
/// If `config_path` is `None`, the default path (`~/.nanochat/config.json`)
/// is used.
pub fn load_config(config_path: Option<&Path>) -> Config {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => get_config_path(),
    };

    if path.exists() {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Config>(&contents) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        "Failed to parse config from {}: {}. Using default configuration.",
                        path.display(),
                        e
                    );
                }
            },
            Err(e) => {
                warn!(
                    "Failed to read config from {}: {}. Using default configuration.",
                    path.display(),
                    e
                );
            }
        }
    }

    Config::default()
}

/// Save configuration to a JSON file.
///
/// If `config_path` is `None`, the default path is used. Parent directories
/// are created if they don't exist.
pub fn save_config(config: &Config, config_path: Option<&Path>) {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => get_config_path(),
    };

    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    match serde_json::to_string_pretty(config) {
        Ok(json) => {
            if let Err(e) = fs::write(&path, json) {
                warn!("Failed to write config to {}: {}", path.display(), e);
            }
        }
        Err(e) => {
            warn!("Failed to serialize config: {}", e);
        }
    }
}

/// Resolve the API key: config value first, then `NANOCHAT_API_KEY`, then
/// `OPENAI_API_KEY`. Returns an empty string when none is set (local
/// servers accept that).
pub fn resolve_api_key(config: &Config) -> String {
    if !config.api.api_key.is_empty() {
        return config.api.api_key.clone();
    }
    for var in ["NANOCHAT_API_KEY", "OPENAI_API_KEY"] {
        if let Ok(key) = std::env::var(var) {
            if !key.is_empty() {
                return key;
            }
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_returns_default() {
        let path = Path::new("/tmp/nanochat_test_does_not_exist_987654.json");
        let cfg = load_config(Some(path));
        assert_eq!(cfg.api.model, "gpt-4o");
    }

    #[test]
    fn test_load_unparseable_returns_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        let cfg = load_config(Some(&path));
        assert_eq!(cfg.api.api_base, "https://api.openai.com/v1");
    }

    #[test]
    fn test_load_and_save_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut cfg = Config::default();
        cfg.api.model = "phi4".into();
        cfg.sampling.max_tokens = 1024;
        save_config(&cfg, Some(&path));

        let loaded = load_config(Some(&path));
        assert_eq!(loaded.api.model, "phi4");
        assert_eq!(loaded.sampling.max_tokens, 1024);
    }

    #[test]
    fn test_resolve_api_key_prefers_config() {
        let mut cfg = Config::default();
        cfg.api.api_key = "sk-from-config".into();
        assert_eq!(resolve_api_key(&cfg), "sk-from-config");
    }
}
