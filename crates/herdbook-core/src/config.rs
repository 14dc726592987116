//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/herdbook/config.toml)
//! 3. Environment variables (HERDBOOK_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::access::{OperatorCredential, Role};

/// Environment variable prefix
const ENV_PREFIX: &str = "HERDBOOK";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The record file
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Log destination; logs go to stderr when unset
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Accepted logins
    #[serde(default = "default_operators")]
    pub operators: Vec<OperatorCredential>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_file: None,
            log_level: default_log_level(),
            operators: default_operators(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (HERDBOOK_DATA_FILE, HERDBOOK_LOG_FILE, HERDBOOK_LOG_LEVEL)
    /// 2. Config file (~/.config/herdbook/config.toml or HERDBOOK_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring an explicit `--config` path
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // HERDBOOK_DATA_FILE
        if let Ok(val) = std::env::var(format!("{}_DATA_FILE", ENV_PREFIX)) {
            if !val.is_empty() {
                self.data_file = PathBuf::from(val);
            }
        }

        // HERDBOOK_LOG_FILE
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        // HERDBOOK_LOG_LEVEL
        if let Ok(val) = std::env::var(format!("{}_LOG_LEVEL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.log_level = val.to_lowercase();
            }
        }
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with HERDBOOK_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("herdbook")
            .join("config.toml")
    }
}

/// Get the default record file location
fn default_data_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("herdbook")
        .join("animals.csv")
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// The two built-in logins
fn default_operators() -> Vec<OperatorCredential> {
    vec![
        OperatorCredential::new("admin", "admin123", Role::Administrator),
        OperatorCredential::new("viewer", "viewer123", Role::Viewer),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "HERDBOOK_DATA_FILE",
        "HERDBOOK_LOG_FILE",
        "HERDBOOK_LOG_LEVEL",
    ];

    #[test]
    fn test_default_config() {
        let _guard = EnvGuard::new(ENV_VARS);
        let config = Config::default();
        assert!(config.data_file.ends_with("herdbook/animals.csv"));
        assert!(config.log_file.is_none());
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.operators.len(), 2);
        assert_eq!(config.operators[0].role, Role::Administrator);
        assert_eq!(config.operators[1].role, Role::Viewer);
    }

    #[test]
    fn test_env_override_data_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("HERDBOOK_DATA_FILE", "/tmp/herdbook-test/animals.csv");
        config.apply_env_overrides();

        assert_eq!(
            config.data_file,
            PathBuf::from("/tmp/herdbook-test/animals.csv")
        );
    }

    #[test]
    fn test_env_override_logging() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("HERDBOOK_LOG_LEVEL", "DEBUG");
        env::set_var("HERDBOOK_LOG_FILE", "/tmp/herdbook.log");
        config.apply_env_overrides();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/herdbook.log")));

        // Empty string clears the log file
        env::set_var("HERDBOOK_LOG_FILE", "");
        config.apply_env_overrides();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_file = "/custom/animals.csv"
            log_level = "info"

            [[operators]]
            username = "farmer"
            password = "hay"
            role = "administrator"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_file, PathBuf::from("/custom/animals.csv"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.operators.len(), 1);
        assert_eq!(config.operators[0].username, "farmer");
        assert_eq!(config.operators[0].role, Role::Administrator);
    }

    #[test]
    fn test_partial_file_keeps_default_operators() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::load_from_str("log_level = \"error\"").unwrap();
        assert_eq!(config.log_level, "error");
        assert_eq!(config.operators, default_operators());
    }

    #[test]
    fn test_load_from_str_rejects_unknown_role() {
        let toml = r#"
            [[operators]]
            username = "x"
            password = "y"
            role = "superuser"
        "#;
        assert!(Config::load_from_str(toml).is_err());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.operators.len(), 2);
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_file: PathBuf::from("/data/animals.csv"),
            log_file: Some(PathBuf::from("/data/herdbook.log")),
            log_level: "debug".to_string(),
            operators: default_operators(),
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.data_file, config.data_file);
        assert_eq!(loaded.log_file, config.log_file);
        assert_eq!(loaded.log_level, "debug");
        assert_eq!(loaded.operators, config.operators);
    }
}
