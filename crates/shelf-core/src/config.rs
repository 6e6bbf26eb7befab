//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/shelf/config.toml)
//! 3. Environment variables (SHELF_* prefix)
//!
//! Environment variables take precedence over config file values.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::SearchField;

/// Environment variable prefix
const ENV_PREFIX: &str = "SHELF";

/// Data file used when none is configured
pub const DEFAULT_DATA_FILE: &str = "../test_library.json";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// JSON file holding the book list
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Fields offered for search
    #[serde(default = "default_search_fields")]
    pub search_fields: Vec<SearchField>,

    /// Debug log destination (used when SHELF_LOG is set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            search_fields: default_search_fields(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (SHELF_DATA_FILE, SHELF_SEARCH_FIELDS, SHELF_LOG_FILE)
    /// 2. Config file (~/.config/shelf/config.toml or SHELF_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
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

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        // SHELF_DATA_FILE
        if let Ok(val) = std::env::var(format!("{}_DATA_FILE", ENV_PREFIX)) {
            if !val.is_empty() {
                self.data_file = PathBuf::from(val);
            }
        }

        // SHELF_SEARCH_FIELDS
        if let Ok(val) = std::env::var(format!("{}_SEARCH_FIELDS", ENV_PREFIX)) {
            self.search_fields = parse_search_fields(&val)
                .with_context(|| format!("Invalid {}_SEARCH_FIELDS", ENV_PREFIX))?;
        }

        // SHELF_LOG_FILE
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        Ok(())
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
    /// Can be overridden with SHELF_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shelf")
            .join("config.toml")
    }

    /// Get the path to the id counter kept next to the data file
    pub fn counter_path(&self) -> PathBuf {
        let mut name = self
            .data_file
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("library.json"));
        name.push(".seq");
        self.data_file.with_file_name(name)
    }

    /// Get the debug log path
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("shelf")
                .join("debug.log")
        })
    }
}

/// Parse a comma-separated list of field names, e.g. `id,title,author`
pub fn parse_search_fields(value: &str) -> Result<Vec<SearchField>> {
    let fields = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<SearchField>())
        .collect::<std::result::Result<Vec<_>, _>>()?;

    anyhow::ensure!(!fields.is_empty(), "At least one search field is required");
    Ok(fields)
}

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_search_fields() -> Vec<SearchField> {
    vec![
        SearchField::Id,
        SearchField::Title,
        SearchField::Author,
        SearchField::Year,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

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

    const ENV_VARS: &[&str] = &["SHELF_DATA_FILE", "SHELF_SEARCH_FIELDS", "SHELF_LOG_FILE"];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data_file, PathBuf::from("../test_library.json"));
        assert_eq!(
            config.search_fields,
            vec![
                SearchField::Id,
                SearchField::Title,
                SearchField::Author,
                SearchField::Year
            ]
        );
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_counter_path() {
        let config = Config {
            data_file: PathBuf::from("/data/books.json"),
            ..Config::default()
        };
        assert_eq!(config.counter_path(), PathBuf::from("/data/books.json.seq"));
    }

    #[test]
    fn test_env_override_data_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("SHELF_DATA_FILE", "/tmp/shelf-test.json");
        config.apply_env_overrides().unwrap();

        assert_eq!(config.data_file, PathBuf::from("/tmp/shelf-test.json"));
    }

    #[test]
    fn test_env_override_search_fields() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("SHELF_SEARCH_FIELDS", "title, status");
        config.apply_env_overrides().unwrap();
        assert_eq!(
            config.search_fields,
            vec![SearchField::Title, SearchField::Status]
        );

        env::set_var("SHELF_SEARCH_FIELDS", "title,isbn");
        let err = config.apply_env_overrides().unwrap_err();
        assert!(format!("{:#}", err).contains("isbn"));
    }

    #[test]
    fn test_env_override_log_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("SHELF_LOG_FILE", "/tmp/shelf.log");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/shelf.log")));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/shelf.log"));

        // Empty string clears it
        env::set_var("SHELF_LOG_FILE", "");
        config.apply_env_overrides().unwrap();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_file: PathBuf::from("/data/library.json"),
            search_fields: vec![SearchField::Author, SearchField::Status],
            log_file: None,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_file"));
        assert!(toml_str.contains("\"author\""));
        assert!(!toml_str.contains("log_file"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_file = "/custom/library.json"
            search_fields = ["title", "year"]
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_file, PathBuf::from("/custom/library.json"));
        assert_eq!(
            config.search_fields,
            vec![SearchField::Title, SearchField::Year]
        );
    }

    #[test]
    fn test_load_from_str_field_names_ignore_case() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::load_from_str(r#"search_fields = ["Title", "YEAR"]"#).unwrap();
        assert_eq!(
            config.search_fields,
            vec![SearchField::Title, SearchField::Year]
        );
    }

    #[test]
    fn test_load_from_str_unknown_field_fails() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"search_fields = ["title", "isbn"]"#;
        assert!(Config::load_from_str(toml).is_err());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        // Should return defaults when file doesn't exist
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_to_path_round_trip() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_file: PathBuf::from("books.json"),
            search_fields: vec![SearchField::Title],
            log_file: Some(PathBuf::from("shelf.log")),
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_parse_search_fields() {
        assert_eq!(
            parse_search_fields("id,title,author,year").unwrap(),
            Config::default().search_fields
        );
        assert!(parse_search_fields(" , ").is_err());
        assert!(parse_search_fields("title,isbn").is_err());
    }
}
