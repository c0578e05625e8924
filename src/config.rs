// Configuration loading and parsing (dashboard.toml, credentials.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analytics::TimeFilter;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub ui: UiConfig,
    pub credentials: CredentialsConfig,
}

// ---------------------------------------------------------------------------
// dashboard.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire dashboard.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DashboardFile {
    store: StoreConfig,
    #[serde(default)]
    ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the backing store's REST endpoint.
    pub url: String,
    /// Table holding the abandoned-cart rows.
    #[serde(default = "default_table")]
    pub table: String,
    /// Rows requested per page during the full scan.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_table() -> String {
    "abandoned_carts".to_string()
}

fn default_page_size() -> usize {
    1000
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// Time window active on startup: "today", "week", "month", or "all".
    #[serde(default = "default_filter")]
    pub default_filter: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            default_filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "today".to_string()
}

impl UiConfig {
    /// The configured startup window as a `TimeFilter`.
    ///
    /// Validation guarantees the string is one of the known names, so this
    /// never needs to fail after `load_config`.
    pub fn default_time_filter(&self) -> TimeFilter {
        match self.default_filter.as_str() {
            "week" => TimeFilter::Week,
            "month" => TimeFilter::Month,
            "all" => TimeFilter::All,
            _ => TimeFilter::Today,
        }
    }
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    /// Service key sent as both the `apikey` header and the bearer token.
    pub service_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/dashboard.toml` and
/// (optionally) `config/credentials.toml`, relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- dashboard.toml (required) ---
    let dashboard_path = config_dir.join("dashboard.toml");
    let dashboard_text = read_file(&dashboard_path)?;
    let dashboard_file: DashboardFile =
        toml::from_str(&dashboard_text).map_err(|e| ConfigError::ParseError {
            path: dashboard_path.clone(),
            source: e,
        })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        store: dashboard_file.store,
        ui: dashboard_file.ui,
        credentials,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        // If config/ also doesn't exist, the app will fail to load config.
        // Surface a clear message about the missing defaults directory.
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        // Skip .example template files
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, skip it
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

const KNOWN_FILTERS: &[&str] = &["today", "week", "month", "all"];

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url = config.store.url.trim();
    if url.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "store.url".into(),
            message: "must not be empty".into(),
        });
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::ValidationError {
            field: "store.url".into(),
            message: format!("must start with http:// or https://, got `{url}`"),
        });
    }

    if config.store.table.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "store.table".into(),
            message: "must not be empty".into(),
        });
    }

    if config.store.page_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "store.page_size".into(),
            message: "must be greater than 0".into(),
        });
    }

    if !KNOWN_FILTERS.contains(&config.ui.default_filter.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "ui.default_filter".into(),
            message: format!(
                "must be one of {KNOWN_FILTERS:?}, got `{}`",
                config.ui.default_filter
            ),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    /// Helper: returns the path to the project root (the directory holding
    /// `defaults/`), whether tests run from the crate root or elsewhere.
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    const VALID_DASHBOARD: &str = r#"
[store]
url = "https://store.example.com"
table = "abandoned_carts"
page_size = 1000

[ui]
default_filter = "today"
"#;

    fn write_config(dir: &Path, dashboard: &str) {
        let config_dir = dir.join("config");
        let _ = fs::remove_dir_all(dir);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("dashboard.toml"), dashboard).unwrap();
    }

    #[test]
    fn load_default_config_from_project_files() {
        let root = project_root();
        ensure_config_files(&root).expect("should copy default configs");
        let config = load_config_from(&root).expect("should load valid config");

        assert_eq!(config.store.table, "abandoned_carts");
        assert_eq!(config.store.page_size, 1000);
        assert_eq!(config.ui.default_filter, "today");
        assert_eq!(config.ui.default_time_filter(), TimeFilter::Today);
        // The shipped defaults carry no service key.
        assert!(config.credentials.service_key.is_none());
    }

    #[test]
    fn missing_credentials_toml_is_ok() {
        let tmp = std::env::temp_dir().join("cartwatch_config_no_creds");
        write_config(&tmp, VALID_DASHBOARD);

        let config = load_config_from(&tmp).expect("should load without credentials.toml");
        assert!(config.credentials.service_key.is_none());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn credentials_toml_with_service_key() {
        let tmp = std::env::temp_dir().join("cartwatch_config_with_creds");
        write_config(&tmp, VALID_DASHBOARD);
        fs::write(
            tmp.join("config/credentials.toml"),
            "service_key = \"sb-test-key\"\n",
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("should load with credentials.toml");
        assert_eq!(config.credentials.service_key.as_deref(), Some("sb-test-key"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn table_and_page_size_default_when_omitted() {
        let tmp = std::env::temp_dir().join("cartwatch_config_minimal");
        write_config(&tmp, "[store]\nurl = \"https://store.example.com\"\n");

        let config = load_config_from(&tmp).expect("should fill defaults");
        assert_eq!(config.store.table, "abandoned_carts");
        assert_eq!(config.store.page_size, 1000);
        assert_eq!(config.ui.default_filter, "today");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_url() {
        let tmp = std::env::temp_dir().join("cartwatch_config_empty_url");
        write_config(&tmp, "[store]\nurl = \"\"\n");

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "store.url"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_non_http_url() {
        let tmp = std::env::temp_dir().join("cartwatch_config_bad_scheme");
        write_config(&tmp, "[store]\nurl = \"ftp://store.example.com\"\n");

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "store.url"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_page_size() {
        let tmp = std::env::temp_dir().join("cartwatch_config_zero_page");
        write_config(
            &tmp,
            "[store]\nurl = \"https://store.example.com\"\npage_size = 0\n",
        );

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "store.page_size"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_default_filter() {
        let tmp = std::env::temp_dir().join("cartwatch_config_bad_filter");
        write_config(
            &tmp,
            "[store]\nurl = \"https://store.example.com\"\n\n[ui]\ndefault_filter = \"fortnight\"\n",
        );

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "ui.default_filter"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn default_filter_maps_to_time_filter() {
        for (name, expected) in [
            ("today", TimeFilter::Today),
            ("week", TimeFilter::Week),
            ("month", TimeFilter::Month),
            ("all", TimeFilter::All),
        ] {
            let ui = UiConfig {
                default_filter: name.to_string(),
            };
            assert_eq!(ui.default_time_filter(), expected);
        }
    }

    #[test]
    fn file_not_found_for_missing_dashboard_toml() {
        let tmp = std::env::temp_dir().join("cartwatch_config_missing_dashboard");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => {
                assert!(path.ends_with("dashboard.toml"));
            }
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = std::env::temp_dir().join("cartwatch_config_invalid_toml");
        write_config(&tmp, "this is not valid [[[ toml");

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => {
                assert!(path.ends_with("dashboard.toml"));
            }
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("cartwatch_config_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join("dashboard.toml"), VALID_DASHBOARD).unwrap();
        // An example file that must NOT be copied.
        fs::write(
            defaults_dir.join("credentials.toml.example"),
            "service_key = \"sb-...\"\n",
        )
        .unwrap();

        assert!(!tmp.join("config").exists());

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config/dashboard.toml").exists());
        assert!(!tmp.join("config/credentials.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("cartwatch_config_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        let config_dir = tmp.join("config");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(defaults_dir.join("dashboard.toml"), VALID_DASHBOARD).unwrap();

        // Pre-existing file with custom content must be preserved.
        fs::write(config_dir.join("dashboard.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());

        let content = fs::read_to_string(config_dir.join("dashboard.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("cartwatch_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_config_files(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
