//! Configuration management for tabdoc.
//!
//! Parses `tabdoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `search.url`
//! - `search.api_key`
//! - `search.index`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// `Some(false)` disables caching regardless of `cache.backend`.
    pub cache_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "tabdoc.toml";

/// Project data directory, created next to the config file.
const PROJECT_DIR: &str = ".tabdoc";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Cache configuration.
    pub cache: CacheConfig,
    /// Raw `[search]` section; absent means local search only.
    search: Option<SearchConfigRaw>,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved search configuration (set after loading).
    #[serde(skip)]
    pub search_resolved: Option<SearchConfig>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Content root holding the markdown tree.
    pub source_dir: PathBuf,
    /// Project directory for tabdoc data (`.tabdoc/`).
    pub project_dir: PathBuf,
}

impl DocsConfig {
    /// Cache directory path (`.tabdoc/cache/`).
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.project_dir.join("cache")
    }
}

/// Where cached navigation and documents are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Entries on disk under `.tabdoc/cache`, shared with maintenance commands.
    File,
    /// Entries in process memory.
    Memory,
    /// Caching disabled.
    None,
}

/// Cache configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Storage used for cache entries.
    pub backend: CacheBackend,
    /// Time-to-live of an entry in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::File,
            ttl_secs: 3600,
        }
    }
}

impl CacheConfig {
    /// Entry time-to-live.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Raw search configuration as parsed from TOML.
#[derive(Debug, Deserialize)]
struct SearchConfigRaw {
    url: String,
    api_key: Option<String>,
    #[serde(default = "default_index")]
    index: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

fn default_index() -> String {
    "documentation".to_owned()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Resolved search engine configuration with environment variables expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Base URL of the search engine.
    pub url: String,
    /// Bearer key, if the engine requires one.
    pub api_key: Option<String>,
    /// Index holding documentation records.
    pub index: String,
    /// Global timeout for a single request.
    pub timeout: Duration,
}

impl SearchConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.url, "search.url")?;
        require_http_url(&self.url, "search.url")?;
        require_non_empty(&self.index, "search.index")?;
        if self.timeout.is_zero() {
            return Err(ConfigError::Validation(
                "search.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`search.api_key`").
        field: String,
        /// Error message (e.g., "${`MEILISEARCH_KEY`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `tabdoc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if settings.cache_enabled == Some(false) {
            self.cache.backend = CacheBackend::None;
        }
    }

    /// Get validated search engine configuration.
    ///
    /// Use this instead of `search_resolved` when the command cannot work
    /// without a search engine (`index`, `flush`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_search(&self) -> Result<&SearchConfig, ConfigError> {
        let search = self.search_resolved.as_ref().ok_or_else(|| {
            ConfigError::Validation("[search] section required in config".into())
        })?;
        search.validate()?;
        Ok(search)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            cache: CacheConfig::default(),
            search: None,
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                project_dir: base.join(PROJECT_DIR),
            },
            search_resolved: None,
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "cache.ttl_secs must be greater than 0".to_owned(),
            ));
        }

        if let Some(search) = &self.search_resolved {
            search.validate()?;
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        self.search_resolved = match &self.search {
            Some(raw) => Some(SearchConfig {
                url: expand::expand_env(&raw.url, "search.url")?,
                api_key: expand::expand_optional(raw.api_key.as_deref(), "search.api_key")?,
                index: expand::expand_env(&raw.index, "search.index")?,
                timeout: Duration::from_secs(raw.timeout_secs),
            }),
            None => None,
        };

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(self.docs.source_dir.as_deref().unwrap_or("docs")),
            project_dir: config_dir.join(PROJECT_DIR),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(
            config.docs_resolved.cache_dir(),
            PathBuf::from("/test/.tabdoc/cache")
        );
        assert_eq!(config.cache.backend, CacheBackend::File);
        assert_eq!(config.cache.ttl(), Duration::from_secs(3600));
        assert!(config.search_resolved.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.cache.backend, CacheBackend::File);
    }

    #[test]
    fn test_parse_cache_config() {
        let toml = r#"
[cache]
backend = "memory"
ttl_secs = 60
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_parse_unknown_cache_backend_fails() {
        let toml = r#"
[cache]
backend = "redis"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_search_section_defaults() {
        let toml = r#"
[search]
url = "http://127.0.0.1:7700"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(
            config.search_resolved,
            Some(SearchConfig {
                url: "http://127.0.0.1:7700".to_owned(),
                api_key: None,
                index: "documentation".to_owned(),
                timeout: Duration::from_secs(10),
            })
        );
    }

    #[test]
    fn test_require_search_missing_section() {
        let config = Config::default_with_base(Path::new("/test"));
        let err = config.require_search().unwrap_err();
        assert!(err.to_string().contains("[search]"));
    }

    #[test]
    fn test_search_url_must_be_http() {
        let search = SearchConfig {
            url: "ftp://search".to_owned(),
            api_key: None,
            index: "documentation".to_owned(),
            timeout: Duration::from_secs(10),
        };
        let err = search.validate().unwrap_err();
        assert!(err.to_string().contains("search.url"));
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
source_dir = "resources/docs"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/resources/docs")
        );
        assert_eq!(
            config.docs_resolved.project_dir,
            PathBuf::from("/project/.tabdoc")
        );
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            source_dir: Some(PathBuf::from("/custom/docs")),
            cache_enabled: Some(false),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/custom/docs")
        );
        assert_eq!(config.cache.backend, CacheBackend::None);
    }

    #[test]
    fn test_cache_enabled_true_keeps_backend() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.cache.backend = CacheBackend::Memory;
        config.apply_cli_settings(&CliSettings {
            cache_enabled: Some(true),
            ..Default::default()
        });
        assert_eq!(config.cache.backend, CacheBackend::Memory);
    }

    #[test]
    fn test_validate_rejects_zero_port_and_ttl() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default_with_base(Path::new("/test"));
        config.cache.ttl_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cache.ttl_secs"));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/tabdoc.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config_dir() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tabdoc.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 8080

[docs]
source_dir = "content"

[search]
url = "${TABDOC_CONFIG_TEST_URL:-http://search.local:7700}"
api_key = "${TABDOC_CONFIG_TEST_KEY:-}"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.docs_resolved.source_dir, tmp.path().join("content"));
        assert_eq!(config.config_path, Some(path));
        let search = config.require_search().unwrap();
        assert_eq!(search.url, "http://search.local:7700");
        assert_eq!(search.api_key, None);
    }

    #[test]
    fn test_load_from_file_with_cli_override() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tabdoc.toml");
        std::fs::write(&path, "[server]\nport = 8080\n").unwrap();

        let settings = CliSettings {
            port: Some(9999),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.server.port, 9999);
    }

    #[test]
    fn test_load_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tabdoc.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        let result = Config::load(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
