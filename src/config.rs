//! Configuration management for the book dashboard
//!
//! Configuration is optional: every field has a default, and a TOML file
//! only needs the values it wants to change. Nothing is ever written to disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::{
    AuthorFailurePolicy, ClientConfig, DashboardDefaults, ExportOrder, PageSize,
};
use crate::constants::{self, catalog, http, logging, table};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Open Library endpoints
    pub catalog: CatalogConfigToml,
    /// Dashboard defaults and policies
    pub dashboard: DashboardConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// User agent sent with every request
    pub user_agent: String,
    /// TCP nodelay setting
    pub tcp_nodelay: bool,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
    /// Connection pool idle timeout (e.g. "90s")
    #[serde(with = "humantime_serde")]
    pub pool_idle_timeout: Option<Duration>,
    /// Whole-request timeout; unset uses the transport default
    #[serde(with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
    /// Connect timeout; unset uses the transport default
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            user_agent: http::USER_AGENT.to_string(),
            tcp_nodelay: true,
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            request_timeout: None,
            connect_timeout: None,
        }
    }
}

/// Open Library endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfigToml {
    /// Book search endpoint
    pub search_url: String,
    /// Author lookup base URL
    pub author_url: String,
}

impl Default for CatalogConfigToml {
    fn default() -> Self {
        Self {
            search_url: catalog::SEARCH_URL.to_string(),
            author_url: catalog::AUTHOR_URL.to_string(),
        }
    }
}

/// Dashboard defaults and policies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfigToml {
    /// Search text after login
    pub default_query: String,
    /// Page size after login; must be one of the offered sizes
    pub default_page_size: u32,
    /// What a failed author lookup does to the page
    pub author_failure_policy: AuthorFailurePolicy,
    /// Row order of the CSV export
    pub export_order: ExportOrder,
    /// Where the interactive export writes
    pub export_file: PathBuf,
}

impl Default for DashboardConfigToml {
    fn default() -> Self {
        Self {
            default_query: table::DEFAULT_QUERY.to_string(),
            default_page_size: table::DEFAULT_PAGE_SIZE,
            author_failure_policy: AuthorFailurePolicy::default(),
            export_order: ExportOrder::default(),
            export_file: PathBuf::from(constants::export::FILE_NAME),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
    /// Log file; the interactive UI discards logs when unset
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LEVEL.to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration
    ///
    /// An explicit path must exist. Otherwise the first file found among
    /// `./book-dashboard.toml` and `<config dir>/book-dashboard/config.toml`
    /// is used, falling back to defaults when there is none.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Self::load_from_file(&path).await?
            }
            None => match Self::find_config_file() {
                Some(path) => Self::load_from_file(&path).await?,
                None => Self::default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> ConfigResult<()> {
        PageSize::try_from(self.dashboard.default_page_size).map_err(|reason| {
            ConfigError::InvalidValue {
                field: "dashboard.default_page_size".to_string(),
                value: self.dashboard.default_page_size.to_string(),
                reason,
            }
        })?;

        for (field, value) in [
            ("catalog.search_url", &self.catalog.search_url),
            ("catalog.author_url", &self.catalog.author_url),
        ] {
            url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
                field: field.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }

    /// Runtime client configuration
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            search_url: self.catalog.search_url.clone(),
            author_url: self.catalog.author_url.clone(),
            user_agent: self.client.user_agent.clone(),
            tcp_nodelay: self.client.tcp_nodelay,
            pool_idle_timeout: self.client.pool_idle_timeout,
            pool_max_per_host: self.client.pool_max_per_host,
            request_timeout: self.client.request_timeout,
            connect_timeout: self.client.connect_timeout,
        }
    }

    /// Defaults for a freshly opened dashboard
    pub fn dashboard_defaults(&self) -> DashboardDefaults {
        DashboardDefaults {
            query: self.dashboard.default_query.clone(),
            // validate() has already vetted the size
            page_size: PageSize::try_from(self.dashboard.default_page_size).unwrap_or_default(),
            export_order: self.dashboard.export_order,
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(constants::config::LOCAL_FILE)];
        if let Ok(user_path) = Self::default_config_path() {
            search_paths.push(user_path);
        }

        for path in search_paths {
            if path.exists() {
                debug!("Found config file: {}", path.display());
                return Some(path);
            }
        }

        debug!("No config file found in standard locations");
        None
    }

    /// Get the default config file path for the current user
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir
            .join(constants::config::APP_DIR)
            .join(constants::config::FILE_NAME))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;
        debug!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Default configuration file content with comments
    pub fn default_config_content() -> String {
        format!(
            r#"# Book Dashboard Configuration
# Every setting is optional; remove what you do not want to change.

[client]
user_agent = "{user_agent}"
tcp_nodelay = true
pool_max_per_host = {pool_max}
pool_idle_timeout = "90s"
# Unset timeouts use the transport defaults
# request_timeout = "30s"
# connect_timeout = "10s"

[catalog]
search_url = "{search_url}"
author_url = "{author_url}"

[dashboard]
default_query = "{query}"
# One of 10, 50, 100
default_page_size = {page_size}
# "fail_page": one failed author lookup fails the whole page
# "degrade": leave that book's author fields empty instead
author_failure_policy = "fail_page"
# "fetch_order" or "display_order"
export_order = "fetch_order"
export_file = "{export_file}"

[logging]
level = "{level}"  # error, warn, info, debug, trace
# log_file = "/path/to/book-dashboard.log"  # required to see logs in the interactive UI
"#,
            user_agent = http::USER_AGENT,
            pool_max = http::POOL_MAX_PER_HOST,
            search_url = catalog::SEARCH_URL,
            author_url = catalog::AUTHOR_URL,
            query = table::DEFAULT_QUERY,
            page_size = table::DEFAULT_PAGE_SIZE,
            export_file = constants::export::FILE_NAME,
            level = logging::DEFAULT_LEVEL,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.dashboard.default_page_size, 10);
        assert_eq!(config.dashboard.author_failure_policy, AuthorFailurePolicy::FailPage);
        assert_eq!(config.dashboard.export_order, ExportOrder::FetchOrder);
        assert_eq!(config.logging.level, "info");
        assert!(config.client.request_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generated_content_round_trips() {
        let content = AppConfig::default_config_content();
        let parsed = AppConfig::from_toml(&content).unwrap();

        assert_eq!(parsed.catalog.search_url, catalog::SEARCH_URL);
        assert_eq!(parsed.client.pool_idle_timeout, Some(Duration::from_secs(90)));
        assert_eq!(parsed.dashboard.default_query, table::DEFAULT_QUERY);
        assert!(content.contains("[dashboard]"));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let parsed = AppConfig::from_toml(
            r#"
[dashboard]
author_failure_policy = "degrade"
export_order = "display_order"

[client]
request_timeout = "15s"
"#,
        )
        .unwrap();

        assert_eq!(parsed.dashboard.author_failure_policy, AuthorFailurePolicy::Degrade);
        assert_eq!(parsed.dashboard.export_order, ExportOrder::DisplayOrder);
        assert_eq!(parsed.client.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(parsed.dashboard.default_page_size, 10);
        assert_eq!(parsed.client_config().request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_invalid_page_size_rejected() {
        let result = AppConfig::from_toml("[dashboard]\ndefault_page_size = 25\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = AppConfig::from_toml("[catalog]\nsearch_url = \"openlibrary\"\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result = AppConfig::from_toml("[dashboard]\nauthor_failure_policy = \"retry\"\n");
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_dashboard_defaults() {
        let config = AppConfig::from_toml(
            "[dashboard]\ndefault_query = \"dune\"\ndefault_page_size = 100\n",
        )
        .unwrap();

        let defaults = config.dashboard_defaults();
        assert_eq!(defaults.query, "dune");
        assert_eq!(defaults.page_size.get(), 100);
    }

    #[tokio::test]
    async fn test_config_loading_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let result = AppConfig::load(Some(config_path)).await;
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_config_loading_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("book-dashboard.toml");

        tokio::fs::write(
            &config_path,
            r#"
[dashboard]
default_query = "asimov"
export_file = "out/asimov.csv"

[logging]
level = "debug"
"#,
        )
        .await
        .unwrap();

        let config = AppConfig::load(Some(config_path)).await.unwrap();

        assert_eq!(config.dashboard.default_query, "asimov");
        assert_eq!(config.dashboard.export_file, PathBuf::from("out/asimov.csv"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.catalog.author_url, catalog::AUTHOR_URL);
    }
}
