//! Connection options, loadable from YAML and overridable from the environment.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use url::Url;

fn default_endpoint() -> String {
    "http://127.0.0.1:8529".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_pool_max_idle_per_host() -> usize {
    32
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionOptions {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Database name; requests are prefixed with `/_db/<name>` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            database: None,
            timeout_secs: default_timeout_secs(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
            username: None,
            password: None,
        }
    }
}

impl ConnectionOptions {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_database(mut self, db: impl Into<String>) -> Self {
        self.database = Some(db.into());
        self
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(user.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid connection options: {}", e),
                ErrorContext::new().with_source("connection_options"),
            )
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Defaults overlaid with `ARANGO_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Overlay `ARANGO_ENDPOINT`, `ARANGO_DATABASE`, `ARANGO_USERNAME`,
    /// `ARANGO_PASSWORD`, `ARANGO_HTTP_TIMEOUT_SECS` and
    /// `ARANGO_HTTP_POOL_MAX_IDLE_PER_HOST`. Unparsable numbers are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = env::var("ARANGO_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Ok(db) = env::var("ARANGO_DATABASE") {
            self.database = Some(db);
        }
        if let Ok(user) = env::var("ARANGO_USERNAME") {
            self.username = Some(user);
        }
        if let Ok(password) = env::var("ARANGO_PASSWORD") {
            self.password = Some(password);
        }
        if let Some(secs) = env::var("ARANGO_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.timeout_secs = secs;
        }
        if let Some(n) = env::var("ARANGO_HTTP_POOL_MAX_IDLE_PER_HOST")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            self.pool_max_idle_per_host = n;
        }
        self
    }

    /// Parsed endpoint URL; only `http` and `https` are accepted.
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid endpoint: {}", e),
                ErrorContext::new()
                    .with_field_path("options.endpoint")
                    .with_details(self.endpoint.clone()),
            )
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::configuration_with_context(
                format!("unsupported endpoint scheme '{}'", other),
                ErrorContext::new()
                    .with_field_path("options.endpoint")
                    .with_details("expected http or https"),
            )),
        }
    }

    /// Value of the `Host` header written into captured requests.
    pub fn host_header(&self) -> Result<String> {
        let url = self.endpoint_url()?;
        let host = url.host_str().unwrap_or_default();
        Ok(match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }

    /// Prefix `path` with the database route unless it already targets one.
    pub fn database_path(&self, path: &str) -> String {
        match &self.database {
            Some(db) if !path.starts_with("/_db/") => format!("/_db/{}{}", db, path),
            _ => path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_defaults() {
        let opts = ConnectionOptions::from_yaml_str("endpoint: http://db.local:8529\ndatabase: app\n").unwrap();
        assert_eq!(opts.endpoint, "http://db.local:8529");
        assert_eq!(opts.database.as_deref(), Some("app"));
        assert_eq!(opts.timeout_secs, 30);
        assert_eq!(opts.pool_max_idle_per_host, 32);
        assert_eq!(opts.host_header().unwrap(), "db.local:8529");
    }

    #[test]
    fn test_invalid_yaml_is_configuration_error() {
        let err = ConnectionOptions::from_yaml_str("timeout_secs: [1, 2]").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_endpoint_scheme_validation() {
        assert!(ConnectionOptions::new("https://db.example.com").endpoint_url().is_ok());
        let err = ConnectionOptions::new("tcp://127.0.0.1:8529").endpoint_url().unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("options.endpoint")
        );
        assert!(ConnectionOptions::new("not a url").endpoint_url().is_err());
    }

    #[test]
    fn test_database_path_prefix() {
        let opts = ConnectionOptions::default().with_database("shop");
        assert_eq!(opts.database_path("/_api/batch"), "/_db/shop/_api/batch");
        assert_eq!(opts.database_path("/_db/other/_api/version"), "/_db/other/_api/version");
        assert_eq!(ConnectionOptions::default().database_path("/_api/batch"), "/_api/batch");
    }
}
