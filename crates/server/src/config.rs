//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `COMPTOIR_DATABASE_URL` - `PostgreSQL` connection string
//! - `COMPTOIR_BASE_URL` - Public URL of the server (used to build image
//!   and upload URLs)
//!
//! ## Optional
//! - `COMPTOIR_HOST` - Bind address (default: 127.0.0.1)
//! - `COMPTOIR_PORT` - Listen port (default: 5000)
//! - `COMPTOIR_UPLOADS_DIR` - Directory for uploaded images (default: uploads)
//! - `COMPTOIR_WORKBOOK_PATH` - Catalogue workbook path (default: data/bdd.xlsx)
//! - `COMPTOIR_CORS_ORIGINS` - Comma-separated allowed origins
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `GLPI_API_URL`, `GLPI_APP_TOKEN`, `GLPI_USERNAME`, `GLPI_PASSWORD` -
//!   GLPI REST bridge credentials (all four required to enable the bridge)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the server
    pub base_url: String,
    /// Directory holding uploaded product images
    pub uploads_dir: PathBuf,
    /// Path to the catalogue workbook
    pub workbook_path: PathBuf,
    /// Allowed CORS origins
    pub cors_origins: Vec<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// GLPI bridge configuration, when fully configured
    pub glpi: Option<GlpiConfig>,
}

/// GLPI REST API configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct GlpiConfig {
    /// GLPI REST API base URL (e.g. `https://helpdesk.example.com/apirest.php`)
    pub api_url: String,
    /// GLPI application token
    pub app_token: SecretString,
    /// GLPI API account username
    pub username: String,
    /// GLPI API account password
    pub password: SecretString,
}

impl std::fmt::Debug for GlpiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlpiConfig")
            .field("api_url", &self.api_url)
            .field("app_token", &"[REDACTED]")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require_env("COMPTOIR_DATABASE_URL").map(SecretString::from)?;
        let base_url = require_env("COMPTOIR_BASE_URL")?;

        let host = optional_env("COMPTOIR_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_owned())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("COMPTOIR_HOST".to_owned(), e.to_string()))?;

        let port = optional_env("COMPTOIR_PORT")
            .unwrap_or_else(|| "5000".to_owned())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("COMPTOIR_PORT".to_owned(), e.to_string()))?;

        let uploads_dir =
            PathBuf::from(optional_env("COMPTOIR_UPLOADS_DIR").unwrap_or_else(|| "uploads".to_owned()));
        let workbook_path = PathBuf::from(
            optional_env("COMPTOIR_WORKBOOK_PATH").unwrap_or_else(|| "data/bdd.xlsx".to_owned()),
        );

        let cors_origins = optional_env("COMPTOIR_CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            uploads_dir,
            workbook_path,
            cors_origins,
            sentry_dsn: optional_env("SENTRY_DSN"),
            sentry_environment: optional_env("SENTRY_ENVIRONMENT"),
            glpi: Self::glpi_from_env(),
        })
    }

    /// The GLPI bridge is enabled only when all four variables are set.
    fn glpi_from_env() -> Option<GlpiConfig> {
        Some(GlpiConfig {
            api_url: optional_env("GLPI_API_URL")?,
            app_token: optional_env("GLPI_APP_TOKEN").map(SecretString::from)?,
            username: optional_env("GLPI_USERNAME")?,
            password: optional_env("GLPI_PASSWORD").map(SecretString::from)?,
        })
    }

    /// The socket address to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Public URL for an uploaded file.
    #[must_use]
    pub fn upload_url(&self, file_name: &str) -> String {
        format!("{}/uploads/{file_name}", self.base_url.trim_end_matches('/'))
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_url_trims_trailing_slash() {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/comptoir"),
            host: "127.0.0.1".parse().expect("valid ip"),
            port: 5000,
            base_url: "https://catalogue.example.com/".to_owned(),
            uploads_dir: PathBuf::from("uploads"),
            workbook_path: PathBuf::from("data/bdd.xlsx"),
            cors_origins: Vec::new(),
            sentry_dsn: None,
            sentry_environment: None,
            glpi: None,
        };

        assert_eq!(
            config.upload_url("pc001.jpg"),
            "https://catalogue.example.com/uploads/pc001.jpg"
        );
    }

    #[test]
    fn test_glpi_debug_redacts_secrets() {
        let glpi = GlpiConfig {
            api_url: "https://helpdesk.example.com/apirest.php".to_owned(),
            app_token: SecretString::from("app-token"),
            username: "api".to_owned(),
            password: SecretString::from("hunter2"),
        };

        let debug = format!("{glpi:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("app-token"));
        assert!(debug.contains("[REDACTED]"));
    }
}
