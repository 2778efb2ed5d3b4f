//! Error types for the book dashboard
//!
//! This module defines the error types for every component of the application.
//! Each domain has its own enum and result alias; [`AppError`] aggregates them
//! for the command-line layer.

use std::path::PathBuf;
use thiserror::Error;

/// Remote catalog errors (search and author endpoints)
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Transport-level failure (DNS, connect, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server error: HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Response body was not the expected JSON
    #[error("Could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Endpoint URL could not be built
    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Request parameters rejected before sending
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },
}

/// Session gate errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Username or password did not match
    #[error("{}", crate::constants::auth::INVALID_LOGIN_NOTICE)]
    InvalidCredentials,

    /// Operation requires a logged-in session
    #[error("Not logged in. Log in before using the dashboard")]
    NotLoggedIn,

    /// Reading the password from the terminal failed
    #[error("Failed to read password: {0}")]
    PasswordPrompt(#[from] std::io::Error),
}

/// CSV export errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV serialization failed
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the export file failed
    #[error("Failed to write export file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No page has been loaded yet
    #[error("Nothing to export. Load a page first")]
    NothingLoaded,

    /// A page load is outstanding
    #[error("Load in progress. Export once the page has loaded")]
    LoadInProgress,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// No user configuration directory on this platform
    #[error("Could not determine user config directory")]
    NoConfigDir,
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Remote catalog error
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Session error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Terminal or other I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is transient, i.e. the same action may succeed later
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Remote(RemoteError::Http(_)) => true,
            AppError::Remote(RemoteError::Status { status, .. }) => {
                *status == 429 || *status >= 500
            }
            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Remote(_) => "remote",
            AppError::Auth(_) => "authentication",
            AppError::Export(_) => "export",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Remote catalog result type alias
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Session result type alias
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Export result type alias
pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
