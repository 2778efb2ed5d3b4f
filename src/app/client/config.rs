//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of the
//! `reqwest::Client` used for Open Library requests.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::{catalog, http};
use crate::errors::{RemoteError, RemoteResult};

/// Configuration for the catalog HTTP client
///
/// Timeouts are unset by default so requests use transport defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Book search endpoint
    pub search_url: String,
    /// Author lookup base URL
    pub author_url: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout
    pub pool_idle_timeout: Option<Duration>,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
    /// Whole-request timeout
    pub request_timeout: Option<Duration>,
    /// Connect timeout
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            search_url: catalog::SEARCH_URL.to_string(),
            author_url: catalog::AUTHOR_URL.to_string(),
            user_agent: http::USER_AGENT.to_string(),
            tcp_nodelay: true,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout: None,
            connect_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> RemoteResult<Client> {
        let mut client_builder = Client::builder()
            .user_agent(self.user_agent.as_str())
            .tcp_nodelay(self.tcp_nodelay)
            .pool_max_idle_per_host(self.pool_max_per_host);

        if let Some(timeout) = self.request_timeout {
            client_builder = client_builder.timeout(timeout);
        }

        if let Some(timeout) = self.connect_timeout {
            client_builder = client_builder.connect_timeout(timeout);
        }

        if let Some(idle_timeout) = self.pool_idle_timeout {
            client_builder = client_builder.pool_idle_timeout(idle_timeout);
        }

        client_builder.build().map_err(RemoteError::Http)
    }
}
