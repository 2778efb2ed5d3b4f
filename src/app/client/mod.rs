//! HTTP client for the Open Library catalog
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: the GET-and-decode primitive
//!
//! [`CatalogApi`] is the seam the enrichment pipeline depends on;
//! [`CatalogClient`] is the network implementation.

use async_trait::async_trait;
use url::Url;

use crate::app::models::{Author, Book, SearchResponse};
use crate::errors::{RemoteError, RemoteResult};

pub mod config;
pub mod http;

pub use config::ClientConfig;

use http::HttpHandler;

/// Read-only access to book search and author lookup
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch one page of search results
    ///
    /// `page` is 1-based; both `page` and `page_size` must be at least 1.
    async fn search_books(&self, query: &str, page: u32, page_size: u32)
        -> RemoteResult<Vec<Book>>;

    /// Fetch one author's record
    async fn get_author(&self, author_id: &str) -> RemoteResult<Author>;
}

/// HTTP client for the Open Library search and author endpoints
///
/// Every call issues exactly one request. Nothing is cached.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http_handler: HttpHandler,
    search_url: Url,
    author_url: Url,
}

impl CatalogClient {
    /// Creates a client with default endpoints and transport settings
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if HTTP client creation fails
    pub fn new() -> RemoteResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::InvalidUrl` if an endpoint does not parse, or
    /// `RemoteError::Http` if the HTTP client cannot be built
    pub fn with_config(config: ClientConfig) -> RemoteResult<Self> {
        let search_url = parse_endpoint(&config.search_url)?;
        let author_url = parse_endpoint(&config.author_url)?;
        let http_handler = HttpHandler::new(config.build_http_client()?);

        tracing::debug!(
            "Created catalog client (search: {}, authors: {})",
            search_url,
            author_url
        );

        Ok(Self {
            http_handler,
            search_url,
            author_url,
        })
    }

    /// Build the search URL for one page
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::InvalidRequest` if `page` or `page_size` is zero
    pub fn search_url(&self, query: &str, page: u32, page_size: u32) -> RemoteResult<Url> {
        if page == 0 {
            return Err(RemoteError::InvalidRequest {
                reason: "page must be at least 1".to_string(),
            });
        }
        if page_size == 0 {
            return Err(RemoteError::InvalidRequest {
                reason: "page size must be at least 1".to_string(),
            });
        }

        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("page", &page.to_string())
            .append_pair("limit", &page_size.to_string());
        Ok(url)
    }

    /// Build the lookup URL for one author
    ///
    /// Accepts bare ids (`OL26320A`) as well as path keys
    /// (`/authors/OL26320A`).
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::InvalidRequest` for an empty id
    pub fn author_url(&self, author_id: &str) -> RemoteResult<Url> {
        let id = author_id
            .trim()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        if id.is_empty() {
            return Err(RemoteError::InvalidRequest {
                reason: format!("invalid author id '{}'", author_id),
            });
        }

        let mut url = self.author_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidUrl {
                url: self.author_url.to_string(),
                reason: "author endpoint cannot take path segments".to_string(),
            })?
            .pop_if_empty()
            .push(&format!("{}.json", id));
        Ok(url)
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn search_books(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> RemoteResult<Vec<Book>> {
        let url = self.search_url(query, page, page_size)?;
        let response: SearchResponse = self.http_handler.get_json(&url).await?;

        tracing::debug!(
            "Search '{}' page {} returned {} docs (upstream estimate: {:?})",
            query,
            page,
            response.docs.len(),
            response.num_found
        );

        Ok(response.docs)
    }

    async fn get_author(&self, author_id: &str) -> RemoteResult<Author> {
        let url = self.author_url(author_id)?;
        self.http_handler.get_json(&url).await
    }
}

fn parse_endpoint(raw: &str) -> RemoteResult<Url> {
    Url::parse(raw).map_err(|e| RemoteError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}
