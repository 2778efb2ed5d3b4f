//! Application constants for the book dashboard
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Fixed dashboard credentials
///
/// The dashboard has no user store. These are compared in plaintext against
/// whatever the login form submits.
pub mod auth {
    /// The only accepted username
    pub const USERNAME: &str = "nua-admin";

    /// The only accepted password
    pub const PASSWORD: &str = "nua-log";

    /// Notice shown after a rejected login attempt
    pub const INVALID_LOGIN_NOTICE: &str = "Invalid username or password";
}

/// Open Library endpoints
pub mod catalog {
    /// Book search endpoint (`?q=&page=&limit=`)
    pub const SEARCH_URL: &str = "https://openlibrary.org/search.json";

    /// Author lookup base; requests go to `{AUTHOR_URL}/{id}.json`
    pub const AUTHOR_URL: &str = "https://openlibrary.org/authors";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "BookDashboard/0.1.0 (Open Library browser)";

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 16;
}

/// Table and pagination defaults
pub mod table {
    /// Page sizes offered by the pagination control
    pub const PAGE_SIZE_OPTIONS: [u32; 3] = [10, 50, 100];

    /// Page size used when nothing else is configured
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    /// Search text shown on first login
    pub const DEFAULT_QUERY: &str = "the lord of the rings";

    /// Separator used when a list field is shown or exported as one cell
    pub const LIST_SEPARATOR: &str = ", ";
}

/// CSV export constants
pub mod export {
    /// Default export file name
    pub const FILE_NAME: &str = "books.csv";

    /// Header row of the exported file, in column order
    pub const HEADER: [&str; 7] = [
        "title",
        "author_name",
        "first_publish_year",
        "subject",
        "ratings_average",
        "author_birth_date",
        "author_top_work",
    ];
}

/// Logging constants
pub mod logging {
    /// Target used for the crate's log filter directive
    pub const TARGET: &str = "book_dashboard";

    /// Default log level
    pub const DEFAULT_LEVEL: &str = "info";
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file
    pub const LOCAL_FILE: &str = "book-dashboard.toml";

    /// Directory under the user config dir
    pub const APP_DIR: &str = "book-dashboard";

    /// File name inside [`APP_DIR`]
    pub const FILE_NAME: &str = "config.toml";
}

// Re-export commonly used constants at the top level
pub use http::USER_AGENT;
pub use table::{DEFAULT_PAGE_SIZE, DEFAULT_QUERY, PAGE_SIZE_OPTIONS};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_size_is_offered() {
        assert!(PAGE_SIZE_OPTIONS.contains(&DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn test_export_header_matches_file_format() {
        assert_eq!(
            export::HEADER.join(","),
            "title,author_name,first_publish_year,subject,ratings_average,author_birth_date,author_top_work"
        );
    }

    #[test]
    fn test_endpoints_are_https() {
        assert!(catalog::SEARCH_URL.starts_with("https://"));
        assert!(catalog::AUTHOR_URL.starts_with("https://"));
        assert!(!catalog::AUTHOR_URL.ends_with('/'));
    }
}
