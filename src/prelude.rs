//! Prelude module for the Book Dashboard library
//!
//! Re-exports the items most integrations need with a single
//! `use book_dashboard::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use book_dashboard::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let pipeline = EnrichmentPipeline::new(
//!         Arc::new(CatalogClient::new()?),
//!         AuthorFailurePolicy::default(),
//!     );
//!
//!     let mut dashboard = Dashboard::new(ViewState::default(), ExportOrder::default());
//!     dashboard.request_sort(SortColumn::FirstPublishYear);
//!     dashboard.refresh(&pipeline).await;
//!     write_csv_file(&dashboard.export_rows(), Path::new("books.csv"))?;
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

pub use crate::app::{
    // Catalog access
    Author,
    AuthorFailurePolicy,
    Book,
    CatalogApi,
    CatalogClient,
    ClientConfig,
    EnrichmentPipeline,

    // Session and view state
    Dashboard,
    DashboardDefaults,
    LoadOutcome,
    LoadRequest,
    LoadStatus,
    SessionGate,
    SessionState,
    Shell,

    // Table
    ExportOrder,
    ExportRow,
    PageSize,
    SortColumn,
    SortDirection,
    ViewState,
    sort_order,
    write_csv_file,
};

pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{DEFAULT_PAGE_SIZE, DEFAULT_QUERY, USER_AGENT};

pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;

pub use tokio;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        let _client_config = ClientConfig::default();
        let _config = AppConfig::default();
        let view = ViewState::default();

        assert_eq!(view.page_size, PageSize::default());
        assert_eq!(view.query, DEFAULT_QUERY);
        assert_eq!(PageSize::default().get(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_prelude_session_pattern() {
        let mut shell = Shell::new(DashboardDefaults::default());
        assert_eq!(shell.state(), SessionState::LoggedOut);

        let request = shell.login("nua-admin", "nua-log");
        assert!(request.is_some());
        assert_eq!(shell.state(), SessionState::LoggedIn);
        assert!(shell.dashboard().is_ok());
    }
}
