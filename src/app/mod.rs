//! Core application logic for the book dashboard
//!
//! This module contains the catalog HTTP client, data models, the session
//! gate, the enrichment pipeline and the table/dashboard state.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use book_dashboard::app::{
//!     AuthorFailurePolicy, CatalogClient, DashboardDefaults, EnrichmentPipeline, Shell,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = EnrichmentPipeline::new(
//!     Arc::new(CatalogClient::new()?),
//!     AuthorFailurePolicy::FailPage,
//! );
//!
//! let mut shell = Shell::new(DashboardDefaults::default());
//! if let Some(request) = shell.login("nua-admin", "nua-log") {
//!     let outcome = request.run(&pipeline).await;
//!     let dashboard = shell.dashboard_mut()?;
//!     dashboard.apply_outcome(outcome);
//!     for book in dashboard.displayed_rows() {
//!         println!("{}", book.title);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod dashboard;
pub mod enrichment;
pub mod models;
pub mod session;
pub mod shell;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main public API
pub use client::{CatalogApi, CatalogClient, ClientConfig};
pub use dashboard::{Dashboard, Generation, LoadOutcome, LoadRequest, LoadStatus};
pub use enrichment::{AuthorFailurePolicy, EnrichmentPipeline};
pub use models::{Author, Book, SearchResponse};
pub use session::{SessionGate, SessionState};
pub use shell::{DashboardDefaults, Shell};
pub use table::{
    sort_order, write_csv, write_csv_file, ExportOrder, ExportRow, PageSize, SortColumn,
    SortDirection, ViewState,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Ensure public API is accessible
        let config = ClientConfig::default();
        assert!(config.tcp_nodelay);
        assert_eq!(SortColumn::ALL.len(), 7);
        assert_eq!(SessionGate::new().state(), SessionState::LoggedOut);
    }
}
