//! Result enrichment pipeline
//!
//! Loads one page of search results and merges the first author's birth
//! date and best-known work into each book. Author lookups for a page run
//! concurrently; the page is ready once every lookup has settled, and rows
//! keep the order the search endpoint returned them in.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::app::client::CatalogApi;
use crate::app::models::Book;
use crate::errors::{RemoteError, RemoteResult};

/// What to do when one author lookup fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorFailurePolicy {
    /// Fail the whole page with the lookup error
    #[default]
    FailPage,
    /// Leave that book's author fields unset and keep going
    Degrade,
}

impl fmt::Display for AuthorFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailPage => write!(f, "fail_page"),
            Self::Degrade => write!(f, "degrade"),
        }
    }
}

impl FromStr for AuthorFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail_page" => Ok(Self::FailPage),
            "degrade" => Ok(Self::Degrade),
            other => Err(format!(
                "unknown author failure policy '{}' (expected fail_page or degrade)",
                other
            )),
        }
    }
}

/// Search-then-enrich pipeline over a [`CatalogApi`]
#[derive(Clone)]
pub struct EnrichmentPipeline {
    api: Arc<dyn CatalogApi>,
    policy: AuthorFailurePolicy,
}

impl fmt::Debug for EnrichmentPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichmentPipeline")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl EnrichmentPipeline {
    /// Creates a pipeline over `api`
    pub fn new(api: Arc<dyn CatalogApi>, policy: AuthorFailurePolicy) -> Self {
        Self { api, policy }
    }

    /// Active failure policy
    pub fn policy(&self) -> AuthorFailurePolicy {
        self.policy
    }

    /// Load and enrich one page
    ///
    /// `page` is the 1-based API page. At most `page_size` rows are returned.
    ///
    /// # Errors
    ///
    /// Returns the search error, or under [`AuthorFailurePolicy::FailPage`]
    /// the first failed author lookup in row order.
    pub async fn load_page(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> RemoteResult<Vec<Book>> {
        let mut books = self.api.search_books(query, page, page_size).await?;

        let limit = page_size as usize;
        if books.len() > limit {
            tracing::warn!(
                "Search returned {} rows for page size {}, truncating",
                books.len(),
                limit
            );
            books.truncate(limit);
        }

        let books = self.enrich_all(books).await?;

        tracing::info!(
            "Loaded '{}' page {} ({} rows, page size {})",
            query,
            page,
            books.len(),
            page_size
        );

        Ok(books)
    }

    /// Enrich every book that has an author id, preserving order
    pub async fn enrich_all(&self, books: Vec<Book>) -> RemoteResult<Vec<Book>> {
        let lookups = books.into_iter().map(|book| self.enrich_one(book));
        let settled = join_all(lookups).await;

        let mut enriched = Vec::with_capacity(settled.len());
        for (book, lookup) in settled {
            match lookup {
                Ok(()) => enriched.push(book),
                Err(e) => match self.policy {
                    AuthorFailurePolicy::FailPage => return Err(e),
                    AuthorFailurePolicy::Degrade => {
                        tracing::warn!(
                            "Author lookup failed for '{}', leaving author fields empty: {}",
                            book.title,
                            e
                        );
                        enriched.push(book);
                    }
                },
            }
        }

        Ok(enriched)
    }

    /// Look up the first author of `book` and merge the result
    ///
    /// The book is handed back either way so the caller decides what a
    /// failure means. On failure its author fields are left untouched.
    async fn enrich_one(&self, mut book: Book) -> (Book, Result<(), RemoteError>) {
        let Some(author_id) = book.primary_author_key().map(str::to_owned) else {
            return (book, Ok(()));
        };

        match self.api.get_author(&author_id).await {
            Ok(author) => {
                book.enrich(&author);
                (book, Ok(()))
            }
            Err(e) => (book, Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::app::testing::{book, ScriptedCatalog};
    use pretty_assertions::assert_eq;

    fn pipeline(catalog: ScriptedCatalog, policy: AuthorFailurePolicy) -> (EnrichmentPipeline, Arc<ScriptedCatalog>) {
        let catalog = Arc::new(catalog);
        (EnrichmentPipeline::new(catalog.clone(), policy), catalog)
    }

    fn titles(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_enriches_first_author_only() {
        let catalog = ScriptedCatalog::new()
            .with_page("tolkien", 1, vec![book("Good Omens", &["OL1A", "OL2A"])])
            .with_author("OL1A", "28 April 1948", "Discworld")
            .with_author("OL2A", "10 November 1960", "American Gods");
        let (pipeline, catalog) = pipeline(catalog, AuthorFailurePolicy::FailPage);

        let books = pipeline.load_page("tolkien", 1, 10).await.unwrap();

        assert_eq!(books[0].author_birth_date.as_deref(), Some("28 April 1948"));
        assert_eq!(books[0].author_top_work.as_deref(), Some("Discworld"));
        assert_eq!(*catalog.author_calls.lock().unwrap(), vec!["OL1A".to_string()]);
    }

    #[tokio::test]
    async fn test_book_without_author_is_not_looked_up() {
        let catalog = ScriptedCatalog::new()
            .with_page("anon", 1, vec![book("Beowulf", &[]), book("The Hobbit", &["OL26320A"])])
            .with_author("OL26320A", "3 January 1892", "The Hobbit");
        let (pipeline, catalog) = pipeline(catalog, AuthorFailurePolicy::FailPage);

        let books = pipeline.load_page("anon", 1, 10).await.unwrap();

        assert_eq!(books[0].author_birth_date, None);
        assert_eq!(books[0].author_top_work, None);
        assert_eq!(books[1].author_birth_date.as_deref(), Some("3 January 1892"));
        assert_eq!(catalog.author_call_count(), 1);
    }

    #[tokio::test]
    async fn test_order_preserved_under_uneven_latency() {
        let catalog = ScriptedCatalog::new()
            .with_page(
                "q",
                1,
                vec![book("slow", &["A1"]), book("fast", &["A2"]), book("medium", &["A3"])],
            )
            .with_author("A1", "1900", "S")
            .with_author("A2", "1910", "F")
            .with_author("A3", "1920", "M")
            .delayed_author("A1", Duration::from_millis(80))
            .delayed_author("A3", Duration::from_millis(30));
        let (pipeline, _) = pipeline(catalog, AuthorFailurePolicy::FailPage);

        let books = pipeline.load_page("q", 1, 10).await.unwrap();

        assert_eq!(titles(&books), vec!["slow", "fast", "medium"]);
        assert_eq!(books[0].author_top_work.as_deref(), Some("S"));
        assert_eq!(books[2].author_top_work.as_deref(), Some("M"));
    }

    #[tokio::test]
    async fn test_lookups_run_concurrently() {
        let ids: Vec<String> = (0..5).map(|i| format!("A{}", i)).collect();
        let mut catalog = ScriptedCatalog::new().with_page(
            "q",
            1,
            ids.iter().map(|id| book(id, &[id.as_str()])).collect(),
        );
        for id in &ids {
            catalog = catalog.delayed_author(id, Duration::from_millis(100));
        }
        let (pipeline, _) = pipeline(catalog, AuthorFailurePolicy::FailPage);

        let started = std::time::Instant::now();
        let books = pipeline.load_page("q", 1, 10).await.unwrap();

        assert_eq!(books.len(), 5);
        // Sequential lookups would take at least 500ms
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_fail_page_policy() {
        let catalog = ScriptedCatalog::new()
            .with_page("q", 1, vec![book("ok", &["A1"]), book("broken", &["A2"])])
            .with_author("A1", "1900", "W")
            .failing_author("A2");
        let (pipeline, catalog) = pipeline(catalog, AuthorFailurePolicy::FailPage);

        let result = pipeline.load_page("q", 1, 10).await;

        assert!(matches!(result, Err(RemoteError::Status { status: 503, .. })));
        // Every lookup still ran before the page failed
        assert_eq!(catalog.author_call_count(), 2);
    }

    #[tokio::test]
    async fn test_degrade_policy() {
        let catalog = ScriptedCatalog::new()
            .with_page("q", 1, vec![book("ok", &["A1"]), book("broken", &["A2"])])
            .with_author("A1", "1900", "W")
            .failing_author("A2");
        let (pipeline, _) = pipeline(catalog, AuthorFailurePolicy::Degrade);

        let books = pipeline.load_page("q", 1, 10).await.unwrap();

        assert_eq!(titles(&books), vec!["ok", "broken"]);
        assert_eq!(books[0].author_top_work.as_deref(), Some("W"));
        assert_eq!(books[1].author_birth_date, None);
        assert_eq!(books[1].author_top_work, None);
    }

    #[tokio::test]
    async fn test_search_failure_propagates() {
        let (pipeline, catalog) = pipeline(ScriptedCatalog::new(), AuthorFailurePolicy::Degrade);

        let result = pipeline.load_page("missing", 1, 10).await;

        assert!(result.is_err());
        assert_eq!(catalog.author_call_count(), 0);
    }

    #[tokio::test]
    async fn test_rows_never_exceed_page_size() {
        let rows: Vec<Book> = (0..15).map(|i| book(&format!("b{}", i), &[])).collect();
        let catalog = ScriptedCatalog::new().with_page("q", 1, rows);
        let (pipeline, _) = pipeline(catalog, AuthorFailurePolicy::FailPage);

        let books = pipeline.load_page("q", 1, 10).await.unwrap();

        assert_eq!(books.len(), 10);
        assert_eq!(books[9].title, "b9");
    }

    #[tokio::test]
    async fn test_re_enrichment_is_idempotent() {
        let catalog = ScriptedCatalog::new()
            .with_page("q", 1, vec![book("one", &["A1"]), book("two", &[])])
            .with_author("A1", "1900", "W");
        let (pipeline, _) = pipeline(catalog, AuthorFailurePolicy::FailPage);

        let once = pipeline.load_page("q", 1, 10).await.unwrap();
        let twice = pipeline.enrich_all(once.clone()).await.unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("degrade".parse::<AuthorFailurePolicy>().unwrap(), AuthorFailurePolicy::Degrade);
        assert_eq!(
            "fail_page".parse::<AuthorFailurePolicy>().unwrap(),
            AuthorFailurePolicy::FailPage
        );
        assert!("skip".parse::<AuthorFailurePolicy>().is_err());
        assert_eq!(AuthorFailurePolicy::default().to_string(), "fail_page");
    }
}
