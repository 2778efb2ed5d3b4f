//! Scripted in-memory catalog for unit tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::app::client::CatalogApi;
use crate::app::models::{Author, Book};
use crate::errors::{RemoteError, RemoteResult};

/// Catalog that serves canned pages and authors and records every call
#[derive(Default)]
pub struct ScriptedCatalog {
    pages: HashMap<(String, u32), Vec<Book>>,
    authors: HashMap<String, Author>,
    failing_authors: HashSet<String>,
    author_delays: HashMap<String, Duration>,
    search_delays: HashMap<u32, Duration>,
    pub search_calls: Mutex<Vec<(String, u32, u32)>>,
    pub author_calls: Mutex<Vec<String>>,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, query: &str, page: u32, books: Vec<Book>) -> Self {
        self.pages.insert((query.to_string(), page), books);
        self
    }

    pub fn with_author(mut self, id: &str, birth_date: &str, top_work: &str) -> Self {
        self.authors.insert(
            id.to_string(),
            Author {
                key: Some(format!("/authors/{}", id)),
                birth_date: Some(birth_date.to_string()),
                top_work: Some(top_work.to_string()),
                ..Default::default()
            },
        );
        self
    }

    pub fn failing_author(mut self, id: &str) -> Self {
        self.failing_authors.insert(id.to_string());
        self
    }

    pub fn delayed_author(mut self, id: &str, delay: Duration) -> Self {
        self.author_delays.insert(id.to_string(), delay);
        self
    }

    pub fn delayed_search(mut self, page: u32, delay: Duration) -> Self {
        self.search_delays.insert(page, delay);
        self
    }

    pub fn author_call_count(&self) -> usize {
        self.author_calls.lock().unwrap().len()
    }

    pub fn search_call_count(&self) -> usize {
        self.search_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CatalogApi for ScriptedCatalog {
    async fn search_books(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> RemoteResult<Vec<Book>> {
        self.search_calls
            .lock()
            .unwrap()
            .push((query.to_string(), page, page_size));

        if let Some(delay) = self.search_delays.get(&page) {
            tokio::time::sleep(*delay).await;
        }

        self.pages
            .get(&(query.to_string(), page))
            .cloned()
            .ok_or_else(|| RemoteError::Status {
                status: 404,
                url: format!("scripted://search?q={}&page={}", query, page),
            })
    }

    async fn get_author(&self, author_id: &str) -> RemoteResult<Author> {
        self.author_calls.lock().unwrap().push(author_id.to_string());

        if let Some(delay) = self.author_delays.get(author_id) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing_authors.contains(author_id) {
            return Err(RemoteError::Status {
                status: 503,
                url: format!("scripted://authors/{}.json", author_id),
            });
        }

        Ok(self.authors.get(author_id).cloned().unwrap_or_default())
    }
}

/// Book with a title, one author name and the given author ids
pub fn book(title: &str, author_keys: &[&str]) -> Book {
    Book {
        key: format!("/works/{}", title.replace(' ', "_")),
        title: title.to_string(),
        author_name: vec![format!("Author of {}", title)],
        author_key: author_keys.iter().map(|k| k.to_string()).collect(),
        ..Default::default()
    }
}
