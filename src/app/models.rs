//! Data models for the book dashboard
//!
//! This module defines the records decoded from the Open Library API and the
//! enrichment step that merges author metadata into a book.

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::table::LIST_SEPARATOR;

/// A single search result, optionally enriched with author metadata
///
/// Decoded straight from a `search.json` document. Missing or `null` list
/// fields become empty lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Opaque catalog key (e.g. "/works/OL27448W")
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    /// Book title
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Author display names
    #[serde(default, deserialize_with = "null_as_default")]
    pub author_name: Vec<String>,
    /// Year of first publication
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    /// Subject headings
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: Vec<String>,
    /// Average reader rating
    #[serde(default)]
    pub ratings_average: Option<f64>,
    /// Author identifiers, in the same order as `author_name`
    #[serde(default, deserialize_with = "null_as_default")]
    pub author_key: Vec<String>,
    /// Birth date of the first author (set by enrichment)
    #[serde(default)]
    pub author_birth_date: Option<String>,
    /// Best-known work of the first author (set by enrichment)
    #[serde(default)]
    pub author_top_work: Option<String>,
}

impl Book {
    /// Identifier of the author whose metadata enriches this book
    ///
    /// Only the first listed author is looked up; co-authors are ignored.
    pub fn primary_author_key(&self) -> Option<&str> {
        self.author_key
            .first()
            .map(String::as_str)
            .filter(|key| !key.is_empty())
    }

    /// Merge author metadata into this book
    ///
    /// Both enrichment fields are overwritten with the author's values, so
    /// applying the same author twice leaves the book unchanged.
    pub fn enrich(&mut self, author: &Author) {
        self.author_birth_date = author.birth_date.clone();
        self.author_top_work = author.top_work.clone();
    }

    /// Author names as a single cell
    pub fn author_names_joined(&self) -> String {
        self.author_name.join(LIST_SEPARATOR)
    }

    /// Subjects as a single cell
    pub fn subjects_joined(&self) -> String {
        self.subject.join(LIST_SEPARATOR)
    }
}

/// Author metadata from `/authors/{id}.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Author key as reported by the endpoint
    #[serde(default)]
    pub key: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form birth date (e.g. "3 January 1892")
    #[serde(default)]
    pub birth_date: Option<String>,
    /// Best-known work title
    #[serde(default)]
    pub top_work: Option<String>,
}

/// Envelope of a `search.json` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Result documents for the requested page
    #[serde(default, deserialize_with = "null_as_default")]
    pub docs: Vec<Book>,
    /// Upstream hit estimate; not reliable enough to drive pagination
    #[serde(default, rename = "numFound")]
    pub num_found: Option<u64>,
}

/// Treat an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
