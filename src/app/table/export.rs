//! CSV export of the loaded result set
//!
//! Rows are a flat projection of the enriched books: list fields become one
//! `", "`-joined cell and missing values become empty cells.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::models::Book;
use crate::errors::{ExportError, ExportResult};

/// Row order used for export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportOrder {
    /// The order the search endpoint returned
    #[default]
    FetchOrder,
    /// The order currently shown on screen
    DisplayOrder,
}

/// One exported record; field order is the file's column order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub title: String,
    pub author_name: String,
    pub first_publish_year: Option<i32>,
    pub subject: String,
    pub ratings_average: Option<f64>,
    pub author_birth_date: Option<String>,
    pub author_top_work: Option<String>,
}

impl From<&Book> for ExportRow {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author_name: book.author_names_joined(),
            first_publish_year: book.first_publish_year,
            subject: book.subjects_joined(),
            ratings_average: book.ratings_average,
            author_birth_date: book.author_birth_date.clone(),
            author_top_work: book.author_top_work.clone(),
        }
    }
}

/// Write `rows` as CSV with a header line
pub fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> ExportResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    if rows.is_empty() {
        // serde only emits the header alongside the first record
        csv_writer.write_record(crate::constants::export::HEADER)?;
    }
    for row in rows {
        csv_writer.serialize(row)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Csv(e.into()))?;
    Ok(())
}

/// Write `rows` to a CSV file at `path`, replacing any existing file
pub fn write_csv_file(rows: &[ExportRow], path: &Path) -> ExportResult<()> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    write_csv(rows, file)?;
    tracing::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}
