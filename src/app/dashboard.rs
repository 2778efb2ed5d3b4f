//! Dashboard state and load coordination
//!
//! [`Dashboard`] owns the view state and the currently loaded page. Every
//! change to the query, page or page size issues a [`LoadRequest`] tagged
//! with a fresh generation id; [`Dashboard::apply`] only accepts the outcome
//! of the latest generation, so overlapping loads settle deterministically
//! no matter which response arrives first.
//!
//! Sorting never issues a request: it reorders the loaded rows in memory.

use chrono::{DateTime, Local};

use crate::app::enrichment::EnrichmentPipeline;
use crate::app::models::Book;
use crate::app::table::{
    sort_order, ExportOrder, ExportRow, PageSize, SortColumn, SortDirection, ViewState,
};
use crate::errors::RemoteResult;

/// Monotonic id of a load request
pub type Generation = u64;

/// A page load to run off the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Id to hand back to [`Dashboard::apply`]
    pub generation: Generation,
    /// Search text
    pub query: String,
    /// 1-based API page
    pub page: u32,
    /// Rows per page
    pub page_size: u32,
}

impl LoadRequest {
    /// Run the request through `pipeline`
    pub async fn run(self, pipeline: &EnrichmentPipeline) -> LoadOutcome {
        let result = pipeline
            .load_page(&self.query, self.page, self.page_size)
            .await;
        LoadOutcome {
            generation: self.generation,
            result,
        }
    }
}

/// Result of a [`LoadRequest`], tagged with its generation
#[derive(Debug)]
pub struct LoadOutcome {
    pub generation: Generation,
    pub result: RemoteResult<Vec<Book>>,
}

/// What the status line shows
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting for the given generation
    Loading { generation: Generation },
    /// Latest load succeeded
    Loaded { at: DateTime<Local>, rows: usize },
    /// Latest load failed; the table is empty
    Failed { message: String },
}

/// View state plus the currently loaded page
#[derive(Debug, Clone)]
pub struct Dashboard {
    view: ViewState,
    rows: Vec<Book>,
    display_order: Vec<usize>,
    status: LoadStatus,
    generation: Generation,
    export_order: ExportOrder,
    /// Page and size of the latest request
    requested: (u32, PageSize),
    /// Page and size the loaded rows belong to
    shown: (u32, PageSize),
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(ViewState::default(), ExportOrder::default())
    }
}

impl Dashboard {
    /// Creates an empty dashboard; call [`Dashboard::reload`] to load
    pub fn new(view: ViewState, export_order: ExportOrder) -> Self {
        let page = (view.page, view.page_size);
        Self {
            view,
            rows: Vec::new(),
            display_order: Vec::new(),
            status: LoadStatus::Idle,
            generation: 0,
            export_order,
            requested: page,
            shown: page,
        }
    }

    /// Number new loads after `generation`
    ///
    /// Outcomes of an earlier dashboard can then never match a request
    /// issued by this one.
    pub fn with_generation(mut self, generation: Generation) -> Self {
        self.generation = generation;
        self
    }

    /// Current view state
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Current load status
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Whether a load is outstanding
    pub fn is_loading(&self) -> bool {
        matches!(self.status, LoadStatus::Loading { .. })
    }

    /// Latest generation issued
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Request the current view state again
    pub fn reload(&mut self) -> LoadRequest {
        self.generation += 1;
        self.requested = (self.view.page, self.view.page_size);
        self.status = LoadStatus::Loading {
            generation: self.generation,
        };
        tracing::debug!(
            "Issuing load generation {} ('{}', page {}, size {})",
            self.generation,
            self.view.query,
            self.view.api_page(),
            self.view.page_size
        );

        LoadRequest {
            generation: self.generation,
            query: self.view.query.clone(),
            page: self.view.api_page(),
            page_size: self.view.page_size.get(),
        }
    }

    /// Change the search text and go back to the first page
    pub fn set_query(&mut self, query: impl Into<String>) -> LoadRequest {
        self.view.query = query.into();
        self.view.page = 0;
        self.reload()
    }

    /// Go to a zero-based page
    ///
    /// The total number of pages is unknown, so any page is accepted.
    pub fn set_page(&mut self, page: u32) -> LoadRequest {
        self.view.page = page;
        self.reload()
    }

    /// Go forward one page
    pub fn next_page(&mut self) -> LoadRequest {
        self.set_page(self.view.page.saturating_add(1))
    }

    /// Go back one page; `None` on the first page
    pub fn previous_page(&mut self) -> Option<LoadRequest> {
        let page = self.view.page.checked_sub(1)?;
        Some(self.set_page(page))
    }

    /// Change the page size and go back to the first page
    pub fn set_page_size(&mut self, page_size: PageSize) -> LoadRequest {
        self.view.page_size = page_size;
        self.view.page = 0;
        self.reload()
    }

    /// Sort the loaded rows; never triggers a load
    pub fn set_sort(&mut self, column: SortColumn, direction: SortDirection) {
        self.view.sort_column = column;
        self.view.sort_direction = direction;
        self.resort();
    }

    /// Header-click behaviour: flip direction on the active column, otherwise
    /// sort the new column ascending
    pub fn request_sort(&mut self, column: SortColumn) {
        let direction = if self.view.sort_column == column {
            self.view.sort_direction.flipped()
        } else {
            SortDirection::Ascending
        };
        self.set_sort(column, direction);
    }

    /// Install the outcome of a load
    ///
    /// Returns `false` and changes nothing if `generation` is not the latest
    /// one issued. A failed load clears the table and records the error.
    pub fn apply(&mut self, generation: Generation, result: RemoteResult<Vec<Book>>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                "Discarding stale load generation {} (latest is {})",
                generation,
                self.generation
            );
            return false;
        }

        self.shown = self.requested;
        match result {
            Ok(rows) => {
                self.status = LoadStatus::Loaded {
                    at: Local::now(),
                    rows: rows.len(),
                };
                self.rows = rows;
            }
            Err(e) => {
                tracing::error!("Page load failed: {}", e);
                self.status = LoadStatus::Failed {
                    message: e.to_string(),
                };
                self.rows.clear();
            }
        }
        self.resort();
        true
    }

    /// [`Dashboard::apply`] for a [`LoadOutcome`]
    pub fn apply_outcome(&mut self, outcome: LoadOutcome) -> bool {
        self.apply(outcome.generation, outcome.result)
    }

    /// Reload the current view and wait for it
    pub async fn refresh(&mut self, pipeline: &EnrichmentPipeline) -> bool {
        let outcome = self.reload().run(pipeline).await;
        self.apply_outcome(outcome)
    }

    /// Loaded rows in fetch order
    pub fn rows(&self) -> &[Book] {
        &self.rows
    }

    /// Loaded rows in display order
    pub fn displayed_rows(&self) -> impl Iterator<Item = &Book> + '_ {
        self.display_order.iter().map(move |&i| &self.rows[i])
    }

    /// Export projection of the loaded rows
    pub fn export_rows(&self) -> Vec<ExportRow> {
        match self.export_order {
            ExportOrder::FetchOrder => self.rows.iter().map(ExportRow::from).collect(),
            ExportOrder::DisplayOrder => self.displayed_rows().map(ExportRow::from).collect(),
        }
    }

    /// Pagination caption for the loaded rows; the total is never known
    ///
    /// e.g. `"11–20 of more than 20"`, or `"0–0 of 0"` for an empty first page.
    /// While a load is outstanding it still describes the rows on screen.
    pub fn range_label(&self) -> String {
        let (page, page_size) = self.shown;
        let size = page_size.get() as u64;
        let from = page as u64 * size;
        let shown = self.rows.len() as u64;

        if shown == 0 {
            return format!("{}–{} of {}", from, from, from);
        }
        let to = from + shown;
        if shown < size {
            format!("{}–{} of {}", from + 1, to, to)
        } else {
            format!("{}–{} of more than {}", from + 1, to, to)
        }
    }

    fn resort(&mut self) {
        self.display_order = sort_order(
            &self.rows,
            self.view.sort_column,
            self.view.sort_direction,
        );
    }
}
