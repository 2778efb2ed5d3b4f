//! Tabular presentation state
//!
//! Column identifiers, sort direction, allowed page sizes and the view state
//! that drives which page is loaded and how it is ordered on screen.
//! Sorting here only ever reorders the rows already loaded for the current
//! page.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::app::models::Book;
use crate::constants::table::{DEFAULT_PAGE_SIZE, DEFAULT_QUERY, PAGE_SIZE_OPTIONS};

pub mod export;

pub use export::{write_csv, write_csv_file, ExportOrder, ExportRow};

/// Sortable table columns, in display order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    Title,
    AuthorName,
    FirstPublishYear,
    Subject,
    RatingsAverage,
    AuthorBirthDate,
    AuthorTopWork,
}

impl SortColumn {
    /// All columns in display order
    pub const ALL: [SortColumn; 7] = [
        Self::Title,
        Self::AuthorName,
        Self::FirstPublishYear,
        Self::Subject,
        Self::RatingsAverage,
        Self::AuthorBirthDate,
        Self::AuthorTopWork,
    ];

    /// Field identifier, as used in the export header
    pub fn id(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::AuthorName => "author_name",
            Self::FirstPublishYear => "first_publish_year",
            Self::Subject => "subject",
            Self::RatingsAverage => "ratings_average",
            Self::AuthorBirthDate => "author_birth_date",
            Self::AuthorTopWork => "author_top_work",
        }
    }

    /// Column heading
    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::AuthorName => "Author Name",
            Self::FirstPublishYear => "First Publish Year",
            Self::Subject => "Subject",
            Self::RatingsAverage => "Ratings Average",
            Self::AuthorBirthDate => "Author Birth Date",
            Self::AuthorTopWork => "Author Top Work",
        }
    }

    /// Text shown in this column's cell for `book`
    pub fn cell(&self, book: &Book) -> String {
        match self {
            Self::Title => book.title.clone(),
            Self::AuthorName => book.author_names_joined(),
            Self::FirstPublishYear => book
                .first_publish_year
                .map(|y| y.to_string())
                .unwrap_or_default(),
            Self::Subject => book.subjects_joined(),
            Self::RatingsAverage => book
                .ratings_average
                .map(|r| r.to_string())
                .unwrap_or_default(),
            Self::AuthorBirthDate => book.author_birth_date.clone().unwrap_or_default(),
            Self::AuthorTopWork => book.author_top_work.clone().unwrap_or_default(),
        }
    }

    /// Compare two books on this column, ascending
    ///
    /// Returns `None` when either side has no value; see [`sort_order`].
    fn compare(&self, a: &Book, b: &Book) -> Option<Ordering> {
        match self {
            Self::FirstPublishYear => Some(a.first_publish_year?.cmp(&b.first_publish_year?)),
            Self::RatingsAverage => Some(a.ratings_average?.total_cmp(&b.ratings_average?)),
            Self::AuthorBirthDate => Some(
                a.author_birth_date
                    .as_ref()?
                    .cmp(b.author_birth_date.as_ref()?),
            ),
            Self::AuthorTopWork => Some(a.author_top_work.as_ref()?.cmp(b.author_top_work.as_ref()?)),
            Self::Title | Self::AuthorName | Self::Subject => {
                Some(self.cell(a).cmp(&self.cell(b)))
            }
        }
    }

    /// Whether `book` has a value in this column
    fn has_value(&self, book: &Book) -> bool {
        match self {
            Self::FirstPublishYear => book.first_publish_year.is_some(),
            Self::RatingsAverage => book.ratings_average.is_some(),
            Self::AuthorBirthDate => book.author_birth_date.is_some(),
            Self::AuthorTopWork => book.author_top_work.is_some(),
            Self::Title => !book.title.is_empty(),
            Self::AuthorName => !book.author_name.is_empty(),
            Self::Subject => !book.subject.is_empty(),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|column| column.id() == s)
            .ok_or_else(|| {
                let ids: Vec<&str> = Self::ALL.iter().map(|c| c.id()).collect();
                format!("unknown column '{}' (expected one of: {})", s, ids.join(", "))
            })
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// The other direction
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Arrow shown next to the active column heading
    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// A page size from the allowed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    /// Number of rows per page
    pub fn get(&self) -> u32 {
        self.0
    }

    /// The next allowed size, wrapping around
    pub fn next(&self) -> Self {
        let index = PAGE_SIZE_OPTIONS
            .iter()
            .position(|&size| size == self.0)
            .unwrap_or(0);
        Self(PAGE_SIZE_OPTIONS[(index + 1) % PAGE_SIZE_OPTIONS.len()])
    }

    /// All allowed sizes
    pub fn options() -> impl Iterator<Item = PageSize> {
        PAGE_SIZE_OPTIONS.into_iter().map(PageSize)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = String;

    fn try_from(size: u32) -> Result<Self, Self::Error> {
        Self::options()
            .find(|option| option.0 == size)
            .ok_or_else(|| format!("page size {} is not one of {:?}", size, PAGE_SIZE_OPTIONS))
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything that decides what the table shows
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Zero-based page number
    pub page: u32,
    /// Rows per page
    pub page_size: PageSize,
    /// Active sort column
    pub sort_column: SortColumn,
    /// Active sort direction
    pub sort_direction: SortDirection,
    /// Current search text
    pub query: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::with_defaults(DEFAULT_QUERY, PageSize::default())
    }
}

impl ViewState {
    /// First page sorted by title ascending, with the given query and size
    pub fn with_defaults(query: impl Into<String>, page_size: PageSize) -> Self {
        Self {
            page: 0,
            page_size,
            sort_column: SortColumn::default(),
            sort_direction: SortDirection::default(),
            query: query.into(),
        }
    }

    /// 1-based page number for the search endpoint
    pub fn api_page(&self) -> u32 {
        self.page.saturating_add(1)
    }
}

/// Stable display order of `rows` for the given column and direction
///
/// Returns indices into `rows`. Rows with equal keys keep their fetched
/// order. Rows missing a value for the column always come last, whatever
/// the direction.
pub fn sort_order(rows: &[Book], column: SortColumn, direction: SortDirection) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&i, &j| {
        let (a, b) = (&rows[i], &rows[j]);
        match (column.has_value(a), column.has_value(b)) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
            (true, true) => {
                let ordering = column.compare(a, b).unwrap_or(Ordering::Equal);
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            }
        }
    });
    order
}
