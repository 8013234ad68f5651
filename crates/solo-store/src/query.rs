//! Job listing query builder.
//!
//! Composes the optional category filter, case-insensitive title search and
//! deadline sort into the filter/sort documents consumed by
//! [`JobRepository::get_all`](crate::JobRepository::get_all).

use bson::{doc, Document};

/// Sort direction over the job deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parse `asc`/`desc`; anything else means no sort was requested.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    /// MongoDB sort value.
    pub const fn order(&self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

/// Composed filter/search/sort parameters for the public job listing.
#[derive(Debug, Clone, Default)]
pub struct JobQuery {
    /// Exact-match category filter; `None` omits the filter entirely.
    pub category: Option<String>,
    /// Case-insensitive substring match against `title`. Empty or missing
    /// matches all titles, never none.
    pub search: Option<String>,
    /// Deadline ordering; `None` keeps storage's natural order.
    pub sort: Option<SortDirection>,
}

impl JobQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn sort(mut self, sort: SortDirection) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Build the filter document.
    pub fn filter(&self) -> Document {
        let mut filter = Document::new();
        if let Some(category) = &self.category {
            filter.insert("category", category.clone());
        }
        if let Some(search) = self.search.as_deref() {
            if !search.is_empty() {
                filter.insert("title", doc! {"$regex": search, "$options": "i"});
            }
        }
        filter
    }

    /// Build the sort document, if any ordering was requested.
    pub fn sort_doc(&self) -> Option<Document> {
        self.sort.map(|s| doc! {"deadline": s.order()})
    }
}
