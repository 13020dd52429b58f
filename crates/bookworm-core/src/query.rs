//! Catalog query builder
//!
//! Builds the `filterOn`/`filterQuery`/`sortBy`/`isAscending`/`pageSize`/
//! `pageNumber` query parameters the list endpoints accept. The API takes a
//! single filter pair, so a query holds at most one filter: setting a filter
//! on another field replaces the current one.

use crate::models::{BorrowingStatus, Genre};

/// Fields the API can filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Title,
    Genre,
    Name,
    Status,
}

impl FilterField {
    /// Wire name sent as `filterOn`
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Title => "title",
            FilterField::Genre => "bookGenre",
            FilterField::Name => "name",
            FilterField::Status => "status",
        }
    }
}

impl std::fmt::Display for FilterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FilterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "title" => Ok(FilterField::Title),
            "genre" | "bookgenre" => Ok(FilterField::Genre),
            "name" => Ok(FilterField::Name),
            "status" => Ok(FilterField::Status),
            _ => Err(format!("Unknown filter field: {}", s)),
        }
    }
}

/// Fields the API can sort on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Title,
    CreatedAt,
    Credit,
    Name,
}

impl SortField {
    /// Wire name sent as `sortBy`
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::CreatedAt => "createdAt",
            SortField::Credit => "credit",
            SortField::Name => "name",
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "title" => Ok(SortField::Title),
            "createdat" | "created" => Ok(SortField::CreatedAt),
            "credit" => Ok(SortField::Credit),
            "name" => Ok(SortField::Name),
            _ => Err(format!("Unknown sort field: {}", s)),
        }
    }
}

/// Parameters for a list endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    filter: Option<(FilterField, String)>,
    sort: Option<(SortField, bool)>,
    page_size: Option<u32>,
    page_number: Option<u32>,
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Presets ──────────────────────────────────────────────

    /// Catalog page: everything on one page, by title
    pub fn books() -> Self {
        Self::new().with_page_size(100).sorted_by(SortField::Title, true)
    }

    pub fn authors() -> Self {
        Self::new().with_page_size(100)
    }

    pub fn publishers() -> Self {
        Self::new().with_page_size(100)
    }

    pub fn borrowings() -> Self {
        Self::new()
    }

    /// Dashboard: five newest books
    pub fn recent_books() -> Self {
        Self::new().with_page_size(5).sorted_by(SortField::CreatedAt, false)
    }

    /// Dashboard: first five authors or publishers
    pub fn recent_people() -> Self {
        Self::new().with_page_size(5)
    }

    pub fn recent_borrowings() -> Self {
        Self::new().with_page_size(5)
    }

    // ── Builders ─────────────────────────────────────────────

    /// Filter on `field`, replacing any existing filter.
    pub fn filtered(mut self, field: FilterField, text: impl Into<String>) -> Self {
        self.set_filter(field, text);
        self
    }

    pub fn with_genre(self, genre: Genre) -> Self {
        self.filtered(FilterField::Genre, genre.as_str())
    }

    pub fn with_status(self, status: BorrowingStatus) -> Self {
        self.filtered(FilterField::Status, status.as_str())
    }

    pub fn sorted_by(mut self, field: SortField, ascending: bool) -> Self {
        self.sort = Some((field, ascending));
        self
    }

    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn with_page(mut self, number: u32) -> Self {
        self.page_number = Some(number);
        self
    }

    // ── Mutation ─────────────────────────────────────────────

    /// Blank text clears the filter, whatever field it names.
    pub fn set_filter(&mut self, field: FilterField, text: impl Into<String>) {
        let text = text.into();
        let text = text.trim();
        if text.is_empty() {
            self.filter = None;
        } else {
            self.filter = Some((field, text.to_string()));
        }
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
    }

    // ── Readers ──────────────────────────────────────────────

    pub fn active_filter(&self) -> Option<(FilterField, &str)> {
        self.filter.as_ref().map(|(field, text)| (*field, text.as_str()))
    }

    pub fn sort(&self) -> Option<(SortField, bool)> {
        self.sort
    }

    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    pub fn page_number(&self) -> Option<u32> {
        self.page_number
    }

    /// Query-string pairs with the API's parameter names
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some((field, text)) = &self.filter {
            params.push(("filterOn".to_string(), field.as_str().to_string()));
            params.push(("filterQuery".to_string(), text.clone()));
        }
        if let Some((field, ascending)) = self.sort {
            params.push(("sortBy".to_string(), field.as_str().to_string()));
            params.push(("isAscending".to_string(), ascending.to_string()));
        }
        if let Some(size) = self.page_size {
            params.push(("pageSize".to_string(), size.to_string()));
        }
        if let Some(number) = self.page_number {
            params.push(("pageNumber".to_string(), number.to_string()));
        }
        params
    }
}
