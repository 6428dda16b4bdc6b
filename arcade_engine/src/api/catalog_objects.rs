use nas_common::Money;
use serde::{Deserialize, Serialize};

const MAX_PAGE_SIZE: i64 = 50;
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Filter criteria for catalog searches. All fields are optional; an empty filter returns the first page of the
/// whole catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameQueryFilter {
    /// Case-insensitive substring match against the title.
    pub search_term: Option<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub available_only: Option<bool>,
    /// 1-based page number. Values below 1 are treated as 1.
    pub page: Option<i64>,
    /// Capped at 50.
    pub page_size: Option<i64>,
}

impl GameQueryFilter {
    pub fn with_search_term<S: Into<String>>(mut self, term: S) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn with_min_price(mut self, price: Money) -> Self {
        self.min_price = Some(price);
        self
    }

    pub fn with_max_price(mut self, price: Money) -> Self {
        self.max_price = Some(price);
        self
    }

    pub fn available_only(mut self) -> Self {
        self.available_only = Some(true);
        self
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search_term.is_none() && self.min_price.is_none() && self.max_price.is_none() && self.available_only.is_none()
    }

    pub fn limit(&self) -> i64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page.unwrap_or(1).max(1) - 1) * self.limit()
    }
}
