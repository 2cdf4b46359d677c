use serde::Serialize;

/// Upper bound on page size for any caller-supplied `per_page`
pub const MAX_PER_PAGE: i64 = 100;

/// One page of results plus the total row count.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        if self.per_page <= 0 {
            return 0;
        }
        self.total / self.per_page + i64::from(self.total % self.per_page != 0)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn metadata(&self) -> PaginationMetadata {
        PaginationMetadata {
            page: self.page,
            per_page: self.per_page,
            total_count: self.total,
            total_pages: self.total_pages(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationMetadata {
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

/// Clamp a requested 1-based page number and return (page, offset).
pub fn page_offset(page: Option<i64>, per_page: i64) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    (page, (page - 1).saturating_mul(per_page))
}
