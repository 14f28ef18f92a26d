//! Fetch options: pagination and ordering

use std::fmt;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pagination and ordering for a fetch.
///
/// A `limit` of 0 means unlimited, and `offset` is ignored without a limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub limit: u64,
    pub offset: u64,
    pub order: Option<(String, OrderDirection)>,
}

impl FetchOptions {
    /// No pagination, no ordering
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Ascending order on `column`
    pub fn order_by(self, column: impl Into<String>) -> Self {
        self.order(column, OrderDirection::Asc)
    }

    pub fn order_by_desc(self, column: impl Into<String>) -> Self {
        self.order(column, OrderDirection::Desc)
    }

    pub fn order(mut self, column: impl Into<String>, direction: OrderDirection) -> Self {
        self.order = Some((column.into(), direction));
        self
    }

    /// `LIMIT offset, limit`, or empty when unlimited
    pub fn limit_clause(&self) -> String {
        if self.limit == 0 {
            String::new()
        } else {
            format!("LIMIT {}, {}", self.offset, self.limit)
        }
    }
}
