//! Offset pagination shared by every list endpoint.

use serde::Serialize;

/// A normalized page request: `page >= 1`, `1 <= page_size <= MAX_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u32 = 10;
    pub const MAX_SIZE: u32 = 100;

    /// Normalize optional caller input.
    #[must_use]
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(Self::DEFAULT_SIZE)
                .clamp(1, Self::MAX_SIZE),
        }
    }

    #[must_use]
    pub fn page(self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn limit(self) -> i64 {
        i64::from(self.page_size)
    }

    #[must_use]
    pub fn offset(self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results together with the unpaged total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paged<T> {
    pub total: i64,
    pub list: Vec<T>,
}

impl<T> Paged<T> {
    #[must_use]
    pub fn new(total: i64, list: Vec<T>) -> Self {
        Self { total, list }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(0, Vec::new())
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            total: self.total,
            list: self.list.into_iter().map(f).collect(),
        }
    }
}
