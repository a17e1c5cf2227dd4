//! Paginated list envelope shared by every `search`/`list` endpoint

use serde::{Deserialize, Serialize};

/// Pagination block returned alongside list items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub max_page: u64,
}

/// `ListResource[T]` from the Polar API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResource<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

impl<T> Default for ListResource<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
        }
    }
}

#[cfg(test)]
impl<T> ListResource<T> {
    /// Single-page list, as the API returns for short results
    pub fn new(items: Vec<T>) -> Self {
        let total_count = items.len() as u64;
        Self {
            items,
            pagination: Pagination {
                total_count,
                max_page: 1,
            },
        }
    }
}
