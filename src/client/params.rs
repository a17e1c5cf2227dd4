//! Search parameters for Polar list endpoints
//!
//! Every public search endpoint is scoped to an organization by
//! `platform` + `organization_name`; the builders below add the
//! endpoint-specific filters on top.

use super::models::{ListFundingSortBy, Platforms};

/// Organization scope shared by all public search endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrgScope {
    pub platform: Platforms,
    pub organization_name: String,
}

impl OrgScope {
    /// Scope to an organization on the default platform.
    pub fn new(organization_name: impl Into<String>) -> Self {
        Self {
            platform: Platforms::default(),
            organization_name: organization_name.into(),
        }
    }

    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("platform", self.platform.as_str().to_string()),
            ("organization_name", self.organization_name.clone()),
        ]
    }
}

/// Filters for `articles/search`.
///
/// # Example
/// ```ignore
/// let params = ArticleSearch::new(OrgScope::new("acme")).pinned(true).limit(3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSearch {
    pub scope: OrgScope,
    pub is_pinned: Option<bool>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl ArticleSearch {
    pub fn new(scope: OrgScope) -> Self {
        Self {
            scope,
            is_pinned: None,
            limit: None,
            page: None,
        }
    }

    pub fn pinned(mut self, is_pinned: bool) -> Self {
        self.is_pinned = Some(is_pinned);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[allow(dead_code)]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.scope.to_query_params();

        if let Some(pinned) = self.is_pinned {
            params.push(("is_pinned", pinned.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }

        params
    }
}

/// Filters for `funding/search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingSearch {
    pub scope: OrgScope,
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub closed: Option<bool>,
    pub sorting: Vec<ListFundingSortBy>,
}

impl FundingSearch {
    pub fn new(scope: OrgScope) -> Self {
        Self {
            scope,
            limit: None,
            page: None,
            closed: None,
            sorting: Vec::new(),
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = Some(closed);
        self
    }

    /// Sort keys, applied in order of precedence.
    pub fn sorting(mut self, sorting: impl IntoIterator<Item = ListFundingSortBy>) -> Self {
        self.sorting = sorting.into_iter().collect();
        self
    }

    /// Sorting is sent as a repeated `sorting` parameter.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.scope.to_query_params();

        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(closed) = self.closed {
            params.push(("closed", closed.to_string()));
        }
        for sort in &self.sorting {
            params.push(("sorting", sort.as_str().to_string()));
        }

        params
    }
}
