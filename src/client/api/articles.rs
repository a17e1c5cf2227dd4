//! Articles API trait

use async_trait::async_trait;

use crate::client::models::{Article, ListResource};
use crate::client::params::ArticleSearch;
use crate::error::Result;

#[async_trait]
pub trait ArticlesApi: Send + Sync {
    /// Search posts published by an organization.
    async fn search_articles(&self, params: &ArticleSearch) -> Result<ListResource<Article>>;
}
