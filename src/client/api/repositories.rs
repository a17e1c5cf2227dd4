//! Repositories API trait

use async_trait::async_trait;

use crate::client::models::{ListResource, Repository};
use crate::client::params::OrgScope;
use crate::error::Result;

#[async_trait]
pub trait RepositoriesApi: Send + Sync {
    /// Public repositories of an organization.
    async fn search_repositories(&self, scope: &OrgScope) -> Result<ListResource<Repository>>;
}
