//! Funding API trait

use async_trait::async_trait;

use crate::client::models::{IssueFunding, ListResource};
use crate::client::params::FundingSearch;
use crate::error::Result;

#[async_trait]
pub trait FundingApi: Send + Sync {
    /// Issues with their funding status.
    async fn search_funding(&self, params: &FundingSearch) -> Result<ListResource<IssueFunding>>;
}
