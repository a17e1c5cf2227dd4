//! Integrations API trait

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait IntegrationsApi: Send + Sync {
    /// Re-sync organization membership from the source-control platform.
    async fn synchronize_members(&self, organization_id: &str) -> Result<()>;
}
