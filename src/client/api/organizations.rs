//! Organizations API trait

use async_trait::async_trait;

use crate::client::models::{
    CreditBalance, ListResource, Organization, OrganizationBadgeSettingsRead,
    OrganizationBadgeSettingsUpdate, OrganizationMember, OrganizationUpdate, Platforms,
};
use crate::error::Result;

/// Organization operations for the Polar API
#[async_trait]
pub trait OrganizationsApi: Send + Sync {
    // ========================================================================
    // Read Operations
    // ========================================================================

    /// Resolve an organization by its platform handle.
    ///
    /// Returns `ApiError::NotFound` when no such organization is known to Polar.
    async fn lookup_organization(&self, platform: Platforms, name: &str) -> Result<Organization>;

    /// List organizations visible to the current user.
    ///
    /// With `is_admin_only` only organizations the user administers are returned.
    async fn list_organizations(&self, is_admin_only: bool) -> Result<ListResource<Organization>>;

    /// Get an organization by ID.
    async fn get_organization(&self, id: &str) -> Result<Organization>;

    async fn list_organization_members(&self, id: &str)
    -> Result<ListResource<OrganizationMember>>;

    async fn get_badge_settings(&self, id: &str) -> Result<OrganizationBadgeSettingsRead>;

    /// Prepaid credit balance. Served by the billing backend, which can be
    /// briefly unavailable.
    async fn get_organization_credits(&self, id: &str) -> Result<CreditBalance>;

    // ========================================================================
    // Write Operations
    // ========================================================================

    async fn update_organization(
        &self,
        id: &str,
        update: &OrganizationUpdate,
    ) -> Result<Organization>;

    async fn update_badge_settings(
        &self,
        id: &str,
        settings: &OrganizationBadgeSettingsUpdate,
    ) -> Result<OrganizationBadgeSettingsUpdate>;
}
