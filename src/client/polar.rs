//! Polar API client implementation
//!
//! [`PolarClient`] is a registry of one [`ResourceClient`] per resource group,
//! all sharing a single [`Transport`] built from one [`ClientConfig`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::api::{
    ArticlesApi, FundingApi, IntegrationsApi, OrganizationsApi, RepositoriesApi,
    SubscriptionsApi, UsersApi,
};
use super::models::{
    Article, CreditBalance, IssueFunding, ListResource, Organization,
    OrganizationBadgeSettingsRead, OrganizationBadgeSettingsUpdate, OrganizationMember,
    OrganizationUpdate, Platforms, Repository, SubscriptionSummary, SubscriptionTier, UserRead,
};
use super::params::{ArticleSearch, FundingSearch, OrgScope};
use super::resource::Resource;
use super::transport::{ClientConfig, ResourceClient, Transport};
use crate::error::Result;

/// Polar API client
pub struct PolarClient {
    transport: Arc<Transport>,
    /// Indexed by `Resource::index()`
    registry: Vec<ResourceClient>,
}

impl PolarClient {
    /// Build the client registry from a shared transport configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let transport = Arc::new(Transport::new(config)?);
        let registry = Resource::ALL
            .iter()
            .map(|resource| ResourceClient::new(*resource, Arc::clone(&transport)))
            .collect();

        Ok(Self {
            transport,
            registry,
        })
    }

    /// The client for one resource group.
    pub fn resource(&self, resource: Resource) -> &ResourceClient {
        &self.registry[resource.index()]
    }

    /// Look a resource client up by registry name (e.g. `"organizations"`).
    #[allow(dead_code)]
    pub fn by_name(&self, name: &str) -> Option<&ResourceClient> {
        Resource::from_name(name).map(|r| self.resource(r))
    }

    /// All registered resource clients, in registry order.
    #[allow(dead_code)]
    pub fn resources(&self) -> impl Iterator<Item = &ResourceClient> {
        self.registry.iter()
    }

    pub fn is_authenticated(&self) -> bool {
        self.transport.is_authenticated()
    }

    fn organizations(&self) -> &ResourceClient {
        self.resource(Resource::Organizations)
    }
}

#[async_trait]
impl OrganizationsApi for PolarClient {
    async fn lookup_organization(&self, platform: Platforms, name: &str) -> Result<Organization> {
        let query = [
            ("platform", platform.as_str().to_string()),
            ("organization_name", name.to_string()),
        ];
        self.organizations().get("/lookup", &query).await
    }

    async fn list_organizations(&self, is_admin_only: bool) -> Result<ListResource<Organization>> {
        let query = [("is_admin_only", is_admin_only.to_string())];
        self.organizations().get("", &query).await
    }

    async fn get_organization(&self, id: &str) -> Result<Organization> {
        self.organizations().get(&format!("/{}", id), &[]).await
    }

    async fn list_organization_members(
        &self,
        id: &str,
    ) -> Result<ListResource<OrganizationMember>> {
        self.organizations()
            .get(&format!("/{}/members", id), &[])
            .await
    }

    async fn get_badge_settings(&self, id: &str) -> Result<OrganizationBadgeSettingsRead> {
        self.organizations()
            .get(&format!("/{}/badge_settings", id), &[])
            .await
    }

    async fn get_organization_credits(&self, id: &str) -> Result<CreditBalance> {
        self.organizations()
            .get(&format!("/{}/credit", id), &[])
            .await
    }

    async fn update_organization(
        &self,
        id: &str,
        update: &OrganizationUpdate,
    ) -> Result<Organization> {
        self.organizations().patch(&format!("/{}", id), update).await
    }

    async fn update_badge_settings(
        &self,
        id: &str,
        settings: &OrganizationBadgeSettingsUpdate,
    ) -> Result<OrganizationBadgeSettingsUpdate> {
        self.organizations()
            .post(&format!("/{}/badge_settings", id), settings)
            .await
    }
}

#[async_trait]
impl ArticlesApi for PolarClient {
    async fn search_articles(&self, params: &ArticleSearch) -> Result<ListResource<Article>> {
        self.resource(Resource::Articles)
            .get("/search", &params.to_query_params())
            .await
    }
}

#[async_trait]
impl SubscriptionsApi for PolarClient {
    async fn search_subscription_tiers(
        &self,
        scope: &OrgScope,
    ) -> Result<ListResource<SubscriptionTier>> {
        self.resource(Resource::Subscriptions)
            .get("/tiers/search", &scope.to_query_params())
            .await
    }

    async fn search_subscriptions_summary(
        &self,
        scope: &OrgScope,
        limit: Option<u32>,
    ) -> Result<ListResource<SubscriptionSummary>> {
        let mut query = scope.to_query_params();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.resource(Resource::Subscriptions)
            .get("/subscriptions/summary", &query)
            .await
    }
}

#[async_trait]
impl RepositoriesApi for PolarClient {
    async fn search_repositories(&self, scope: &OrgScope) -> Result<ListResource<Repository>> {
        self.resource(Resource::Repositories)
            .get("/search", &scope.to_query_params())
            .await
    }
}

#[async_trait]
impl FundingApi for PolarClient {
    async fn search_funding(&self, params: &FundingSearch) -> Result<ListResource<IssueFunding>> {
        self.resource(Resource::Funding)
            .get("/search", &params.to_query_params())
            .await
    }
}

#[async_trait]
impl IntegrationsApi for PolarClient {
    async fn synchronize_members(&self, organization_id: &str) -> Result<()> {
        self.resource(Resource::Integrations)
            .post_empty(
                "/github/synchronize_members",
                &json!({ "organization_id": organization_id }),
            )
            .await
    }
}

#[async_trait]
impl UsersApi for PolarClient {
    async fn get_authenticated_user(&self) -> Result<UserRead> {
        self.resource(Resource::Users).get("/me", &[]).await
    }
}
