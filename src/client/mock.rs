//! Mock Polar API client for testing
//!
//! Provides a mock implementation of the API traits for unit testing
//! without making real API calls.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

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
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockPolarClient::new()
///     .with_orgs(vec![OrganizationBuilder::new("o1", "acme").build()])
///     .await;
///
/// let org = mock.lookup_organization(Platforms::Github, "acme").await?;
/// assert_eq!(org.id, "o1");
/// ```
#[derive(Default)]
pub struct MockPolarClient {
    /// Organizations known to lookup/get/list
    orgs: Arc<Mutex<Vec<Organization>>>,
    /// Returned by `list_organizations(true)`
    admin_orgs: Arc<Mutex<Vec<Organization>>>,
    /// Members by organization ID
    members: Arc<Mutex<HashMap<String, Vec<OrganizationMember>>>>,
    badge_settings: Arc<Mutex<Option<OrganizationBadgeSettingsRead>>>,
    credits: Arc<Mutex<Option<CreditBalance>>>,
    articles: Arc<Mutex<Vec<Article>>>,
    tiers: Arc<Mutex<Vec<SubscriptionTier>>>,
    summary: Arc<Mutex<Vec<SubscriptionSummary>>>,
    repos: Arc<Mutex<Vec<Repository>>>,
    funding: Arc<Mutex<Vec<IssueFunding>>>,
    /// Authenticated user; `None` behaves like an anonymous session
    user: Arc<Mutex<Option<UserRead>>>,
    /// Error to return on the next call of any method, consumed on use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Per-method errors returned on every call
    method_errors: Arc<Mutex<HashMap<&'static str, ApiError>>>,
    /// Per-method errors consumed one per call, before `method_errors`
    queued_errors: Arc<Mutex<HashMap<&'static str, VecDeque<ApiError>>>>,
    /// Latency added to every call
    delay: Arc<Mutex<Option<Duration>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Captured requests for test assertions
    captured_requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub lookup_organization: usize,
    pub list_organizations: usize,
    pub get_organization: usize,
    pub list_organization_members: usize,
    pub get_badge_settings: usize,
    pub get_organization_credits: usize,
    pub update_organization: usize,
    pub update_badge_settings: usize,
    pub search_articles: usize,
    pub search_subscription_tiers: usize,
    pub search_subscriptions_summary: usize,
    pub search_repositories: usize,
    pub search_funding: usize,
    pub synchronize_members: usize,
    pub get_authenticated_user: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.lookup_organization
            + self.list_organizations
            + self.get_organization
            + self.list_organization_members
            + self.get_badge_settings
            + self.get_organization_credits
            + self.update_organization
            + self.update_badge_settings
            + self.search_articles
            + self.search_subscription_tiers
            + self.search_subscriptions_summary
            + self.search_repositories
            + self.search_funding
            + self.synchronize_members
            + self.get_authenticated_user
    }
}

/// A captured API request for test assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// The API method called (e.g., "search_articles")
    pub method: &'static str,
    /// Query parameters the real client would have sent
    pub query: Vec<(&'static str, String)>,
}

impl CapturedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl MockPolarClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure organizations known to lookup, get and the full listing.
    pub async fn with_orgs(self, orgs: Vec<Organization>) -> Self {
        *self.orgs.lock().await = orgs;
        self
    }

    /// Configure organizations returned by the admin-only listing.
    pub async fn with_admin_orgs(self, orgs: Vec<Organization>) -> Self {
        *self.admin_orgs.lock().await = orgs;
        self
    }

    pub async fn with_members(self, org_id: &str, members: Vec<OrganizationMember>) -> Self {
        self.members
            .lock()
            .await
            .insert(org_id.to_string(), members);
        self
    }

    pub async fn with_badge_settings(self, settings: OrganizationBadgeSettingsRead) -> Self {
        *self.badge_settings.lock().await = Some(settings);
        self
    }

    pub async fn with_credits(self, credits: CreditBalance) -> Self {
        *self.credits.lock().await = Some(credits);
        self
    }

    /// Configure articles; searches filter them by `is_pinned` and `limit`.
    pub async fn with_articles(self, articles: Vec<Article>) -> Self {
        *self.articles.lock().await = articles;
        self
    }

    pub async fn with_tiers(self, tiers: Vec<SubscriptionTier>) -> Self {
        *self.tiers.lock().await = tiers;
        self
    }

    pub async fn with_summary(self, summary: Vec<SubscriptionSummary>) -> Self {
        *self.summary.lock().await = summary;
        self
    }

    pub async fn with_repos(self, repos: Vec<Repository>) -> Self {
        *self.repos.lock().await = repos;
        self
    }

    pub async fn with_funding(self, funding: Vec<IssueFunding>) -> Self {
        *self.funding.lock().await = funding;
        self
    }

    pub async fn with_user(self, user: UserRead) -> Self {
        *self.user.lock().await = Some(user);
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Make every call to `method` fail with `error`.
    pub async fn with_method_error(self, method: &'static str, error: ApiError) -> Self {
        self.method_errors.lock().await.insert(method, error);
        self
    }

    /// Make the next `times` calls to `method` fail with `error`.
    pub async fn with_failures(self, method: &'static str, times: usize, error: ApiError) -> Self {
        self.queued_errors
            .lock()
            .await
            .entry(method)
            .or_default()
            .extend(std::iter::repeat_n(error, times));
        self
    }

    /// Add latency to every call, for exercising concurrent callers.
    pub async fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().await = Some(delay);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Get all captured requests for test assertions.
    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.captured_requests.lock().await.clone()
    }

    /// Common entry for every mocked call: count, capture, delay, then
    /// surface any configured error.
    async fn enter(
        &self,
        method: &'static str,
        query: Vec<(&'static str, String)>,
        count: impl FnOnce(&mut CallCounts),
    ) -> Result<()> {
        count(&mut *self.call_count.lock().await);
        self.captured_requests
            .lock()
            .await
            .push(CapturedRequest { method, query });

        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(e) = self.error.lock().await.take() {
            return Err(e.into());
        }
        if let Some(e) = self
            .queued_errors
            .lock()
            .await
            .get_mut(method)
            .and_then(VecDeque::pop_front)
        {
            return Err(e.into());
        }
        if let Some(e) = self.method_errors.lock().await.get(method) {
            return Err(e.clone().into());
        }

        Ok(())
    }

    async fn find_org(&self, pred: impl Fn(&Organization) -> bool, what: &str) -> Result<Organization> {
        self.orgs
            .lock()
            .await
            .iter()
            .find(|o| pred(o))
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Organization {} not found", what)).into())
    }
}

// ============================================================================
// OrganizationsApi Implementation
// ============================================================================

#[async_trait]
impl OrganizationsApi for MockPolarClient {
    async fn lookup_organization(&self, platform: Platforms, name: &str) -> Result<Organization> {
        let scope = OrgScope {
            platform,
            organization_name: name.to_string(),
        };
        self.enter("lookup_organization", scope.to_query_params(), |c| {
            c.lookup_organization += 1
        })
        .await?;

        self.find_org(|o| o.platform == platform && o.name == name, name)
            .await
    }

    async fn list_organizations(&self, is_admin_only: bool) -> Result<ListResource<Organization>> {
        self.enter(
            "list_organizations",
            vec![("is_admin_only", is_admin_only.to_string())],
            |c| c.list_organizations += 1,
        )
        .await?;

        let orgs = if is_admin_only {
            self.admin_orgs.lock().await.clone()
        } else {
            self.orgs.lock().await.clone()
        };
        Ok(ListResource::new(orgs))
    }

    async fn get_organization(&self, id: &str) -> Result<Organization> {
        self.enter("get_organization", Vec::new(), |c| c.get_organization += 1)
            .await?;
        self.find_org(|o| o.id == id, id).await
    }

    async fn list_organization_members(
        &self,
        id: &str,
    ) -> Result<ListResource<OrganizationMember>> {
        self.enter("list_organization_members", Vec::new(), |c| {
            c.list_organization_members += 1
        })
        .await?;

        let members = self.members.lock().await.get(id).cloned().unwrap_or_default();
        Ok(ListResource::new(members))
    }

    async fn get_badge_settings(&self, _id: &str) -> Result<OrganizationBadgeSettingsRead> {
        self.enter("get_badge_settings", Vec::new(), |c| c.get_badge_settings += 1)
            .await?;

        self.badge_settings
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::NotFound("Badge settings not found".into()).into())
    }

    async fn get_organization_credits(&self, _id: &str) -> Result<CreditBalance> {
        self.enter("get_organization_credits", Vec::new(), |c| {
            c.get_organization_credits += 1
        })
        .await?;

        self.credits
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::NotFound("Credit balance not found".into()).into())
    }

    async fn update_organization(
        &self,
        id: &str,
        update: &OrganizationUpdate,
    ) -> Result<Organization> {
        self.enter("update_organization", Vec::new(), |c| {
            c.update_organization += 1
        })
        .await?;

        let mut orgs = self.orgs.lock().await;
        let org = orgs
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("Organization {} not found", id)))?;

        if let Some(amount) = update.pledge_minimum_amount {
            org.pledge_minimum_amount = amount;
        }
        if let Some(show) = update.pledge_badge_show_amount {
            org.pledge_badge_show_amount = show;
        }
        if let Some(ref email) = update.billing_email {
            org.billing_email = Some(email.clone());
        }
        if update.set_default_upfront_split_to_contributors == Some(true) {
            org.default_upfront_split_to_contributors =
                update.default_upfront_split_to_contributors;
        }

        Ok(org.clone())
    }

    async fn update_badge_settings(
        &self,
        _id: &str,
        settings: &OrganizationBadgeSettingsUpdate,
    ) -> Result<OrganizationBadgeSettingsUpdate> {
        self.enter("update_badge_settings", Vec::new(), |c| {
            c.update_badge_settings += 1
        })
        .await?;

        let mut stored = self.badge_settings.lock().await;
        let current = stored.get_or_insert_with(|| OrganizationBadgeSettingsRead {
            show_amount: false,
            minimum_amount: 0,
            message: None,
            repositories: Vec::new(),
        });
        current.show_amount = settings.show_amount;
        current.minimum_amount = settings.minimum_amount;
        current.message = Some(settings.message.clone());

        Ok(settings.clone())
    }
}

// ============================================================================
// Search API Implementations
// ============================================================================

#[async_trait]
impl ArticlesApi for MockPolarClient {
    async fn search_articles(&self, params: &ArticleSearch) -> Result<ListResource<Article>> {
        self.enter("search_articles", params.to_query_params(), |c| {
            c.search_articles += 1
        })
        .await?;

        let mut articles: Vec<Article> = self
            .articles
            .lock()
            .await
            .iter()
            .filter(|a| params.is_pinned.is_none_or(|pinned| a.is_pinned == pinned))
            .cloned()
            .collect();
        if let Some(limit) = params.limit {
            articles.truncate(limit as usize);
        }
        Ok(ListResource::new(articles))
    }
}

#[async_trait]
impl SubscriptionsApi for MockPolarClient {
    async fn search_subscription_tiers(
        &self,
        scope: &OrgScope,
    ) -> Result<ListResource<SubscriptionTier>> {
        self.enter("search_subscription_tiers", scope.to_query_params(), |c| {
            c.search_subscription_tiers += 1
        })
        .await?;

        Ok(ListResource::new(self.tiers.lock().await.clone()))
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
        self.enter("search_subscriptions_summary", query, |c| {
            c.search_subscriptions_summary += 1
        })
        .await?;

        let mut summary = self.summary.lock().await.clone();
        if let Some(limit) = limit {
            summary.truncate(limit as usize);
        }
        Ok(ListResource::new(summary))
    }
}

#[async_trait]
impl RepositoriesApi for MockPolarClient {
    async fn search_repositories(&self, scope: &OrgScope) -> Result<ListResource<Repository>> {
        self.enter("search_repositories", scope.to_query_params(), |c| {
            c.search_repositories += 1
        })
        .await?;

        Ok(ListResource::new(self.repos.lock().await.clone()))
    }
}

#[async_trait]
impl FundingApi for MockPolarClient {
    async fn search_funding(&self, params: &FundingSearch) -> Result<ListResource<IssueFunding>> {
        self.enter("search_funding", params.to_query_params(), |c| {
            c.search_funding += 1
        })
        .await?;

        let mut funding = self.funding.lock().await.clone();
        if let Some(limit) = params.limit {
            funding.truncate(limit as usize);
        }
        Ok(ListResource::new(funding))
    }
}

#[async_trait]
impl IntegrationsApi for MockPolarClient {
    async fn synchronize_members(&self, organization_id: &str) -> Result<()> {
        self.enter(
            "synchronize_members",
            vec![("organization_id", organization_id.to_string())],
            |c| c.synchronize_members += 1,
        )
        .await
    }
}

#[async_trait]
impl UsersApi for MockPolarClient {
    async fn get_authenticated_user(&self) -> Result<UserRead> {
        self.enter("get_authenticated_user", Vec::new(), |c| {
            c.get_authenticated_user += 1
        })
        .await?;

        self.user
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::Unauthorized.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::*;

    #[tokio::test]
    async fn test_mock_client_empty() {
        let mock = MockPolarClient::new();
        let orgs = mock.list_organizations(false).await.unwrap();
        assert!(orgs.items.is_empty());
        assert_eq!(mock.call_counts().await.list_organizations, 1);
    }

    #[tokio::test]
    async fn test_mock_client_lookup() {
        let mock = MockPolarClient::new()
            .with_orgs(vec![OrganizationBuilder::new("o1", "acme").build()])
            .await;

        let org = mock
            .lookup_organization(Platforms::Github, "acme")
            .await
            .unwrap();
        assert_eq!(org.id, "o1");

        let err = mock
            .lookup_organization(Platforms::Github, "nope")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_mock_client_with_error() {
        let mock = MockPolarClient::new()
            .with_error(ApiError::Unauthorized)
            .await;

        // First call fails
        assert!(mock.list_organizations(true).await.is_err());

        // Second call succeeds (error consumed)
        assert!(mock.list_organizations(true).await.is_ok());
        assert_eq!(mock.call_counts().await.list_organizations, 2);
    }

    #[tokio::test]
    async fn test_mock_client_queued_failures_then_success() {
        let mock = MockPolarClient::new()
            .with_failures("search_funding", 2, ApiError::ServerError("boom".into()))
            .await;

        assert!(mock.search_funding(&FundingSearch::new(OrgScope::new("a"))).await.is_err());
        // Other methods are unaffected
        assert!(mock.search_repositories(&OrgScope::new("a")).await.is_ok());
        assert!(mock.search_funding(&FundingSearch::new(OrgScope::new("a"))).await.is_err());
        assert!(mock.search_funding(&FundingSearch::new(OrgScope::new("a"))).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_client_sticky_method_error() {
        let mock = MockPolarClient::new()
            .with_method_error("get_authenticated_user", ApiError::Forbidden)
            .await
            .with_user(user("u1", "alice"))
            .await;

        for _ in 0..3 {
            assert!(mock.get_authenticated_user().await.is_err());
        }
    }

    #[tokio::test]
    async fn test_mock_client_article_filters() {
        let mock = MockPolarClient::new()
            .with_articles(vec![
                article("a1", "One", true),
                article("a2", "Two", false),
                article("a3", "Three", false),
            ])
            .await;

        let pinned = mock
            .search_articles(&ArticleSearch::new(OrgScope::new("acme")).pinned(true))
            .await
            .unwrap();
        assert_eq!(pinned.items.len(), 1);

        let unpinned = mock
            .search_articles(&ArticleSearch::new(OrgScope::new("acme")).pinned(false).limit(1))
            .await
            .unwrap();
        assert_eq!(unpinned.items.len(), 1);
        assert_eq!(unpinned.items[0].id, "a2");

        let requests = mock.captured_requests().await;
        assert_eq!(requests[0].param("is_pinned"), Some("true"));
        assert_eq!(requests[1].param("limit"), Some("1"));
    }

    #[tokio::test]
    async fn test_mock_client_update_organization() {
        let mock = MockPolarClient::new()
            .with_orgs(vec![OrganizationBuilder::new("o1", "acme").build()])
            .await;

        let update = OrganizationUpdate {
            pledge_minimum_amount: Some(5000),
            ..Default::default()
        };
        let org = mock.update_organization("o1", &update).await.unwrap();
        assert_eq!(org.pledge_minimum_amount, 5000);

        let fetched = mock.get_organization("o1").await.unwrap();
        assert_eq!(fetched.pledge_minimum_amount, 5000);
    }
}
