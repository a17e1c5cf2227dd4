//! Data loader for an organization's public page

use std::sync::Arc;

use log::{debug, warn};

use super::canonical::redirect_target;
use super::jsonld::ProfilePage;
use super::metadata::PageMetadata;
use super::view::{MAX_POSTS, PageView, merge_posts, top_repositories};
use crate::client::models::ListFundingSortBy;
use crate::client::{ArticleSearch, FundingSearch, OrgScope, PolarApi};
use crate::error::{Error, Result};

/// Open issues shown on the profile
const FUNDING_LIMIT: u32 = 8;
/// Subscribers shown on the profile
const SUMMARY_LIMIT: u32 = 3;

const FUNDING_SORTING: [ListFundingSortBy; 4] = [
    ListFundingSortBy::MostFunded,
    ListFundingSortBy::MostRecentlyFunded,
    ListFundingSortBy::MostEngagement,
    ListFundingSortBy::Newest,
];

/// Result of loading a public page.
#[derive(Debug, Clone)]
pub enum PageOutcome {
    Render(Box<PageView>),
    NotFound,
    /// Served from the wrong host; the URL of the canonical page
    Redirect(String),
}

/// Loads everything an organization's public page needs in one batch.
pub struct PageLoader<C: ?Sized> {
    api: Arc<C>,
    frontend_url: String,
}

impl<C: PolarApi + ?Sized> PageLoader<C> {
    pub fn new(api: Arc<C>, frontend_url: impl Into<String>) -> Self {
        Self {
            api,
            frontend_url: frontend_url.into(),
        }
    }

    /// Load the page for `name` as requested on `request_host`.
    ///
    /// All reads run concurrently and are awaited together. A failed
    /// admin-organizations read only empties that list; any other failure
    /// yields [`PageOutcome::NotFound`].
    pub async fn load(&self, name: &str, request_host: Option<&str>) -> PageOutcome {
        let scope = OrgScope::new(name);
        let unpinned_search = ArticleSearch::new(scope.clone())
            .pinned(false)
            .limit(MAX_POSTS as u32);
        let pinned_search = ArticleSearch::new(scope.clone())
            .pinned(true)
            .limit(MAX_POSTS as u32);
        let funding_search = FundingSearch::new(scope.clone())
            .limit(FUNDING_LIMIT)
            .page(1)
            .closed(false)
            .sorting(FUNDING_SORTING);

        let api = &self.api;
        let (organization, articles, pinned, tiers, repositories, summary, admin_orgs, funding) = futures::join!(
            api.lookup_organization(scope.platform, name),
            api.search_articles(&unpinned_search),
            api.search_articles(&pinned_search),
            api.search_subscription_tiers(&scope),
            api.search_repositories(&scope),
            api.search_subscriptions_summary(&scope, Some(SUMMARY_LIMIT)),
            api.list_organizations(true),
            api.search_funding(&funding_search),
        );

        // Anonymous visitors have no admin organizations
        let admin_organizations = match admin_orgs {
            Ok(list) => list.items,
            Err(e) => {
                warn!("Admin organizations unavailable, continuing without: {}", e);
                Vec::new()
            }
        };

        let batch = (|| -> Result<_> {
            Ok((
                organization?,
                articles?,
                pinned?,
                tiers?,
                repositories?,
                summary?,
                funding?,
            ))
        })();

        let (organization, articles, pinned, tiers, repositories, summary, funding) = match batch
        {
            Ok(batch) => batch,
            Err(e) => {
                debug!("Page {} not found: {}", name, e);
                return PageOutcome::NotFound;
            }
        };

        if let Some(url) = redirect_target(&organization, request_host, &self.frontend_url) {
            debug!("Redirecting {} to canonical {}", name, url);
            return PageOutcome::Redirect(url);
        }

        let metadata = PageMetadata::for_organization(&organization);
        let json_ld = ProfilePage::for_organization(&organization);

        PageOutcome::Render(Box::new(PageView {
            posts: merge_posts(pinned.items, articles.items),
            repositories: top_repositories(repositories.items),
            subscription_tiers: tiers,
            subscriptions_summary: summary,
            admin_organizations,
            issues: funding.items,
            metadata,
            json_ld,
            organization,
        }))
    }

    /// Metadata for the page of `name`, or `None` when it does not exist.
    ///
    /// Unlike [`load`](Self::load), failures other than not-found propagate.
    pub async fn metadata(&self, name: &str) -> Result<Option<PageMetadata>> {
        let scope = OrgScope::new(name);
        match self.api.lookup_organization(scope.platform, name).await {
            Ok(org) => Ok(Some(PageMetadata::for_organization(&org))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl PageOutcome {
    pub fn into_view(self) -> std::result::Result<PageView, Error> {
        match self {
            PageOutcome::Render(view) => Ok(*view),
            PageOutcome::NotFound => Err(Error::Other("Page not found".to_string())),
            PageOutcome::Redirect(url) => Err(Error::Other(format!("Page moved to {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockPolarClient;
    use crate::client::fixtures::*;
    use crate::error::ApiError;
    use crate::page::jsonld::EntityType;

    const FRONTEND: &str = "https://polar.sh";

    async fn populated() -> MockPolarClient {
        MockPolarClient::new()
            .with_orgs(vec![
                OrganizationBuilder::new("o1", "acme").blog("acme.dev").build(),
            ])
            .await
            .with_admin_orgs(vec![OrganizationBuilder::new("o1", "acme").build()])
            .await
            .with_articles(vec![
                article("a1", "One", false),
                article("a2", "Two", false),
                article("p1", "Pinned", true),
            ])
            .await
            .with_repos(vec![
                repository("r1", "small", Some(1)),
                repository("r2", "big", Some(10)),
                repository("r3", "none", None),
            ])
            .await
            .with_tiers(vec![subscription_tier("t1", "Supporter", 500)])
            .await
            .with_funding(vec![issue_funding("i1", "Fix it", 2500)])
            .await
    }

    fn loader(mock: MockPolarClient) -> (Arc<MockPolarClient>, PageLoader<MockPolarClient>) {
        let api = Arc::new(mock);
        (Arc::clone(&api), PageLoader::new(api, FRONTEND))
    }

    #[tokio::test]
    async fn test_render_builds_view() {
        let (api, loader) = loader(populated().await);

        let view = loader.load("acme", Some("polar.sh")).await.into_view().unwrap();

        assert_eq!(view.organization.id, "o1");
        let post_ids: Vec<&str> = view.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(post_ids, vec!["p1", "a1", "a2"]);
        let repo_ids: Vec<&str> = view.repositories.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(repo_ids, vec!["r2", "r1"]);
        assert_eq!(view.admin_organizations.len(), 1);
        assert_eq!(view.issues.len(), 1);
        assert_eq!(view.subscription_tiers.items.len(), 1);
        assert_eq!(view.json_ld.main_entity.entity_type, EntityType::Organization);
        assert_eq!(
            view.json_ld.same_as,
            vec!["https://github.com/acme", "https://acme.dev"]
        );

        // Every read was issued exactly once
        let counts = api.call_counts().await;
        assert_eq!(counts.lookup_organization, 1);
        assert_eq!(counts.search_articles, 2);
        assert_eq!(counts.total(), 8);
    }

    #[tokio::test]
    async fn test_batch_parameters() {
        let (api, loader) = loader(populated().await);
        loader.load("acme", None).await;

        let requests = api.captured_requests().await;
        let funding = requests
            .iter()
            .find(|r| r.method == "search_funding")
            .unwrap();
        assert_eq!(funding.param("limit"), Some("8"));
        assert_eq!(funding.param("page"), Some("1"));
        assert_eq!(funding.param("closed"), Some("false"));
        let sorting: Vec<&str> = funding
            .query
            .iter()
            .filter(|(k, _)| *k == "sorting")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(
            sorting,
            vec!["most_funded", "most_recently_funded", "most_engagement", "newest"]
        );

        let summary = requests
            .iter()
            .find(|r| r.method == "search_subscriptions_summary")
            .unwrap();
        assert_eq!(summary.param("limit"), Some("3"));
        assert_eq!(summary.param("organization_name"), Some("acme"));
    }

    #[tokio::test]
    async fn test_admin_orgs_failure_is_tolerated() {
        let mock = populated()
            .await
            .with_method_error("list_organizations", ApiError::Unauthorized)
            .await;
        let (_, loader) = loader(mock);

        let view = loader.load("acme", None).await.into_view().unwrap();
        assert!(view.admin_organizations.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_organization_is_not_found() {
        let (_, loader) = loader(populated().await);
        assert!(matches!(
            loader.load("nobody", None).await,
            PageOutcome::NotFound
        ));
    }

    #[tokio::test]
    async fn test_other_failures_are_not_found() {
        let mock = populated()
            .await
            .with_method_error("search_repositories", ApiError::ServerError("boom".into()))
            .await;
        let (api, loader) = loader(mock);

        assert!(matches!(loader.load("acme", None).await, PageOutcome::NotFound));
        // No short circuit: the rest of the batch still ran
        assert_eq!(api.call_counts().await.total(), 8);
    }

    #[tokio::test]
    async fn test_redirects_to_custom_domain() {
        let mock = MockPolarClient::new()
            .with_orgs(vec![
                OrganizationBuilder::new("o1", "acme")
                    .custom_domain("fund.acme.dev")
                    .build(),
            ])
            .await;
        let (_, loader) = loader(mock);

        match loader.load("acme", Some("polar.sh")).await {
            PageOutcome::Redirect(url) => assert_eq!(url, "https://fund.acme.dev"),
            other => panic!("expected redirect, got {:?}", other),
        }
        assert!(matches!(
            loader.load("acme", Some("fund.acme.dev")).await,
            PageOutcome::Render(_)
        ));
    }

    #[tokio::test]
    async fn test_metadata() {
        let (_, loader) = loader(populated().await);

        let meta = loader.metadata("acme").await.unwrap().unwrap();
        assert_eq!(meta.title, "acme");
        assert!(loader.metadata("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_metadata_propagates_other_errors() {
        let mock = MockPolarClient::new()
            .with_error(ApiError::ServerError("down".into()))
            .await;
        let (_, loader) = loader(mock);
        assert!(loader.metadata("acme").await.is_err());
    }
}
