//! View model for an organization's public page

use serde::Serialize;

use super::jsonld::ProfilePage;
use super::metadata::PageMetadata;
use crate::client::models::{
    Article, IssueFunding, ListResource, Organization, Repository, SubscriptionSummary,
    SubscriptionTier,
};

/// Posts shown on the profile
pub const MAX_POSTS: usize = 3;
/// Repositories shown on the profile
pub const MAX_REPOSITORIES: usize = 2;

/// Everything the public profile page renders.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub organization: Organization,
    pub posts: Vec<Article>,
    pub repositories: Vec<Repository>,
    pub subscription_tiers: ListResource<SubscriptionTier>,
    pub subscriptions_summary: ListResource<SubscriptionSummary>,
    pub admin_organizations: Vec<Organization>,
    pub issues: Vec<IssueFunding>,
    pub metadata: PageMetadata,
    pub json_ld: ProfilePage,
}

/// Pinned posts first, then the rest, capped at [`MAX_POSTS`].
pub fn merge_posts(pinned: Vec<Article>, unpinned: Vec<Article>) -> Vec<Article> {
    pinned.into_iter().chain(unpinned).take(MAX_POSTS).collect()
}

/// Most-starred repositories first (missing stars count as zero), capped at
/// [`MAX_REPOSITORIES`]. Ties keep their original order.
pub fn top_repositories(mut repositories: Vec<Repository>) -> Vec<Repository> {
    // sort_by_key is stable
    repositories.sort_by_key(|r| std::cmp::Reverse(r.stars.unwrap_or(0)));
    repositories.truncate(MAX_REPOSITORIES);
    repositories
}
