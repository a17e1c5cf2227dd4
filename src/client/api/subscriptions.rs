//! Subscriptions API trait

use async_trait::async_trait;

use crate::client::models::{ListResource, SubscriptionSummary, SubscriptionTier};
use crate::client::params::OrgScope;
use crate::error::Result;

#[async_trait]
pub trait SubscriptionsApi: Send + Sync {
    /// Subscription tiers offered by an organization.
    async fn search_subscription_tiers(
        &self,
        scope: &OrgScope,
    ) -> Result<ListResource<SubscriptionTier>>;

    /// Public list of an organization's subscribers.
    async fn search_subscriptions_summary(
        &self,
        scope: &OrgScope,
        limit: Option<u32>,
    ) -> Result<ListResource<SubscriptionSummary>>;
}
