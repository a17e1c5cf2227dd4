//! Resource groups exposed by the Polar API

use std::fmt;

/// One REST resource group. Each maps to a path segment under `/api/v1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Accounts,
    Advertisements,
    Articles,
    Auth,
    Backoffice,
    Dashboard,
    Extension,
    Funding,
    Health,
    Integrations,
    Issues,
    MagicLink,
    Notifications,
    Organizations,
    PaymentMethods,
    PersonalAccessToken,
    Pledges,
    PullRequests,
    Repositories,
    Rewards,
    Stream,
    Subscriptions,
    Traffic,
    Transactions,
    Users,
    WebhookNotifications,
}

impl Resource {
    /// Every resource group, in registry order.
    pub const ALL: [Resource; 26] = [
        Resource::Accounts,
        Resource::Advertisements,
        Resource::Articles,
        Resource::Auth,
        Resource::Backoffice,
        Resource::Dashboard,
        Resource::Extension,
        Resource::Funding,
        Resource::Health,
        Resource::Integrations,
        Resource::Issues,
        Resource::MagicLink,
        Resource::Notifications,
        Resource::Organizations,
        Resource::PaymentMethods,
        Resource::PersonalAccessToken,
        Resource::Pledges,
        Resource::PullRequests,
        Resource::Repositories,
        Resource::Rewards,
        Resource::Stream,
        Resource::Subscriptions,
        Resource::Traffic,
        Resource::Transactions,
        Resource::Users,
        Resource::WebhookNotifications,
    ];

    /// Registry name, also used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Accounts => "accounts",
            Resource::Advertisements => "advertisements",
            Resource::Articles => "articles",
            Resource::Auth => "auth",
            Resource::Backoffice => "backoffice",
            Resource::Dashboard => "dashboard",
            Resource::Extension => "extension",
            Resource::Funding => "funding",
            Resource::Health => "health",
            Resource::Integrations => "integrations",
            Resource::Issues => "issues",
            Resource::MagicLink => "magic_link",
            Resource::Notifications => "notifications",
            Resource::Organizations => "organizations",
            Resource::PaymentMethods => "payment_methods",
            Resource::PersonalAccessToken => "personal_access_token",
            Resource::Pledges => "pledges",
            Resource::PullRequests => "pull_requests",
            Resource::Repositories => "repositories",
            Resource::Rewards => "rewards",
            Resource::Stream => "stream",
            Resource::Subscriptions => "subscriptions",
            Resource::Traffic => "traffic",
            Resource::Transactions => "transactions",
            Resource::Users => "users",
            Resource::WebhookNotifications => "webhook_notifications",
        }
    }

    /// Path segment below the API root
    pub fn base_path(&self) -> &'static str {
        match self {
            Resource::MagicLink => "/magic_link",
            Resource::PersonalAccessToken => "/personal_access_tokens",
            Resource::PaymentMethods => "/payment_methods",
            Resource::PullRequests => "/pull_requests",
            Resource::WebhookNotifications => "/webhook_notifications",
            Resource::Accounts => "/accounts",
            Resource::Advertisements => "/advertisements",
            Resource::Articles => "/articles",
            Resource::Auth => "/auth",
            Resource::Backoffice => "/backoffice",
            Resource::Dashboard => "/dashboard",
            Resource::Extension => "/extension",
            Resource::Funding => "/funding",
            Resource::Health => "/health",
            Resource::Integrations => "/integrations",
            Resource::Issues => "/issues",
            Resource::Notifications => "/notifications",
            Resource::Organizations => "/organizations",
            Resource::Pledges => "/pledges",
            Resource::Repositories => "/repositories",
            Resource::Rewards => "/rewards",
            Resource::Stream => "/stream",
            Resource::Subscriptions => "/subscriptions",
            Resource::Traffic => "/traffic",
            Resource::Transactions => "/transactions",
            Resource::Users => "/users",
        }
    }

    /// Look up a resource by its registry name.
    pub fn from_name(name: &str) -> Option<Resource> {
        Resource::ALL.iter().copied().find(|r| r.name() == name)
    }

    /// Position in [`Resource::ALL`]
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
