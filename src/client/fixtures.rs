//! Test fixtures and builders for API model types
//!
//! Provides builder patterns for creating test data with sensible defaults.
//! Import via `use crate::client::fixtures::*` in test modules.

#![allow(dead_code)]

use super::models::{
    Article, CurrencyAmount, Issue, IssueFunding, Organization, Platforms, Repository,
    SubscriptionSummary, SubscriptionSummaryUser, SubscriptionTier, UserRead,
};

// ============================================================================
// OrganizationBuilder
// ============================================================================

/// Builder for creating test Organization instances.
///
/// # Example
/// ```ignore
/// let org = OrganizationBuilder::new("o1", "acme").blog("acme.dev").build();
/// ```
#[derive(Debug, Clone)]
pub struct OrganizationBuilder {
    org: Organization,
}

impl OrganizationBuilder {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            org: Organization {
                id: id.into(),
                platform: Platforms::Github,
                avatar_url: format!("https://avatars.example.com/{}.png", name),
                name,
                pretty_name: None,
                bio: None,
                company: None,
                blog: None,
                location: None,
                email: None,
                twitter_username: None,
                is_personal: false,
                custom_domain: None,
                pledge_minimum_amount: 2000,
                pledge_badge_show_amount: true,
                default_upfront_split_to_contributors: None,
                has_app_installed: true,
                is_teammate: None,
                billing_email: None,
            },
        }
    }

    pub fn pretty_name(mut self, pretty_name: impl Into<String>) -> Self {
        self.org.pretty_name = Some(pretty_name.into());
        self
    }

    pub fn bio(mut self, bio: impl Into<String>) -> Self {
        self.org.bio = Some(bio.into());
        self
    }

    pub fn blog(mut self, blog: impl Into<String>) -> Self {
        self.org.blog = Some(blog.into());
        self
    }

    pub fn twitter(mut self, handle: impl Into<String>) -> Self {
        self.org.twitter_username = Some(handle.into());
        self
    }

    pub fn personal(mut self) -> Self {
        self.org.is_personal = true;
        self
    }

    pub fn custom_domain(mut self, domain: impl Into<String>) -> Self {
        self.org.custom_domain = Some(domain.into());
        self
    }

    pub fn pledge_minimum_amount(mut self, amount: i64) -> Self {
        self.org.pledge_minimum_amount = amount;
        self
    }

    pub fn build(self) -> Organization {
        self.org
    }
}

// ============================================================================
// Other builders
// ============================================================================

pub fn repository(id: &str, name: &str, stars: Option<i64>) -> Repository {
    Repository {
        id: id.to_string(),
        platform: Platforms::Github,
        visibility: Some("public".to_string()),
        name: name.to_string(),
        description: None,
        stars,
        license: None,
        homepage: None,
        organization_id: None,
    }
}

pub fn article(id: &str, title: &str, is_pinned: bool) -> Article {
    Article {
        id: id.to_string(),
        slug: title.to_lowercase().replace(' ', "-"),
        title: title.to_string(),
        body: String::new(),
        byline: None,
        visibility: "public".to_string(),
        paid_subscribers_only: false,
        organization_id: None,
        published_at: None,
        is_pinned,
    }
}

pub fn subscription_tier(id: &str, name: &str, price_amount: i64) -> SubscriptionTier {
    SubscriptionTier {
        id: id.to_string(),
        tier_type: "individual".to_string(),
        name: name.to_string(),
        description: None,
        is_highlighted: false,
        price_amount,
        price_currency: "usd".to_string(),
        is_archived: false,
        organization_id: None,
        benefits: Vec::new(),
    }
}

pub fn subscription_summary(username: &str, tier: SubscriptionTier) -> SubscriptionSummary {
    SubscriptionSummary {
        user: SubscriptionSummaryUser {
            username: username.to_string(),
            avatar_url: None,
        },
        subscription_tier: tier,
    }
}

pub fn issue_funding(id: &str, title: &str, total: i64) -> IssueFunding {
    IssueFunding {
        issue: Issue {
            id: id.to_string(),
            number: 1,
            title: title.to_string(),
            state: "OPEN".to_string(),
            repository_name: None,
        },
        funding_goal: None,
        total: CurrencyAmount {
            currency: "usd".to_string(),
            amount: total,
        },
    }
}

pub fn user(id: &str, username: &str) -> UserRead {
    UserRead {
        id: id.to_string(),
        username: username.to_string(),
        email: Some(format!("{}@example.com", username)),
        avatar_url: None,
        accepted_terms_of_service: true,
        email_newsletters_and_product_updates: false,
    }
}
