//! Subscription tier and subscriber summary models

use serde::{Deserialize, Serialize};

/// Benefit attached to a tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionTierBenefit {
    pub id: String,
    #[serde(rename = "type")]
    pub benefit_type: String,
    #[serde(default)]
    pub description: String,
}

/// A subscription tier offered by an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionTier {
    pub id: String,
    /// `free`, `individual` or `business`
    #[serde(rename = "type")]
    pub tier_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_highlighted: bool,
    /// Monthly price in minor units
    #[serde(default)]
    pub price_amount: i64,
    #[serde(default)]
    pub price_currency: String,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub benefits: Vec<SubscriptionTierBenefit>,
}

/// Public subscriber entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionSummaryUser {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Subscriber plus the tier they subscribe to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionSummary {
    pub user: SubscriptionSummaryUser,
    pub subscription_tier: SubscriptionTier,
}
