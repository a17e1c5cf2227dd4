//! Organization models

use serde::{Deserialize, Serialize};

use super::Platforms;

/// Organization resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization ID
    pub id: String,

    /// Source-control platform the organization lives on
    #[serde(default)]
    pub platform: Platforms,

    /// Source-control handle (e.g. GitHub login)
    pub name: String,

    /// Display name chosen by the organization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pretty_name: Option<String>,

    #[serde(default)]
    pub avatar_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Blog or homepage, as entered on the platform (may lack a scheme)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_username: Option<String>,

    /// True when the organization is a user's personal account
    #[serde(default)]
    pub is_personal: bool,

    /// Preferred hostname for the public page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,

    /// Minimum pledge, in cents
    #[serde(default)]
    pub pledge_minimum_amount: i64,

    #[serde(default)]
    pub pledge_badge_show_amount: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_upfront_split_to_contributors: Option<i64>,

    #[serde(default)]
    pub has_app_installed: bool,

    // Only present when the viewer is a member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_teammate: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_email: Option<String>,
}

impl Organization {
    /// Pretty name when set, handle otherwise.
    pub fn display_name(&self) -> &str {
        match self.pretty_name.as_deref() {
            Some(pretty) if !pretty.is_empty() => pretty,
            _ => &self.name,
        }
    }
}

/// Partial organization update. Unset fields are left untouched server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_default_upfront_split_to_contributors: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_upfront_split_to_contributors: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pledge_badge_show_amount: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_default_badge_custom_content: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_badge_custom_content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pledge_minimum_amount: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_email: Option<String>,
}

impl OrganizationUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Badge settings for a single repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryBadgeSettings {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub badge_auto_embed: bool,
    #[serde(default)]
    pub badge_label: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_sync_completed: bool,
    #[serde(default)]
    pub embedded_issues_count: i64,
    #[serde(default)]
    pub open_issues_count: i64,
}

/// Organization-wide badge settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationBadgeSettingsRead {
    #[serde(default)]
    pub show_amount: bool,
    #[serde(default)]
    pub minimum_amount: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub repositories: Vec<RepositoryBadgeSettings>,
}

/// Badge settings update for one repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryBadgeSettingsUpdate {
    pub id: String,
    pub badge_auto_embed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retroactive: Option<bool>,
}

/// Organization badge settings update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationBadgeSettingsUpdate {
    pub show_amount: bool,
    pub minimum_amount: i64,
    pub message: String,
    #[serde(default)]
    pub repository_settings: Vec<RepositoryBadgeSettingsUpdate>,
}

impl From<&OrganizationBadgeSettingsRead> for OrganizationBadgeSettingsUpdate {
    fn from(current: &OrganizationBadgeSettingsRead) -> Self {
        Self {
            show_amount: current.show_amount,
            minimum_amount: current.minimum_amount,
            message: current.message.clone().unwrap_or_default(),
            repository_settings: Vec::new(),
        }
    }
}

/// Organization member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationMember {
    pub user_id: String,
    pub organization_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub github_username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Prepaid credit balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditBalance {
    pub amount: CurrencyAmount,
}

/// Amount in minor units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub currency: String,
    pub amount: i64,
}
