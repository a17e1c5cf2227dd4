//! Article (post) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author line shown on a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Byline {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// A post published by an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byline: Option<Byline>,
    /// `public`, `hidden` or `private`
    #[serde(default)]
    pub visibility: String,
    #[serde(default)]
    pub paid_subscribers_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_pinned: bool,
}
