//! Repository models

use serde::{Deserialize, Serialize};

use super::Platforms;

/// Source-control repository synced into Polar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,

    #[serde(default)]
    pub platform: Platforms,

    /// Whether the repository is private on the platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Star count, absent for repositories that were never synced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    /// Owning organization ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}
