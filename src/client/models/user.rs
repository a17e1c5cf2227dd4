//! User models

use serde::{Deserialize, Serialize};

/// The authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRead {
    pub id: String,

    /// Polar username (mirrors the GitHub login)
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    #[serde(default)]
    pub accepted_terms_of_service: bool,

    #[serde(default)]
    pub email_newsletters_and_product_updates: bool,
}
