//! schema.org `ProfilePage` structured data

use serde::Serialize;

use crate::client::models::Organization;

const SCHEMA_CONTEXT: &str = "https://schema.org";
const TWITTER_BASE: &str = "https://twitter.com";

/// Kind of entity a profile page is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityType {
    Person,
    Organization,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainEntity {
    #[serde(rename = "@type")]
    pub entity_type: EntityType,
    pub name: String,
    #[serde(rename = "alternateName")]
    pub alternate_name: String,
    pub image: String,
}

/// JSON-LD document embedded in an organization's public page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfilePage {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub page_type: &'static str,
    pub name: String,
    pub image: String,
    #[serde(rename = "sameAs")]
    pub same_as: Vec<String>,
    #[serde(rename = "mainEntity")]
    pub main_entity: MainEntity,
}

impl ProfilePage {
    pub fn for_organization(org: &Organization) -> Self {
        let entity_type = if org.is_personal {
            EntityType::Person
        } else {
            EntityType::Organization
        };

        Self {
            context: SCHEMA_CONTEXT,
            page_type: "ProfilePage",
            name: org.display_name().to_string(),
            image: org.avatar_url.clone(),
            same_as: same_as(org),
            main_entity: MainEntity {
                entity_type,
                name: org.display_name().to_string(),
                alternate_name: org.name.clone(),
                image: org.avatar_url.clone(),
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Profile links: platform profile first, then blog and Twitter when set.
pub fn same_as(org: &Organization) -> Vec<String> {
    let mut links = vec![org.platform.profile_url(&org.name)];

    if let Some(blog) = org.blog.as_deref().filter(|b| !b.is_empty()) {
        links.push(external_url(blog));
    }
    if let Some(handle) = org.twitter_username.as_deref().filter(|h| !h.is_empty()) {
        links.push(format!("{}/{}", TWITTER_BASE, handle));
    }

    links
}

/// Make a user-entered link absolute, defaulting to https.
pub fn external_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}
