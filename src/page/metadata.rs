//! Page metadata for an organization's public profile

use serde::Serialize;

use crate::client::models::Organization;

const OG_IMAGE_WIDTH: u32 = 1200;
const OG_IMAGE_HEIGHT: u32 = 630;
const SITE_NAME: &str = "Polar";
const SITE_URL: &str = "https://polar.sh";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageMeta {
    pub url: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub site_name: &'static str,
    pub images: Vec<ImageMeta>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwitterCard {
    pub card: &'static str,
    pub title: String,
    pub description: String,
    pub images: Vec<ImageMeta>,
}

/// Alternate representation, such as the RSS feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternate {
    pub media_type: &'static str,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    pub alternates: Vec<Alternate>,
}

impl PageMetadata {
    pub fn for_organization(org: &Organization) -> Self {
        let name = org.display_name();
        let on_polar = format!("{} on {}", name, SITE_NAME);
        let image_url = format!("{}/og?org={}", SITE_URL, org.name);

        let description = match org.bio.as_deref() {
            Some(bio) if !bio.is_empty() => bio.to_string(),
            _ => on_polar.clone(),
        };

        Self {
            title: name.to_string(),
            description,
            open_graph: OpenGraph {
                title: on_polar.clone(),
                description: on_polar.clone(),
                site_name: SITE_NAME,
                images: vec![ImageMeta {
                    url: image_url.clone(),
                    width: OG_IMAGE_WIDTH,
                    height: OG_IMAGE_HEIGHT,
                    alt: None,
                }],
            },
            twitter: TwitterCard {
                card: "summary_large_image",
                title: on_polar.clone(),
                description: on_polar.clone(),
                images: vec![ImageMeta {
                    url: image_url,
                    width: OG_IMAGE_WIDTH,
                    height: OG_IMAGE_HEIGHT,
                    alt: Some(on_polar),
                }],
            },
            alternates: vec![Alternate {
                media_type: "application/rss+xml",
                title: name.to_string(),
                url: format!("{}/{}/rss", SITE_URL, org.name),
            }],
        }
    }
}
