//! Canonical domain for an organization's public page

use reqwest::Url;

use crate::client::models::Organization;

/// Host the page should be served from: the custom domain when the
/// organization has one, otherwise the frontend's host.
pub fn canonical_host(org: &Organization, frontend_url: &str) -> Option<String> {
    if let Some(domain) = org.custom_domain.as_deref().filter(|d| !d.is_empty()) {
        return Some(domain.to_ascii_lowercase());
    }
    Url::parse(frontend_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
}

/// Where the canonical page lives.
pub fn canonical_url(org: &Organization, frontend_url: &str) -> String {
    match org.custom_domain.as_deref().filter(|d| !d.is_empty()) {
        Some(domain) => format!("https://{}", domain),
        None => format!("{}/{}", frontend_url.trim_end_matches('/'), org.name),
    }
}

/// Redirect target when `request_host` is not the canonical host.
///
/// Without a request host (or with a port-qualified one matching the
/// canonical host) no redirect is needed.
pub fn redirect_target(
    org: &Organization,
    request_host: Option<&str>,
    frontend_url: &str,
) -> Option<String> {
    let request_host = request_host?.trim();
    if request_host.is_empty() {
        return None;
    }
    let request_host = request_host
        .split(':')
        .next()
        .unwrap_or(request_host)
        .to_ascii_lowercase();

    let canonical = canonical_host(org, frontend_url)?;
    (request_host != canonical).then(|| canonical_url(org, frontend_url))
}
