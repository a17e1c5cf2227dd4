//! Organization queries and mutations
//!
//! Each read pairs an endpoint with its cache key and retry policy; each
//! write declares which cached reads it invalidates or rewrites once the
//! server has acknowledged it.

use std::sync::Arc;

use serde_json::Value;

use crate::cache::{KeyFilter, QueryClient, QueryKey, RetryPolicy};
use crate::client::models::{
    CreditBalance, ListResource, Organization, OrganizationBadgeSettingsRead,
    OrganizationBadgeSettingsUpdate, OrganizationMember, OrganizationUpdate, Platforms,
};
use crate::client::{IntegrationsApi, OrganizationsApi};
use crate::error::Result;

/// `Some(id)` unless the id is missing or empty; reads without an id are skipped.
fn enabled(id: Option<&str>) -> Option<String> {
    id.filter(|id| !id.is_empty()).map(str::to_string)
}

// ============================================================================
// Reads
// ============================================================================

/// Organizations the current user administers.
pub async fn list_admin_organizations<C>(
    qc: &QueryClient,
    api: &Arc<C>,
) -> Result<ListResource<Organization>>
where
    C: OrganizationsApi + 'static,
{
    let api = Arc::clone(api);
    qc.fetch_query(QueryKey::AdminOrganizations, qc.options(), move || {
        let api = Arc::clone(&api);
        async move { api.list_organizations(true).await }
    })
    .await
}

/// Resolve an organization by name.
pub async fn organization_lookup<C>(
    qc: &QueryClient,
    api: &Arc<C>,
    name: &str,
    platform: Platforms,
) -> Result<Organization>
where
    C: OrganizationsApi + 'static,
{
    let key = QueryKey::OrganizationLookup {
        name: name.to_string(),
        platform,
    };
    let api = Arc::clone(api);
    let name = name.to_string();
    qc.fetch_query(key, qc.options(), move || {
        let api = Arc::clone(&api);
        let name = name.clone();
        async move { api.lookup_organization(platform, &name).await }
    })
    .await
}

pub async fn list_all_organizations<C>(
    qc: &QueryClient,
    api: &Arc<C>,
    admin_only: bool,
) -> Result<ListResource<Organization>>
where
    C: OrganizationsApi + 'static,
{
    let api = Arc::clone(api);
    qc.fetch_query(
        QueryKey::AllOrganizations { admin_only },
        qc.options(),
        move || {
            let api = Arc::clone(&api);
            async move { api.list_organizations(admin_only).await }
        },
    )
    .await
}

/// Members of an organization. `Ok(None)` without an id.
pub async fn list_organization_members<C>(
    qc: &QueryClient,
    api: &Arc<C>,
    id: Option<&str>,
) -> Result<Option<ListResource<OrganizationMember>>>
where
    C: OrganizationsApi + 'static,
{
    let Some(id) = enabled(id) else {
        return Ok(None);
    };
    let key = QueryKey::OrganizationMembers { id: id.clone() };
    let api = Arc::clone(api);
    qc.fetch_query(key, qc.options(), move || {
        let api = Arc::clone(&api);
        let id = id.clone();
        async move { api.list_organization_members(&id).await }
    })
    .await
    .map(Some)
}

pub async fn organization_badge_settings<C>(
    qc: &QueryClient,
    api: &Arc<C>,
    id: &str,
) -> Result<OrganizationBadgeSettingsRead>
where
    C: OrganizationsApi + 'static,
{
    let key = QueryKey::OrganizationBadgeSettings { id: id.to_string() };
    let api = Arc::clone(api);
    let id = id.to_string();
    qc.fetch_query(key, qc.options(), move || {
        let api = Arc::clone(&api);
        let id = id.clone();
        async move { api.get_badge_settings(&id).await }
    })
    .await
}

/// Credit balance. Uses the patient server-error retry policy, as the
/// billing backend can be briefly unavailable.
pub async fn organization_credits<C>(
    qc: &QueryClient,
    api: &Arc<C>,
    id: Option<&str>,
) -> Result<Option<CreditBalance>>
where
    C: OrganizationsApi + 'static,
{
    let Some(id) = enabled(id) else {
        return Ok(None);
    };
    let key = QueryKey::OrganizationCredits { id: id.clone() };
    let options = qc.options().retry(RetryPolicy::SERVER_ERROR);
    let api = Arc::clone(api);
    qc.fetch_query(key, options, move || {
        let api = Arc::clone(&api);
        let id = id.clone();
        async move { api.get_organization_credits(&id).await }
    })
    .await
    .map(Some)
}

pub async fn organization<C>(
    qc: &QueryClient,
    api: &Arc<C>,
    id: Option<&str>,
) -> Result<Option<Organization>>
where
    C: OrganizationsApi + 'static,
{
    let Some(id) = enabled(id) else {
        return Ok(None);
    };
    let key = QueryKey::Organization { id: id.clone() };
    let api = Arc::clone(api);
    qc.fetch_query(key, qc.options(), move || {
        let api = Arc::clone(&api);
        let id = id.clone();
        async move { api.get_organization(&id).await }
    })
    .await
    .map(Some)
}

// ============================================================================
// Mutations
// ============================================================================

/// Re-sync members from the platform, then invalidate the member list and
/// both organization lists.
pub async fn sync_organization_members<C>(qc: &QueryClient, api: &Arc<C>, id: &str) -> Result<()>
where
    C: IntegrationsApi + ?Sized,
{
    qc.mutate(
        RetryPolicy::DEFAULT,
        || api.synchronize_members(id),
        |qc, _| {
            qc.invalidate_queries(&QueryKey::OrganizationMembers { id: id.to_string() }.into());
            qc.invalidate_queries(&KeyFilter::admin_organizations());
            qc.invalidate_queries(&KeyFilter::all_organizations());
        },
    )
    .await
}

pub async fn update_organization_badge_settings<C>(
    qc: &QueryClient,
    api: &Arc<C>,
    id: &str,
    settings: &OrganizationBadgeSettingsUpdate,
) -> Result<OrganizationBadgeSettingsUpdate>
where
    C: OrganizationsApi + ?Sized,
{
    qc.mutate(
        RetryPolicy::NEVER,
        || api.update_badge_settings(id, settings),
        |qc, _| {
            qc.invalidate_queries(
                &QueryKey::OrganizationBadgeSettings { id: id.to_string() }.into(),
            );
        },
    )
    .await
}

/// Update an organization, then write the result into every cached
/// organization list that contains it.
pub async fn update_organization<C>(
    qc: &QueryClient,
    api: &Arc<C>,
    id: &str,
    update: &OrganizationUpdate,
) -> Result<Organization>
where
    C: OrganizationsApi + ?Sized,
{
    qc.mutate(
        RetryPolicy::NEVER,
        || api.update_organization(id, update),
        |qc, org| update_orgs_cache(qc, org),
    )
    .await
}

/// Replace the item with `org.id` in both cached organization lists.
///
/// Lists are edited as raw JSON so the other items keep their exact contents.
fn update_orgs_cache(qc: &QueryClient, org: &Organization) {
    let Ok(replacement) = serde_json::to_value(org) else {
        return;
    };

    for filter in [KeyFilter::admin_organizations(), KeyFilter::all_organizations()] {
        qc.set_queries_data(&filter, |list: Value| {
            replace_item(list, &org.id, &replacement)
        });
    }
}

fn replace_item(mut list: Value, id: &str, replacement: &Value) -> Value {
    if let Some(items) = list.get_mut("items").and_then(Value::as_array_mut) {
        for item in items.iter_mut() {
            if item.get("id").and_then(Value::as_str) == Some(id) {
                *item = replacement.clone();
            }
        }
    }
    list
}
