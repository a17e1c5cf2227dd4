//! Typed query keys
//!
//! Every cached read is identified by a [`QueryKey`]. Keys flatten to an
//! ordered tuple of [`KeySegment`]s (resource kind first, discriminating
//! parameters after), which is what prefix filters match against and what
//! the persistent tier hashes into its storage key.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::client::models::Platforms;

/// One element of a flattened query key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeySegment {
    Str(String),
    Bool(bool),
    Int(i64),
}

impl From<&str> for KeySegment {
    fn from(s: &str) -> Self {
        KeySegment::Str(s.to_string())
    }
}

impl From<bool> for KeySegment {
    fn from(b: bool) -> Self {
        KeySegment::Bool(b)
    }
}

/// Key of a cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// `["user", "adminOrganizations"]`
    AdminOrganizations,
    /// `["user", "allOrganizations", admin_only]`
    AllOrganizations { admin_only: bool },
    /// `["organizations", name]`. The platform is not part of the key.
    OrganizationLookup { name: String, platform: Platforms },
    /// `["organization", id]`
    Organization { id: String },
    /// `["organizationMembers", id]`
    OrganizationMembers { id: String },
    /// `["organizationBadgeSettings", id]`
    OrganizationBadgeSettings { id: String },
    /// `["organizationCredits", id]`
    OrganizationCredits { id: String },
}

impl QueryKey {
    #[allow(dead_code)]
    pub fn organization_lookup(name: impl Into<String>) -> Self {
        QueryKey::OrganizationLookup {
            name: name.into(),
            platform: Platforms::default(),
        }
    }

    /// Flattened key segments.
    pub fn segments(&self) -> Vec<KeySegment> {
        match self {
            QueryKey::AdminOrganizations => vec!["user".into(), "adminOrganizations".into()],
            QueryKey::AllOrganizations { admin_only } => vec![
                "user".into(),
                "allOrganizations".into(),
                (*admin_only).into(),
            ],
            QueryKey::OrganizationLookup { name, .. } => {
                vec!["organizations".into(), name.as_str().into()]
            }
            QueryKey::Organization { id } => vec!["organization".into(), id.as_str().into()],
            QueryKey::OrganizationMembers { id } => {
                vec!["organizationMembers".into(), id.as_str().into()]
            }
            QueryKey::OrganizationBadgeSettings { id } => {
                vec!["organizationBadgeSettings".into(), id.as_str().into()]
            }
            QueryKey::OrganizationCredits { id } => {
                vec!["organizationCredits".into(), id.as_str().into()]
            }
        }
    }

    /// First segment; always the resource kind.
    pub fn root(&self) -> &'static str {
        match self {
            QueryKey::AdminOrganizations | QueryKey::AllOrganizations { .. } => "user",
            QueryKey::OrganizationLookup { .. } => "organizations",
            QueryKey::Organization { .. } => "organization",
            QueryKey::OrganizationMembers { .. } => "organizationMembers",
            QueryKey::OrganizationBadgeSettings { .. } => "organizationBadgeSettings",
            QueryKey::OrganizationCredits { .. } => "organizationCredits",
        }
    }

    /// Deterministic SHA-256 of the segments, used as the persistent storage key.
    pub fn storage_key(&self) -> String {
        storage_key(&self.segments())
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let json = serde_json::to_string(&self.segments()).map_err(|_| std::fmt::Error)?;
        f.write_str(&json)
    }
}

/// Hash a segment tuple into a hex storage key.
///
/// Each segment is hashed as a type tag, its byte length and its bytes, so
/// segment boundaries cannot be forged by separator characters in a value.
pub fn storage_key(segments: &[KeySegment]) -> String {
    let mut hasher = Sha256::new();

    for segment in segments {
        let (tag, bytes): (&[u8], Vec<u8>) = match segment {
            KeySegment::Str(s) => (b"s", s.as_bytes().to_vec()),
            KeySegment::Bool(b) => (b"b", vec![u8::from(*b)]),
            KeySegment::Int(i) => (b"i", i.to_be_bytes().to_vec()),
        };
        hasher.update(tag);
        hasher.update((bytes.len() as u64).to_be_bytes());
        hasher.update(&bytes);
    }

    format!("{:x}", hasher.finalize())
}

/// Selects cached entries for invalidation, bulk updates and removal.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyFilter {
    /// Exactly one key
    Exact(QueryKey),
    /// Every key whose segments start with these
    Prefix(Vec<KeySegment>),
}

impl KeyFilter {
    /// Every cached key.
    #[allow(dead_code)]
    pub fn all() -> Self {
        KeyFilter::Prefix(Vec::new())
    }

    /// `["user", "allOrganizations"]`, matching both `admin_only` variants.
    pub fn all_organizations() -> Self {
        KeyFilter::Prefix(vec!["user".into(), "allOrganizations".into()])
    }

    pub fn admin_organizations() -> Self {
        KeyFilter::Exact(QueryKey::AdminOrganizations)
    }

    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            KeyFilter::Exact(exact) => exact == key,
            KeyFilter::Prefix(_) => self.matches_segments(&key.segments()),
        }
    }

    pub fn matches_segments(&self, segments: &[KeySegment]) -> bool {
        match self {
            KeyFilter::Exact(exact) => exact.segments() == segments,
            KeyFilter::Prefix(prefix) => segments.starts_with(prefix),
        }
    }

    /// Resource kind the filter is confined to, if any.
    pub fn root(&self) -> Option<String> {
        match self {
            KeyFilter::Exact(key) => Some(key.root().to_string()),
            KeyFilter::Prefix(prefix) => match prefix.first() {
                Some(KeySegment::Str(root)) => Some(root.clone()),
                _ => None,
            },
        }
    }
}

impl From<QueryKey> for KeyFilter {
    fn from(key: QueryKey) -> Self {
        KeyFilter::Exact(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_match_key_shape() {
        assert_eq!(
            serde_json::to_string(&QueryKey::AllOrganizations { admin_only: false }.segments())
                .unwrap(),
            r#"["user","allOrganizations",false]"#
        );
        assert_eq!(
            QueryKey::organization_lookup("acme").to_string(),
            r#"["organizations","acme"]"#
        );
    }

    #[test]
    fn test_root_is_first_segment() {
        let keys = [
            QueryKey::AdminOrganizations,
            QueryKey::AllOrganizations { admin_only: true },
            QueryKey::organization_lookup("acme"),
            QueryKey::Organization { id: "o1".into() },
            QueryKey::OrganizationMembers { id: "o1".into() },
            QueryKey::OrganizationBadgeSettings { id: "o1".into() },
            QueryKey::OrganizationCredits { id: "o1".into() },
        ];
        for key in keys {
            assert_eq!(key.segments()[0], KeySegment::from(key.root()));
        }
    }

    #[test]
    fn test_storage_key_deterministic() {
        let key1 = QueryKey::Organization { id: "o1".into() }.storage_key();
        let key2 = QueryKey::Organization { id: "o1".into() }.storage_key();
        assert_eq!(key1, key2);
        assert_eq!(key1.len(), 64);
    }

    #[test]
    fn test_storage_key_distinguishes_kinds_and_params() {
        let org = QueryKey::Organization { id: "o1".into() }.storage_key();
        let members = QueryKey::OrganizationMembers { id: "o1".into() }.storage_key();
        let other = QueryKey::Organization { id: "o2".into() }.storage_key();
        assert_ne!(org, members);
        assert_ne!(org, other);

        // A string "true" is not the boolean true
        let b = storage_key(&["x".into(), true.into()]);
        let s = storage_key(&["x".into(), "true".into()]);
        assert_ne!(b, s);
    }

    #[test]
    fn test_storage_key_segment_boundaries() {
        let joined = storage_key(&["a|s:b".into()]);
        let split = storage_key(&["a".into(), "b".into()]);
        assert_ne!(joined, split);

        assert_ne!(
            storage_key(&["ab".into(), "c".into()]),
            storage_key(&["a".into(), "bc".into()])
        );
        assert_ne!(storage_key(&[]), storage_key(&["".into()]));
    }

    #[test]
    fn test_prefix_filter_matches_both_all_org_variants() {
        let filter = KeyFilter::all_organizations();
        assert!(filter.matches(&QueryKey::AllOrganizations { admin_only: true }));
        assert!(filter.matches(&QueryKey::AllOrganizations { admin_only: false }));
        assert!(!filter.matches(&QueryKey::AdminOrganizations));
    }

    #[test]
    fn test_exact_filter() {
        let filter = KeyFilter::from(QueryKey::OrganizationMembers { id: "o1".into() });
        assert!(filter.matches(&QueryKey::OrganizationMembers { id: "o1".into() }));
        assert!(!filter.matches(&QueryKey::OrganizationMembers { id: "o2".into() }));
        assert_eq!(filter.root().as_deref(), Some("organizationMembers"));
    }

    #[test]
    fn test_all_filter_matches_everything() {
        let filter = KeyFilter::all();
        assert!(filter.matches(&QueryKey::AdminOrganizations));
        assert!(filter.matches(&QueryKey::OrganizationCredits { id: "x".into() }));
        assert!(filter.root().is_none());
    }
}
