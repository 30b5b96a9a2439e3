//! The interface presented by the discovery client
//!
//! The cache does not talk to the apiserver itself; it consumes the flattened
//! catalog a discovery client produces (one [`ApiResourceList`] per served
//! group-version, shaped like `meta/v1` `APIResourceList`). Any client that
//! can enumerate the server's resources can back a
//! [`ResourceMap`](crate::map::ResourceMap) by implementing
//! [`DiscoverySource`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A raw resource entry within an [`ApiResourceList`]
///
/// Mirrors the `meta/v1` `APIResource` fields the cache consumes. A `name`
/// containing a `/` denotes a subresource record (e.g. `deployments/status`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResourceSpec {
    /// Plural name of the resource, or `resource/subresource` for subresource records
    pub name: String,
    /// Singular PascalCase name of the resource
    pub kind: String,
    /// Preferred group of the resource when it differs from the list's group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Preferred version of the resource when it differs from the list's version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Whether the resource is namespaced
    pub namespaced: bool,
    /// Supported verbs on this resource
    #[serde(default)]
    pub verbs: Vec<String>,
}

/// All raw resource entries served under one group-version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResourceList {
    /// The group-version string, e.g. `apps/v1`, or `v1` for the core group
    pub group_version: String,
    /// The resource entries served under this group-version
    pub resources: Vec<ApiResourceSpec>,
}

/// An enumeration source for the cluster's full API surface
///
/// Implementations are expected to be expensive and fallible (usually a
/// `N+2` request scan against the apiserver); the cache only invokes them
/// from its background refresh loop, never on the lookup path. The handle is
/// shared read-only across the lifetime of the cache, so implementations
/// must be safe to call from a background task.
#[async_trait]
pub trait DiscoverySource: Send + Sync {
    /// Enumerate every resource entry served by the cluster, grouped by group-version
    ///
    /// Enumeration order is irrelevant; the cache keys everything by name.
    async fn server_resources(&self) -> Result<Vec<ApiResourceList>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_api_resource_list() {
        let list: ApiResourceList = serde_json::from_value(serde_json::json!({
            "groupVersion": "apps/v1",
            "resources": [
                {"name": "deployments", "kind": "Deployment", "namespaced": true, "verbs": ["get", "list"]},
                {"name": "deployments/status", "kind": "Deployment", "namespaced": true},
            ],
        }))
        .unwrap();
        assert_eq!(list.group_version, "apps/v1");
        assert_eq!(list.resources.len(), 2);
        assert_eq!(list.resources[0].verbs, vec!["get", "list"]);
        assert_eq!(list.resources[1].name, "deployments/status");
        assert!(list.resources[1].verbs.is_empty());
        assert_eq!(list.resources[1].group, None);
    }
}
