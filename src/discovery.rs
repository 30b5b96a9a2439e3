//! Type information structs for API discovery
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    gvk::{GroupResource, GroupVersion, GroupVersionKind, GroupVersionResource},
    source::ApiResourceSpec,
};

/// Rbac verbs for [`ApiResource`]
pub mod verbs {
    /// Create a resource
    pub const CREATE: &str = "create";
    /// Get single resource
    pub const GET: &str = "get";
    /// List objects
    pub const LIST: &str = "list";
    /// Watch for objects changes
    pub const WATCH: &str = "watch";
    /// Delete single object
    pub const DELETE: &str = "delete";
    /// Delete multiple objects at once
    pub const DELETE_COLLECTION: &str = "deletecollection";
    /// Update an object
    pub const UPDATE: &str = "update";
    /// Patch an object
    pub const PATCH: &str = "patch";
}

/// Information about a discovered Kubernetes API resource
///
/// Resolved from the raw catalog returned by a [`DiscoverySource`]: blank
/// group/version fields have been defaulted from the owning group-version,
/// and subresource records (raw names like `deployments/status`) have been
/// folded into the `subresources` set of their owning resource. The derived
/// identifier accessors are therefore pure and cannot fail.
///
/// [`DiscoverySource`]: crate::source::DiscoverySource
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ApiResource {
    /// Resource group, empty for core group.
    pub group: String,
    /// group version
    pub version: String,
    /// Singular PascalCase name of the resource
    pub kind: String,
    /// Plural name of the resource
    pub plural: String,
    /// Whether the resource is namespaced
    pub namespaced: bool,
    /// Supported verbs on this resource
    pub verbs: Vec<String>,
    /// Names of the subresources this resource serves, e.g. `status`
    pub subresources: BTreeSet<String>,
}

impl ApiResource {
    /// Creates an `ApiResource` from a raw catalog entry plus its owning group-version.
    ///
    /// If the entry does not specify group and/or version they are taken from `gv`.
    ///
    /// NB: not meaningful for subresource entries (their compound names are
    /// folded into the owning resource during a refresh instead).
    pub fn from_spec(spec: &ApiResourceSpec, gv: &GroupVersion) -> Self {
        ApiResource {
            group: spec.group.clone().unwrap_or_else(|| gv.group.clone()),
            version: spec.version.clone().unwrap_or_else(|| gv.version.clone()),
            kind: spec.kind.clone(),
            plural: spec.name.clone(),
            namespaced: spec.namespaced,
            verbs: spec.verbs.clone(),
            subresources: BTreeSet::new(),
        }
    }

    /// Returns the group-version of this resource
    pub fn group_version(&self) -> GroupVersion {
        GroupVersion::gv(&self.group, &self.version)
    }

    /// Generate the apiVersion string used in a kind's yaml
    pub fn api_version(&self) -> String {
        self.group_version().api_version()
    }

    /// Returns the fully qualified kind identifier of this resource
    pub fn group_version_kind(&self) -> GroupVersionKind {
        GroupVersionKind::gvk(&self.group, &self.version, &self.kind)
    }

    /// Returns the fully qualified resource identifier of this resource
    pub fn group_version_resource(&self) -> GroupVersionResource {
        GroupVersionResource::gvr(&self.group, &self.version, &self.plural)
    }

    /// Returns the version-independent resource identifier of this resource
    pub fn group_resource(&self) -> GroupResource {
        GroupResource::gr(&self.group, &self.plural)
    }

    /// Checks whether this resource serves the given subresource, e.g. `status`
    ///
    /// A resource with no subresources answers `false` for every key.
    pub fn has_subresource(&self, subresource: &str) -> bool {
        self.subresources.contains(subresource)
    }

    /// Checks that given verb is supported on this resource.
    pub fn supports_operation(&self, operation: &str) -> bool {
        self.verbs.iter().any(|op| op == operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deployments() -> ApiResource {
        ApiResource::from_spec(
            &ApiResourceSpec {
                name: "deployments".into(),
                kind: "Deployment".into(),
                group: None,
                version: None,
                namespaced: true,
                verbs: vec![verbs::GET.into(), verbs::LIST.into()],
            },
            &GroupVersion::gv("apps", "v1"),
        )
    }

    #[test]
    fn defaults_group_version_from_owning_group_version() {
        let ar = deployments();
        assert_eq!(ar.group, "apps");
        assert_eq!(ar.version, "v1");
        assert_eq!(ar.api_version(), "apps/v1");
    }

    #[test]
    fn explicit_group_version_wins_over_default() {
        let ar = ApiResource::from_spec(
            &ApiResourceSpec {
                name: "scales".into(),
                kind: "Scale".into(),
                group: Some("autoscaling".into()),
                version: Some("v2".into()),
                namespaced: true,
                verbs: vec![],
            },
            &GroupVersion::gv("apps", "v1"),
        );
        assert_eq!(ar.group, "autoscaling");
        assert_eq!(ar.version, "v2");
    }

    #[test]
    fn derived_identifiers() {
        let ar = deployments();
        assert_eq!(ar.group_version(), GroupVersion::gv("apps", "v1"));
        assert_eq!(
            ar.group_version_kind(),
            GroupVersionKind::gvk("apps", "v1", "Deployment")
        );
        assert_eq!(
            ar.group_version_resource(),
            GroupVersionResource::gvr("apps", "v1", "deployments")
        );
        assert_eq!(ar.group_resource(), GroupResource::gr("apps", "deployments"));
    }

    #[test]
    fn subresources_and_verbs() {
        let mut ar = deployments();
        assert!(!ar.has_subresource("status"));
        ar.subresources.insert("status".into());
        assert!(ar.has_subresource("status"));
        assert!(!ar.has_subresource("scale"));

        assert!(ar.supports_operation(verbs::LIST));
        assert!(!ar.supports_operation(verbs::PATCH));
    }
}
