//! Type identifiers for dynamically discovered resources.
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to parse group version: {0}")]
/// Failed to parse group version.
pub struct ParseGroupVersionError(pub String);

/// Core information about a family of API Resources
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersion {
    /// API group, empty for the core group
    pub group: String,
    /// Version
    pub version: String,
}

impl GroupVersion {
    /// Construct from explicit group and version
    pub fn gv(group_: &str, version_: &str) -> Self {
        let group = group_.to_string();
        let version = version_.to_string();
        Self { group, version }
    }

    /// Generate the apiVersion string used in a kind's yaml
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// Attach a kind to this group-version
    pub fn with_kind(&self, kind: &str) -> GroupVersionKind {
        GroupVersionKind::gvk(&self.group, &self.version, kind)
    }

    /// Attach a plural resource name to this group-version
    pub fn with_resource(&self, resource: &str) -> GroupVersionResource {
        GroupVersionResource::gvr(&self.group, &self.version, resource)
    }
}

impl FromStr for GroupVersion {
    type Err = ParseGroupVersionError;

    fn from_str(gv: &str) -> Result<Self, Self::Err> {
        let gvsplit = gv.splitn(2, '/').collect::<Vec<_>>();
        let (group, version) = match *gvsplit.as_slice() {
            [g, v] if !g.is_empty() && !v.is_empty() => (g.to_string(), v.to_string()),
            [v] if !v.is_empty() => ("".to_string(), v.to_string()), // core v1 case
            _ => return Err(ParseGroupVersionError(gv.into())),
        };
        // "a/b/c" splits into ["a", "b/c"]; reject versions with a leftover separator
        if version.contains('/') {
            return Err(ParseGroupVersionError(gv.into()));
        }
        Ok(Self { group, version })
    }
}

/// Core information about an API Resource.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionKind {
    /// API group
    pub group: String,
    /// Version
    pub version: String,
    /// Kind
    pub kind: String,
}

impl GroupVersionKind {
    /// Construct from explicit group, version, and kind
    pub fn gvk(group_: &str, version_: &str, kind_: &str) -> Self {
        let group = group_.to_string();
        let version = version_.to_string();
        let kind = kind_.to_string();
        Self { group, version, kind }
    }

    /// Generate the apiVersion string used in a kind's yaml
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

/// Represents a type-erased object resource.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionResource {
    /// API group
    pub group: String,
    /// Version
    pub version: String,
    /// Plural resource name
    pub resource: String,
}

impl GroupVersionResource {
    /// Set the api group, version, and the plural resource name.
    pub fn gvr(group_: &str, version_: &str, resource_: &str) -> Self {
        let group = group_.to_string();
        let version = version_.to_string();
        let resource = resource_.to_string();
        Self {
            group,
            version,
            resource,
        }
    }

    /// Generate the apiVersion string for the resource's group-version
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

/// A version-independent identifier of a resource within a group.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupResource {
    /// API group
    pub group: String,
    /// Plural resource name
    pub resource: String,
}

impl GroupResource {
    /// Construct from explicit group and plural resource name
    pub fn gr(group_: &str, resource_: &str) -> Self {
        let group = group_.to_string();
        let resource = resource_.to_string();
        Self { group, resource }
    }
}
