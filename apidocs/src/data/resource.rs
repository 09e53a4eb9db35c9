use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// API group plus version, e.g. `apps/v1` or the core group's `v1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GroupVersion {
    /// Empty for the core group.
    pub group: String,
    pub version: String,
}

impl GroupVersion {
    /// Parse a discovery `groupVersion` string.
    ///
    /// `v1` is the core group, `apps/v1` a named group. Anything with more than
    /// one `/` or without a version is rejected, which is stricter than
    /// apimachinery: it accepts `""` and `apps/` as empty versions.
    pub fn parse(group_version: &str) -> Result<Self, BuildError> {
        let invalid = |reason| BuildError::InvalidGroupVersion {
            group_version: group_version.to_string(),
            reason,
        };

        let (group, version) = match group_version.split_once('/') {
            None => ("", group_version),
            Some((_, rest)) if rest.contains('/') => {
                return Err(invalid("unexpected number of '/' separators"));
            }
            Some((group, version)) => (group, version),
        };

        if version.is_empty() {
            return Err(invalid("missing version"));
        }

        Ok(GroupVersion {
            group: group.to_string(),
            version: version.to_string(),
        })
    }

    /// Attach a resource name.
    pub fn with_resource(&self, resource: &str) -> GroupVersionResource {
        GroupVersionResource {
            group: self.group.clone(),
            version: self.version.clone(),
            resource: resource.to_string(),
        }
    }
}

impl fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.version)
        } else {
            write!(f, "{}/{}", self.group, self.version)
        }
    }
}

/// Fully-qualified resource type identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GroupVersionResource {
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl GroupVersionResource {
    pub fn group_version(&self) -> GroupVersion {
        GroupVersion {
            group: self.group.clone(),
            version: self.version.clone(),
        }
    }
}

impl fmt::Display for GroupVersionResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Resource={}", self.group_version(), self.resource)
    }
}

/// One resource entry from discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiResource {
    /// Plural resource name, e.g. `deployments`.
    pub name: String,
    /// Kind, e.g. `Deployment`.
    pub kind: String,
    #[serde(default)]
    pub singular_name: String,
    #[serde(default)]
    pub short_names: Vec<String>,
}

impl ApiResource {
    /// Every name a user may type to address this resource.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        [self.name.as_str(), self.kind.as_str(), self.singular_name.as_str()]
            .into_iter()
            .chain(self.short_names.iter().map(String::as_str))
            .filter(|s| !s.is_empty())
    }
}

/// Preferred resources of one group/version, as returned by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    pub group_version: String,
    #[serde(default)]
    pub resources: Vec<ApiResource>,
}
