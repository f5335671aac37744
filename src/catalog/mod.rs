//! Per-cluster resource catalog
//!
//! Discovers the set of resource kinds a cluster exposes and condenses it
//! into one descriptor per (group, kind): for multi-version groups only the
//! group's preferred version survives, and subresource entries are dropped.
//! The catalog is built once when a connection is created and never
//! refreshed for the connection's lifetime.

pub mod alias;

pub use alias::find_resources;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIGroup, APIResourceList};
use kube::Client;
use serde::Serialize;
use std::collections::HashSet;

/// Errors raised while building a catalog.
///
/// A transport failure during discovery is fatal to connection setup; a
/// malformed descriptor is logged and skipped by the builder and only
/// surfaces through [`split_group_version`] when called directly.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("discovery request failed: {0}")]
    Discovery(#[from] kube::Error),

    #[error("unexpected group/version format '{0}'")]
    MalformedGroupVersion(String),
}

/// Identity of one resource kind as exposed by the cluster.
///
/// Immutable once constructed; the catalog holds exactly one descriptor per
/// (group, kind) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// API group; empty string for the ungrouped core group.
    pub group: String,
    /// The surviving (preferred) version of the group.
    pub version: String,
    /// Kind name, e.g. "Pod".
    pub kind: String,
    /// Plural resource name, e.g. "pods". Never contains a path separator.
    pub plural: String,
    /// Lowercase singular name, e.g. "pod". May be empty for some servers.
    pub singular: String,
    /// Whether instances live inside a namespace.
    pub namespaced: bool,
    /// Short aliases like "po", "svc".
    pub short_names: Vec<String>,
    /// Category aliases like "all".
    pub categories: Vec<String>,
}

impl ResourceDescriptor {
    /// The apiVersion string: "v1" for core, "group/version" otherwise.
    pub fn group_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    pub fn group_kind(&self) -> crate::relations::GroupKind {
        crate::relations::GroupKind::new(&self.group, &self.kind)
    }

    /// Dynamic-api handle for listing/getting instances of this kind.
    pub fn api_resource(&self) -> kube::api::ApiResource {
        kube::api::ApiResource {
            group: self.group.clone(),
            version: self.version.clone(),
            api_version: self.group_version(),
            kind: self.kind.clone(),
            plural: self.plural.clone(),
        }
    }
}

/// Ordered collection of descriptors for one cluster context.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceCatalog {
    resources: Vec<ResourceDescriptor>,
}

impl ResourceCatalog {
    pub fn new(resources: Vec<ResourceDescriptor>) -> Self {
        Self { resources }
    }

    pub fn resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Split an apiVersion string into (group, version).
///
/// A bare version like "v1" denotes the ungrouped core group. Anything that
/// is not exactly one or two segments is malformed.
pub fn split_group_version(group_version: &str) -> Result<(String, String), CatalogError> {
    let parts: Vec<&str> = group_version.split('/').collect();
    match parts.as_slice() {
        [group, version] => Ok((group.to_string(), version.to_string())),
        // core resources like Pod are just "v1" with no group
        [version] => Ok((String::new(), version.to_string())),
        _ => Err(CatalogError::MalformedGroupVersion(
            group_version.to_string(),
        )),
    }
}

/// Subresources like "pods/log" are not listable kinds.
fn is_subresource(plural: &str) -> bool {
    plural.contains('/')
}

/// Build a catalog from already-fetched discovery data.
///
/// For every group reporting more than one version, all non-preferred
/// group/version pairs are excluded. Resource lists for excluded pairs are
/// skipped entirely; surviving lists contribute one descriptor per
/// non-subresource entry, in list order. Entries with a malformed
/// group/version are logged and skipped, never fatal.
pub fn build_catalog(groups: &[APIGroup], resource_lists: &[APIResourceList]) -> ResourceCatalog {
    let mut not_preferred: HashSet<String> = HashSet::new();
    for group in groups {
        if group.versions.len() > 1 {
            if let Some(preferred) = &group.preferred_version {
                for version in &group.versions {
                    if version.group_version != preferred.group_version {
                        not_preferred.insert(version.group_version.clone());
                    }
                }
            }
        }
    }

    let mut resources = Vec::new();
    for list in resource_lists {
        if not_preferred.contains(&list.group_version) {
            continue;
        }

        let (group, version) = match split_group_version(&list.group_version) {
            Ok(split) => split,
            Err(e) => {
                tracing::error!("skipping resource list {}: {}", list.group_version, e);
                continue;
            }
        };

        for resource in &list.resources {
            if is_subresource(&resource.name) {
                continue;
            }
            resources.push(ResourceDescriptor {
                group: group.clone(),
                version: version.clone(),
                kind: resource.kind.clone(),
                plural: resource.name.clone(),
                singular: resource.singular_name.clone(),
                namespaced: resource.namespaced,
                short_names: resource.short_names.clone().unwrap_or_default(),
                categories: resource.categories.clone().unwrap_or_default(),
            });
        }
    }

    ResourceCatalog::new(resources)
}

/// Run discovery against a live cluster and build its catalog.
///
/// This is the expensive one-time call behind connection creation; any
/// transport failure here aborts connection setup.
pub async fn fetch_catalog(client: &Client) -> Result<ResourceCatalog, CatalogError> {
    tracing::info!("fetching api resources (expensive, once per connection)");

    let mut resource_lists = Vec::new();

    let core_versions = client.list_core_api_versions().await?;
    for version in &core_versions.versions {
        resource_lists.push(client.list_core_api_resources(version).await?);
    }

    let group_list = client.list_api_groups().await?;
    for group in &group_list.groups {
        for version in &group.versions {
            resource_lists.push(
                client
                    .list_api_group_resources(&version.group_version)
                    .await?,
            );
        }
    }

    Ok(build_catalog(&group_list.groups, &resource_lists))
}
