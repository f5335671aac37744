//! A cached connection to a single Kubernetes cluster
//!
//! `ClusterConnection` owns the client and the resource catalog discovered
//! when the connection was created, plus shared handles to the type
//! registry and relation table. All fields are immutable once constructed,
//! so a connection can be read concurrently without further
//! synchronization. The catalog is never refreshed: a resource kind
//! installed after connection creation is invisible until the process
//! recreates the connection.

use anyhow::{Context, Result, bail};
use futures::future::join_all;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::{Api, DynamicObject, ListParams, ResourceExt};
use kube::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::catalog::{self, ResourceCatalog, ResourceDescriptor, find_resources};
use crate::command::{self, CommandResult};
use crate::relations::{RelationDestination, RelationTable};
use crate::table::{self, TypeRegistry};

/// Cap on items fetched per kind, so one populous kind cannot produce an
/// unbounded response.
pub const LIST_LIMIT: u32 = 1000;

/// One kind's rendered table inside a multi-kind query result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindTable {
    #[serde(rename = "apiResource")]
    pub resource: ResourceDescriptor,
    pub table: table::ResourceTable,
}

/// Everything a single-object view needs: navigable relations, describe
/// text, yaml text, and whatever non-fatal errors accumulated on the way.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectView {
    pub relations: Vec<RelationDestination>,
    pub describe: String,
    pub yaml: String,
    pub errors: Vec<String>,
}

/// A connection to one cluster context.
pub struct ClusterConnection {
    context: String,
    client: Client,
    catalog: ResourceCatalog,
    types: Arc<TypeRegistry>,
    relations: Arc<RelationTable>,
}

impl ClusterConnection {
    /// Connect to a context and discover its catalog.
    ///
    /// Discovery is the one fatal dependency here: if it fails, no
    /// connection is created and nothing is cached.
    pub async fn connect(
        context: &str,
        types: Arc<TypeRegistry>,
        relations: Arc<RelationTable>,
    ) -> Result<Self> {
        let client = crate::kube::create_client_for_context(context)
            .await
            .with_context(|| format!("failed to connect to context '{}'", context))?;

        let catalog = catalog::fetch_catalog(&client)
            .await
            .with_context(|| format!("failed to discover resources for '{}'", context))?;

        Ok(Self {
            context: context.to_string(),
            client,
            catalog,
            types,
            relations,
        })
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Names of the cluster's namespaces.
    pub async fn namespaces(&self) -> Result<Vec<String>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .with_context(|| format!("unable to list namespaces for {}", self.context))?;
        Ok(list.items.iter().map(|ns| ns.name_any()).collect())
    }

    /// List and render every kind the token matches.
    ///
    /// Per-kind list calls run concurrently; a failure for one kind becomes
    /// an error table for that kind only. Tables with rows are moved ahead
    /// of empty ones, preserving catalog order within each group.
    pub async fn query(&self, namespace: &str, token: &str) -> Vec<KindTable> {
        let matches: Vec<ResourceDescriptor> = find_resources(&self.catalog, token)
            .into_iter()
            .cloned()
            .collect();
        tracing::info!("query '{}' matched {} kinds", token, matches.len());

        let tables = join_all(matches.into_iter().map(|rd| async move {
            let table = match self.list_instances(&rd, namespace).await {
                Ok(items) => table::render(&self.types, &rd, &items),
                Err(e) => {
                    tracing::error!("list failed for {}: {:#}", rd.plural, e);
                    table::error_table(&format!("{:#}", e))
                }
            };
            KindTable {
                resource: rd,
                table,
            }
        }))
        .await;

        order_query_results(tables)
    }

    /// Fetch one object and assemble its view.
    ///
    /// A missing kind or a failed fetch is fatal; yaml, describe and alias
    /// ambiguity problems are collected into the returned errors list
    /// alongside whatever did succeed.
    pub async fn get_object(&self, namespace: &str, kind: &str, name: &str) -> Result<ObjectView> {
        let mut errors = Vec::new();

        let matches = find_resources(&self.catalog, kind);
        let Some(&rd) = matches.first() else {
            bail!("unable to find an api resource: {}", kind);
        };
        if matches.len() > 1 {
            errors.push(format!(
                "found {} resource matches for '{}', using {}",
                matches.len(),
                kind,
                rd.group_version()
            ));
        }
        let rd = rd.clone();

        let obj = self.get_instance(&rd, namespace, name).await?;

        let yaml = match render_yaml(&obj) {
            Ok(yaml) => yaml,
            Err(e) => {
                errors.push(format!("unable to render yaml: {:#}", e));
                String::new()
            }
        };

        let describe = match self.types.describe(&rd, &obj) {
            Ok(describe) => describe,
            Err(e) => {
                errors.push(format!("unable to describe: {:#}", e));
                String::new()
            }
        };

        let relations = self.relations.relations_for(&obj, &rd.group_kind());

        Ok(ObjectView {
            relations,
            describe,
            yaml,
            errors,
        })
    }

    /// The object's YAML, without assembling a full view.
    pub async fn yaml(&self, namespace: &str, kind: &str, name: &str) -> Result<String> {
        let rd = self.descriptor_for(kind)?;
        let obj = self.get_instance(&rd, namespace, name).await?;
        render_yaml(&obj)
    }

    /// The object's describe text, without assembling a full view.
    pub async fn describe(&self, namespace: &str, kind: &str, name: &str) -> Result<String> {
        let rd = self.descriptor_for(kind)?;
        let obj = self.get_instance(&rd, namespace, name).await?;
        self.types.describe(&rd, &obj)
    }

    /// Classify one line of input against this connection's catalog.
    pub fn interpret(&self, input: &str) -> CommandResult {
        command::interpret(&self.catalog, input)
    }

    fn descriptor_for(&self, kind: &str) -> Result<ResourceDescriptor> {
        match find_resources(&self.catalog, kind).first() {
            Some(&rd) => Ok(rd.clone()),
            None => bail!("unable to find an api resource: {}", kind),
        }
    }

    async fn list_instances(
        &self,
        rd: &ResourceDescriptor,
        namespace: &str,
    ) -> Result<Vec<Value>> {
        let ar = rd.api_resource();
        let api: Api<DynamicObject> = if rd.namespaced && !namespace.is_empty() {
            Api::namespaced_with(self.client.clone(), namespace, &ar)
        } else {
            Api::all_with(self.client.clone(), &ar)
        };

        let params = ListParams::default().limit(LIST_LIMIT);
        let list = api
            .list(&params)
            .await
            .with_context(|| format!("list failed for {}", rd.plural))?;

        list.items
            .iter()
            .map(|obj| serde_json::to_value(obj).context("failed to serialize instance"))
            .collect()
    }

    async fn get_instance(
        &self,
        rd: &ResourceDescriptor,
        namespace: &str,
        name: &str,
    ) -> Result<Value> {
        let ar = rd.api_resource();
        let api: Api<DynamicObject> = if rd.namespaced {
            if namespace.is_empty() {
                bail!(
                    "namespaced resource, but an empty namespace name: {} '{}'",
                    rd.plural,
                    name
                );
            }
            Api::namespaced_with(self.client.clone(), namespace, &ar)
        } else {
            Api::all_with(self.client.clone(), &ar)
        };

        let obj = api
            .get(name)
            .await
            .with_context(|| format!("unable to get {} '{}'", rd.kind, name))?;
        serde_json::to_value(&obj).context("failed to serialize instance")
    }
}

/// Move tables with at least one row ahead of empty ones, preserving
/// catalog order within each group. A stable partition, not a sort.
pub fn order_query_results(tables: Vec<KindTable>) -> Vec<KindTable> {
    let (mut populated, empty): (Vec<_>, Vec<_>) = tables
        .into_iter()
        .partition(|kt| !kt.table.rows.is_empty());
    populated.extend(empty);
    populated
}

/// Render an object as YAML, dropping the managedFields noise.
pub fn render_yaml(obj: &Value) -> Result<String> {
    let mut obj = obj.clone();
    if let Some(metadata) = obj.get_mut("metadata").and_then(Value::as_object_mut) {
        metadata.remove("managedFields");
    }
    serde_yaml::to_string(&obj).context("unable to marshal object yaml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_yaml_strips_managed_fields() {
        let obj = json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {
                "name": "web",
                "managedFields": [{"manager": "kubectl"}]
            }
        });

        let yaml = render_yaml(&obj).unwrap();
        assert!(yaml.contains("name: web"));
        assert!(!yaml.contains("managedFields"));
    }
}
