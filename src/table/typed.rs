//! Structured-type capability registry
//!
//! The rendering fast path: well-known kinds are registered here with a
//! decoder into their k8s-openapi struct, kubectl-style column generators
//! and (for a few kinds) a typed describer. Everything else stays on the
//! generic fallback. Registration is keyed by group/version, with per-kind
//! generators inside a registered version.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::{
    ConfigMap, Namespace, Node, Pod, Secret, Service, ServiceAccount,
};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use super::{ResourceTable, TableColumn, TableRow, format_age_since};
use crate::catalog::ResourceDescriptor;

const RBAC_V1: &str = "rbac.authorization.k8s.io/v1";

/// Column layout plus row/describe generators for one registered kind.
struct KindHandler {
    group_version: &'static str,
    kind: &'static str,
    columns: &'static [(&'static str, &'static str, &'static str)],
    row: fn(&Value) -> Result<Vec<Value>>,
    describe: Option<fn(&Value) -> Result<String>>,
}

/// Capability table mapping well-known kinds to structured decoders.
///
/// Built once per process and shared by every connection; never mutated
/// after construction.
pub struct TypeRegistry {
    handlers: Vec<KindHandler>,
    versions: HashSet<&'static str>,
}

impl TypeRegistry {
    /// The registry of kinds this build knows how to decode.
    pub fn builtin() -> Self {
        let handlers = vec![
            KindHandler {
                group_version: "v1",
                kind: "Pod",
                columns: &[
                    ("Name", "string", "Name must be unique within a namespace."),
                    ("Ready", "string", "Ready containers out of total."),
                    ("Status", "string", "Aggregate pod phase."),
                    ("Restarts", "integer", "Container restarts summed."),
                    ("Age", "string", "Time since creation."),
                ],
                row: pod_row,
                describe: Some(pod_describe),
            },
            KindHandler {
                group_version: "v1",
                kind: "Service",
                columns: &[
                    ("Name", "string", "Name must be unique within a namespace."),
                    ("Type", "string", "How the service is exposed."),
                    ("Cluster-IP", "string", "Cluster-internal IP."),
                    ("Ports", "string", "Exposed ports."),
                    ("Age", "string", "Time since creation."),
                ],
                row: service_row,
                describe: Some(service_describe),
            },
            KindHandler {
                group_version: "v1",
                kind: "Namespace",
                columns: &[
                    ("Name", "string", "Name must be unique."),
                    ("Status", "string", "Namespace lifecycle phase."),
                    ("Age", "string", "Time since creation."),
                ],
                row: namespace_row,
                describe: None,
            },
            KindHandler {
                group_version: "v1",
                kind: "Node",
                columns: &[
                    ("Name", "string", "Name must be unique."),
                    ("Status", "string", "Ready condition of the node."),
                    ("Age", "string", "Time since creation."),
                ],
                row: node_row,
                describe: None,
            },
            KindHandler {
                group_version: "v1",
                kind: "ConfigMap",
                columns: &[
                    ("Name", "string", "Name must be unique within a namespace."),
                    ("Data", "integer", "Number of data keys."),
                    ("Age", "string", "Time since creation."),
                ],
                row: config_map_row,
                describe: None,
            },
            KindHandler {
                group_version: "v1",
                kind: "Secret",
                columns: &[
                    ("Name", "string", "Name must be unique within a namespace."),
                    ("Type", "string", "Secret type."),
                    ("Data", "integer", "Number of data keys."),
                    ("Age", "string", "Time since creation."),
                ],
                row: secret_row,
                describe: None,
            },
            KindHandler {
                group_version: "v1",
                kind: "ServiceAccount",
                columns: &[
                    ("Name", "string", "Name must be unique within a namespace."),
                    ("Secrets", "integer", "Number of mountable secrets."),
                    ("Age", "string", "Time since creation."),
                ],
                row: service_account_row,
                describe: None,
            },
            KindHandler {
                group_version: "apps/v1",
                kind: "Deployment",
                columns: &[
                    ("Name", "string", "Name must be unique within a namespace."),
                    ("Ready", "string", "Ready replicas out of desired."),
                    ("Up-to-date", "integer", "Replicas at the desired template."),
                    ("Available", "integer", "Replicas available to users."),
                    ("Age", "string", "Time since creation."),
                ],
                row: deployment_row,
                describe: Some(deployment_describe),
            },
            KindHandler {
                group_version: "apps/v1",
                kind: "ReplicaSet",
                columns: &[
                    ("Name", "string", "Name must be unique within a namespace."),
                    ("Desired", "integer", "Desired replicas."),
                    ("Current", "integer", "Observed replicas."),
                    ("Ready", "integer", "Ready replicas."),
                    ("Age", "string", "Time since creation."),
                ],
                row: replica_set_row,
                describe: None,
            },
            KindHandler {
                group_version: "apps/v1",
                kind: "DaemonSet",
                columns: &[
                    ("Name", "string", "Name must be unique within a namespace."),
                    ("Desired", "integer", "Nodes that should run the pod."),
                    ("Current", "integer", "Nodes running the pod."),
                    ("Ready", "integer", "Nodes with a ready pod."),
                    ("Age", "string", "Time since creation."),
                ],
                row: daemon_set_row,
                describe: None,
            },
            KindHandler {
                group_version: "apps/v1",
                kind: "StatefulSet",
                columns: &[
                    ("Name", "string", "Name must be unique within a namespace."),
                    ("Ready", "string", "Ready replicas out of desired."),
                    ("Age", "string", "Time since creation."),
                ],
                row: stateful_set_row,
                describe: None,
            },
            KindHandler {
                group_version: "batch/v1",
                kind: "Job",
                columns: &[
                    ("Name", "string", "Name must be unique within a namespace."),
                    ("Completions", "string", "Succeeded pods out of required."),
                    ("Age", "string", "Time since creation."),
                ],
                row: job_row,
                describe: None,
            },
            KindHandler {
                group_version: "batch/v1",
                kind: "CronJob",
                columns: &[
                    ("Name", "string", "Name must be unique within a namespace."),
                    ("Schedule", "string", "Cron schedule expression."),
                    ("Suspend", "string", "Whether new runs are suspended."),
                    ("Age", "string", "Time since creation."),
                ],
                row: cron_job_row,
                describe: None,
            },
            KindHandler {
                group_version: RBAC_V1,
                kind: "Role",
                columns: &[
                    ("Name", "string", "Name must be unique within a namespace."),
                    ("Age", "string", "Time since creation."),
                ],
                row: role_row,
                describe: None,
            },
            KindHandler {
                group_version: RBAC_V1,
                kind: "ClusterRole",
                columns: &[
                    ("Name", "string", "Name must be unique."),
                    ("Age", "string", "Time since creation."),
                ],
                row: cluster_role_row,
                describe: None,
            },
            KindHandler {
                group_version: RBAC_V1,
                kind: "RoleBinding",
                columns: &[
                    ("Name", "string", "Name must be unique within a namespace."),
                    ("Role", "string", "Referenced role."),
                    ("Age", "string", "Time since creation."),
                ],
                row: role_binding_row,
                describe: Some(binding_describe),
            },
            KindHandler {
                group_version: RBAC_V1,
                kind: "ClusterRoleBinding",
                columns: &[
                    ("Name", "string", "Name must be unique."),
                    ("Role", "string", "Referenced role."),
                    ("Age", "string", "Time since creation."),
                ],
                row: cluster_role_binding_row,
                describe: Some(binding_describe),
            },
        ];

        let versions = handlers.iter().map(|h| h.group_version).collect();
        Self { handlers, versions }
    }

    /// Whether any kind of this group/version has a structured decoder.
    pub fn is_registered(&self, group_version: &str) -> bool {
        self.versions.contains(group_version)
    }

    fn handler(&self, group_version: &str, kind: &str) -> Option<&KindHandler> {
        self.handlers
            .iter()
            .find(|h| h.group_version == group_version && h.kind == kind)
    }

    /// Run the registered column/row generator for this descriptor.
    ///
    /// Returns `Ok(None)` when the group/version is registered but this
    /// particular kind has no generator (the caller falls back to the
    /// generic table). Rows carry the source object until the presenter
    /// strips it.
    pub fn render_typed(
        &self,
        rd: &ResourceDescriptor,
        items: &[Value],
    ) -> Result<Option<ResourceTable>> {
        let Some(handler) = self.handler(&rd.group_version(), &rd.kind) else {
            return Ok(None);
        };

        let columns = handler
            .columns
            .iter()
            .map(|(name, data_type, description)| TableColumn::new(name, data_type, description))
            .collect();

        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            let cells = (handler.row)(item)
                .with_context(|| format!("failed to generate row for {}", rd.kind))?;
            rows.push(TableRow {
                cells,
                object: Some(item.clone()),
            });
        }

        Ok(Some(ResourceTable {
            columns,
            rows,
            row_names: Vec::new(),
            is_error: false,
        }))
    }

    /// Describe one instance: the registered describer when the kind has
    /// one, a generic metadata rendering otherwise.
    pub fn describe(&self, rd: &ResourceDescriptor, obj: &Value) -> Result<String> {
        match self
            .handler(&rd.group_version(), &rd.kind)
            .and_then(|h| h.describe)
        {
            Some(describer) => describer(obj),
            None => Ok(generic_describe(obj)),
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn decode<T: serde::de::DeserializeOwned>(obj: &Value, kind: &str) -> Result<T> {
    serde_json::from_value(obj.clone()).with_context(|| format!("failed to decode {}", kind))
}

fn name_cell(meta: &ObjectMeta) -> Value {
    Value::String(meta.name.clone().unwrap_or_default())
}

fn age_cell(meta: &ObjectMeta) -> Value {
    let age = match &meta.creation_timestamp {
        Some(time) => format_age_since(time.0),
        None => "<unknown>".to_string(),
    };
    Value::String(age)
}

fn pod_row(obj: &Value) -> Result<Vec<Value>> {
    let pod: Pod = decode(obj, "Pod")?;
    let total = pod.spec.as_ref().map_or(0, |s| s.containers.len());
    let statuses = pod
        .status
        .as_ref()
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or(&[]);
    let ready = statuses.iter().filter(|c| c.ready).count();
    let restarts: i32 = statuses.iter().map(|c| c.restart_count).sum();
    let phase = pod
        .status
        .as_ref()
        .and_then(|s| s.reason.clone().or_else(|| s.phase.clone()))
        .unwrap_or_default();

    Ok(vec![
        name_cell(&pod.metadata),
        Value::String(format!("{}/{}", ready, total)),
        Value::String(phase),
        Value::from(restarts),
        age_cell(&pod.metadata),
    ])
}

fn service_row(obj: &Value) -> Result<Vec<Value>> {
    let svc: Service = decode(obj, "Service")?;
    let spec = svc.spec.as_ref();
    let ports = spec
        .and_then(|s| s.ports.as_ref())
        .map(|ports| {
            ports
                .iter()
                .map(|p| {
                    format!("{}/{}", p.port, p.protocol.as_deref().unwrap_or("TCP"))
                })
                .collect::<Vec<_>>()
                .join(",")
        })
        .unwrap_or_else(|| "<none>".to_string());

    Ok(vec![
        name_cell(&svc.metadata),
        Value::String(
            spec.and_then(|s| s.type_.clone())
                .unwrap_or_else(|| "ClusterIP".to_string()),
        ),
        Value::String(
            spec.and_then(|s| s.cluster_ip.clone())
                .unwrap_or_else(|| "<none>".to_string()),
        ),
        Value::String(ports),
        age_cell(&svc.metadata),
    ])
}

fn namespace_row(obj: &Value) -> Result<Vec<Value>> {
    let ns: Namespace = decode(obj, "Namespace")?;
    let phase = ns
        .status
        .as_ref()
        .and_then(|s| s.phase.clone())
        .unwrap_or_default();
    Ok(vec![
        name_cell(&ns.metadata),
        Value::String(phase),
        age_cell(&ns.metadata),
    ])
}

fn node_row(obj: &Value) -> Result<Vec<Value>> {
    let node: Node = decode(obj, "Node")?;
    let ready = node
        .status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .and_then(|conditions| conditions.iter().find(|c| c.type_ == "Ready"))
        .map(|c| c.status == "True")
        .unwrap_or(false);
    let status = if ready { "Ready" } else { "NotReady" };
    Ok(vec![
        name_cell(&node.metadata),
        Value::String(status.to_string()),
        age_cell(&node.metadata),
    ])
}

fn config_map_row(obj: &Value) -> Result<Vec<Value>> {
    let cm: ConfigMap = decode(obj, "ConfigMap")?;
    let keys = cm.data.as_ref().map_or(0, |d| d.len());
    Ok(vec![
        name_cell(&cm.metadata),
        Value::from(keys),
        age_cell(&cm.metadata),
    ])
}

fn secret_row(obj: &Value) -> Result<Vec<Value>> {
    let secret: Secret = decode(obj, "Secret")?;
    let keys = secret.data.as_ref().map_or(0, |d| d.len());
    Ok(vec![
        name_cell(&secret.metadata),
        Value::String(secret.type_.clone().unwrap_or_default()),
        Value::from(keys),
        age_cell(&secret.metadata),
    ])
}

fn service_account_row(obj: &Value) -> Result<Vec<Value>> {
    let sa: ServiceAccount = decode(obj, "ServiceAccount")?;
    let secrets = sa.secrets.as_ref().map_or(0, |s| s.len());
    Ok(vec![
        name_cell(&sa.metadata),
        Value::from(secrets),
        age_cell(&sa.metadata),
    ])
}

fn deployment_row(obj: &Value) -> Result<Vec<Value>> {
    let deploy: Deployment = decode(obj, "Deployment")?;
    let desired = deploy.spec.as_ref().and_then(|s| s.replicas).unwrap_or(0);
    let status = deploy.status.as_ref();
    let ready = status.and_then(|s| s.ready_replicas).unwrap_or(0);
    Ok(vec![
        name_cell(&deploy.metadata),
        Value::String(format!("{}/{}", ready, desired)),
        Value::from(status.and_then(|s| s.updated_replicas).unwrap_or(0)),
        Value::from(status.and_then(|s| s.available_replicas).unwrap_or(0)),
        age_cell(&deploy.metadata),
    ])
}

fn replica_set_row(obj: &Value) -> Result<Vec<Value>> {
    let rs: ReplicaSet = decode(obj, "ReplicaSet")?;
    let desired = rs.spec.as_ref().and_then(|s| s.replicas).unwrap_or(0);
    let status = rs.status.as_ref();
    Ok(vec![
        name_cell(&rs.metadata),
        Value::from(desired),
        Value::from(status.map(|s| s.replicas).unwrap_or(0)),
        Value::from(status.and_then(|s| s.ready_replicas).unwrap_or(0)),
        age_cell(&rs.metadata),
    ])
}

fn daemon_set_row(obj: &Value) -> Result<Vec<Value>> {
    let ds: DaemonSet = decode(obj, "DaemonSet")?;
    let status = ds.status.as_ref();
    Ok(vec![
        name_cell(&ds.metadata),
        Value::from(status.map(|s| s.desired_number_scheduled).unwrap_or(0)),
        Value::from(status.map(|s| s.current_number_scheduled).unwrap_or(0)),
        Value::from(status.map(|s| s.number_ready).unwrap_or(0)),
        age_cell(&ds.metadata),
    ])
}

fn stateful_set_row(obj: &Value) -> Result<Vec<Value>> {
    let sts: StatefulSet = decode(obj, "StatefulSet")?;
    let desired = sts.spec.as_ref().and_then(|s| s.replicas).unwrap_or(0);
    let ready = sts
        .status
        .as_ref()
        .and_then(|s| s.ready_replicas)
        .unwrap_or(0);
    Ok(vec![
        name_cell(&sts.metadata),
        Value::String(format!("{}/{}", ready, desired)),
        age_cell(&sts.metadata),
    ])
}

fn job_row(obj: &Value) -> Result<Vec<Value>> {
    let job: Job = decode(obj, "Job")?;
    let required = job.spec.as_ref().and_then(|s| s.completions).unwrap_or(1);
    let succeeded = job.status.as_ref().and_then(|s| s.succeeded).unwrap_or(0);
    Ok(vec![
        name_cell(&job.metadata),
        Value::String(format!("{}/{}", succeeded, required)),
        age_cell(&job.metadata),
    ])
}

fn cron_job_row(obj: &Value) -> Result<Vec<Value>> {
    let cj: CronJob = decode(obj, "CronJob")?;
    let spec = cj.spec.as_ref();
    Ok(vec![
        name_cell(&cj.metadata),
        Value::String(spec.map(|s| s.schedule.clone()).unwrap_or_default()),
        Value::String(
            spec.and_then(|s| s.suspend)
                .unwrap_or(false)
                .to_string(),
        ),
        age_cell(&cj.metadata),
    ])
}

fn role_row(obj: &Value) -> Result<Vec<Value>> {
    let role: Role = decode(obj, "Role")?;
    Ok(vec![name_cell(&role.metadata), age_cell(&role.metadata)])
}

fn cluster_role_row(obj: &Value) -> Result<Vec<Value>> {
    let role: ClusterRole = decode(obj, "ClusterRole")?;
    Ok(vec![name_cell(&role.metadata), age_cell(&role.metadata)])
}

fn role_binding_row(obj: &Value) -> Result<Vec<Value>> {
    let binding: RoleBinding = decode(obj, "RoleBinding")?;
    let role = format!("{}/{}", binding.role_ref.kind, binding.role_ref.name);
    Ok(vec![
        name_cell(&binding.metadata),
        Value::String(role),
        age_cell(&binding.metadata),
    ])
}

fn cluster_role_binding_row(obj: &Value) -> Result<Vec<Value>> {
    let binding: ClusterRoleBinding = decode(obj, "ClusterRoleBinding")?;
    let role = format!("{}/{}", binding.role_ref.kind, binding.role_ref.name);
    Ok(vec![
        name_cell(&binding.metadata),
        Value::String(role),
        age_cell(&binding.metadata),
    ])
}

fn push_field(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("{:<14}{}\n", format!("{}:", label), value));
}

fn push_map_field(
    out: &mut String,
    label: &str,
    map: Option<&std::collections::BTreeMap<String, String>>,
) {
    match map {
        Some(map) if !map.is_empty() => {
            let rendered = map
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(", ");
            push_field(out, label, &rendered);
        }
        _ => push_field(out, label, "<none>"),
    }
}

/// Metadata-only describe used for kinds without a typed describer.
pub fn generic_describe(obj: &Value) -> String {
    let get = |pointer: &str| {
        obj.pointer(pointer)
            .and_then(Value::as_str)
            .unwrap_or("<none>")
            .to_string()
    };

    let mut out = String::new();
    push_field(&mut out, "Name", &get("/metadata/name"));
    push_field(&mut out, "Namespace", &get("/metadata/namespace"));
    push_field(&mut out, "API Version", &get("/apiVersion"));
    push_field(&mut out, "Kind", &get("/kind"));
    let labels = obj
        .pointer("/metadata/labels")
        .and_then(Value::as_object)
        .map(|m| {
            m.iter()
                .map(|(k, v)| format!("{}={}", k, v.as_str().unwrap_or("")))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "<none>".to_string());
    push_field(&mut out, "Labels", &labels);
    push_field(
        &mut out,
        "Age",
        &super::format_age(
            obj.pointer("/metadata/creationTimestamp")
                .and_then(Value::as_str),
        ),
    );
    out
}

fn pod_describe(obj: &Value) -> Result<String> {
    let pod: Pod = decode(obj, "Pod")?;
    let mut out = String::new();
    push_field(&mut out, "Name", pod.metadata.name.as_deref().unwrap_or(""));
    push_field(
        &mut out,
        "Namespace",
        pod.metadata.namespace.as_deref().unwrap_or(""),
    );
    push_field(
        &mut out,
        "Node",
        pod.spec
            .as_ref()
            .and_then(|s| s.node_name.as_deref())
            .unwrap_or("<none>"),
    );
    push_map_field(&mut out, "Labels", pod.metadata.labels.as_ref());
    push_field(
        &mut out,
        "Status",
        pod.status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .unwrap_or(""),
    );
    push_field(
        &mut out,
        "IP",
        pod.status
            .as_ref()
            .and_then(|s| s.pod_ip.as_deref())
            .unwrap_or("<none>"),
    );

    out.push_str("Containers:\n");
    let statuses = pod
        .status
        .as_ref()
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or(&[]);
    for container in pod.spec.as_ref().map(|s| s.containers.as_slice()).unwrap_or(&[]) {
        let status = statuses.iter().find(|c| c.name == container.name);
        out.push_str(&format!(
            "  {}:\n    Image:     {}\n    Ready:     {}\n    Restarts:  {}\n",
            container.name,
            container.image.as_deref().unwrap_or("<none>"),
            status.map(|s| s.ready).unwrap_or(false),
            status.map(|s| s.restart_count).unwrap_or(0),
        ));
    }
    Ok(out)
}

fn deployment_describe(obj: &Value) -> Result<String> {
    let deploy: Deployment = decode(obj, "Deployment")?;
    let mut out = String::new();
    push_field(&mut out, "Name", deploy.metadata.name.as_deref().unwrap_or(""));
    push_field(
        &mut out,
        "Namespace",
        deploy.metadata.namespace.as_deref().unwrap_or(""),
    );
    push_map_field(&mut out, "Labels", deploy.metadata.labels.as_ref());
    let desired = deploy.spec.as_ref().and_then(|s| s.replicas).unwrap_or(0);
    let status = deploy.status.as_ref();
    push_field(
        &mut out,
        "Replicas",
        &format!(
            "{} desired | {} updated | {} available | {} ready",
            desired,
            status.and_then(|s| s.updated_replicas).unwrap_or(0),
            status.and_then(|s| s.available_replicas).unwrap_or(0),
            status.and_then(|s| s.ready_replicas).unwrap_or(0),
        ),
    );
    Ok(out)
}

fn service_describe(obj: &Value) -> Result<String> {
    let svc: Service = decode(obj, "Service")?;
    let mut out = String::new();
    push_field(&mut out, "Name", svc.metadata.name.as_deref().unwrap_or(""));
    push_field(
        &mut out,
        "Namespace",
        svc.metadata.namespace.as_deref().unwrap_or(""),
    );
    let spec = svc.spec.as_ref();
    push_field(
        &mut out,
        "Type",
        spec.and_then(|s| s.type_.as_deref()).unwrap_or("ClusterIP"),
    );
    push_field(
        &mut out,
        "Cluster-IP",
        spec.and_then(|s| s.cluster_ip.as_deref()).unwrap_or("<none>"),
    );
    let selector = spec
        .and_then(|s| s.selector.as_ref())
        .map(|m| {
            m.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_else(|| "<none>".to_string());
    push_field(&mut out, "Selector", &selector);
    Ok(out)
}

/// Shared by RoleBinding and ClusterRoleBinding; the two kinds differ only
/// in scope, not in shape.
fn binding_describe(obj: &Value) -> Result<String> {
    let mut out = String::new();
    let get = |pointer: &str| {
        obj.pointer(pointer)
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    };
    push_field(&mut out, "Name", &get("/metadata/name"));
    let namespace = get("/metadata/namespace");
    if !namespace.is_empty() {
        push_field(&mut out, "Namespace", &namespace);
    }
    push_field(
        &mut out,
        "Role",
        &format!("{}/{}", get("/roleRef/kind"), get("/roleRef/name")),
    );
    out.push_str("Subjects:\n");
    if let Some(subjects) = obj.get("subjects").and_then(Value::as_array) {
        for subject in subjects {
            let sget = |key: &str| subject.get(key).and_then(Value::as_str).unwrap_or("");
            out.push_str(&format!(
                "  {} {} {}\n",
                sget("kind"),
                sget("name"),
                sget("namespace"),
            ));
        }
    }
    Ok(out)
}
