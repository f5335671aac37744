//! Declarative relationship discovery between cluster objects
//!
//! A fixed table of rules, each keyed by an origin kind and carrying a pure
//! extraction over the object's attribute tree. Given one fetched instance,
//! the engine returns the set of other resources it references: the node a
//! pod is scheduled on, the owners named in its ownerReferences, the role
//! and subjects of an RBAC binding. One hop only; destinations are never
//! followed further.

use serde::Serialize;
use serde_json::Value;

pub const RBAC_GROUP: &str = "rbac.authorization.k8s.io";

/// Group + kind pair identifying a resource kind independent of version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GroupKind {
    pub group: String,
    pub kind: String,
}

impl GroupKind {
    pub fn new(group: &str, kind: &str) -> Self {
        Self {
            group: group.to_string(),
            kind: kind.to_string(),
        }
    }
}

/// One resource an object points at.
///
/// An empty namespace means cluster-scoped, or same-as-origin for rules
/// whose references are same-namespace by convention. Equality is
/// structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDestination {
    pub group_kind: GroupKind,
    pub namespace: String,
    pub name: String,
}

/// How a rule reads destinations out of an instance.
///
/// Rules are data: a tagged variant plus the origin kind it fires for, so
/// the table can be built and tested like any other value.
#[derive(Debug, Clone)]
enum Extractor {
    /// A single reference field naming the host an object is scheduled on.
    SchedulingTarget { target: GroupKind },
    /// Every metadata.ownerReferences entry, namespace inherited from the
    /// origin object.
    OwnerReferences,
    /// An RBAC binding's roleRef; target kind resolved from the reference.
    RoleRef,
    /// Every subject of an RBAC binding, with the subject's own coordinates.
    Subjects,
}

/// Origin kind plus a pure destination extraction.
///
/// Contract: `is_applicable` is true iff `destinations` is non-empty, which
/// holds by construction since applicability is derived from the extraction.
#[derive(Debug, Clone)]
pub struct RelationRule {
    pub origin: GroupKind,
    extractor: Extractor,
}

impl RelationRule {
    /// The host an object is scheduled on, read from `spec.nodeName`.
    /// The destination is cluster-scoped.
    pub fn scheduling_target(origin: GroupKind, target: GroupKind) -> Self {
        Self {
            origin,
            extractor: Extractor::SchedulingTarget { target },
        }
    }

    /// Every owner reference the object carries.
    pub fn owner_references(origin: GroupKind) -> Self {
        Self {
            origin,
            extractor: Extractor::OwnerReferences,
        }
    }

    /// The role reference of an RBAC binding (Role or ClusterRole).
    pub fn role_ref(origin: GroupKind) -> Self {
        Self {
            origin,
            extractor: Extractor::RoleRef,
        }
    }

    /// Every subject of an RBAC binding.
    pub fn subjects(origin: GroupKind) -> Self {
        Self {
            origin,
            extractor: Extractor::Subjects,
        }
    }

    /// All destinations this rule finds on the instance. Empty when the
    /// relation does not apply.
    pub fn destinations(&self, obj: &Value) -> Vec<RelationDestination> {
        match &self.extractor {
            Extractor::SchedulingTarget { target } => scheduling_target_destinations(obj, target),
            Extractor::OwnerReferences => owner_reference_destinations(obj),
            Extractor::RoleRef => role_ref_destinations(obj),
            Extractor::Subjects => subject_destinations(obj),
        }
    }

    pub fn is_applicable(&self, obj: &Value) -> bool {
        !self.destinations(obj).is_empty()
    }
}

fn metadata_namespace(obj: &Value) -> String {
    obj.pointer("/metadata/namespace")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn scheduling_target_destinations(obj: &Value, target: &GroupKind) -> Vec<RelationDestination> {
    match obj.pointer("/spec/nodeName").and_then(Value::as_str) {
        Some(node) if !node.is_empty() => vec![RelationDestination {
            group_kind: target.clone(),
            namespace: String::new(),
            name: node.to_string(),
        }],
        _ => Vec::new(),
    }
}

/// The group of an ownerReference apiVersion: text before '/', empty for
/// core ("v1").
fn group_of_api_version(api_version: &str) -> String {
    match api_version.split_once('/') {
        Some((group, _)) => group.to_string(),
        None => String::new(),
    }
}

fn owner_reference_destinations(obj: &Value) -> Vec<RelationDestination> {
    let namespace = metadata_namespace(obj);
    obj.pointer("/metadata/ownerReferences")
        .and_then(Value::as_array)
        .map(|refs| {
            refs.iter()
                .filter_map(|owner| {
                    let kind = owner.get("kind").and_then(Value::as_str)?;
                    let name = owner.get("name").and_then(Value::as_str)?;
                    let api_version = owner
                        .get("apiVersion")
                        .and_then(Value::as_str)
                        .unwrap_or("");
                    Some(RelationDestination {
                        group_kind: GroupKind::new(&group_of_api_version(api_version), kind),
                        // owner references are same-namespace or
                        // cluster-scoped by convention
                        namespace: namespace.clone(),
                        name: name.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn role_ref_destinations(obj: &Value) -> Vec<RelationDestination> {
    let Some(role_ref) = obj.get("roleRef") else {
        return Vec::new();
    };
    let kind = role_ref.get("kind").and_then(Value::as_str).unwrap_or("");
    let name = role_ref.get("name").and_then(Value::as_str).unwrap_or("");
    if kind.is_empty() || name.is_empty() {
        return Vec::new();
    }

    let group = role_ref
        .get("apiGroup")
        .and_then(Value::as_str)
        .unwrap_or(RBAC_GROUP);
    // only the namespace-scoped variant carries a namespace
    let namespace = if kind == "Role" {
        metadata_namespace(obj)
    } else {
        String::new()
    };

    vec![RelationDestination {
        group_kind: GroupKind::new(group, kind),
        namespace,
        name: name.to_string(),
    }]
}

fn subject_destinations(obj: &Value) -> Vec<RelationDestination> {
    obj.get("subjects")
        .and_then(Value::as_array)
        .map(|subjects| {
            subjects
                .iter()
                .filter_map(|subject| {
                    let kind = subject.get("kind").and_then(Value::as_str)?;
                    let name = subject.get("name").and_then(Value::as_str)?;
                    let group = subject
                        .get("apiGroup")
                        .and_then(Value::as_str)
                        .unwrap_or("");
                    let namespace = subject
                        .get("namespace")
                        .and_then(Value::as_str)
                        .unwrap_or("");
                    Some(RelationDestination {
                        group_kind: GroupKind::new(group, kind),
                        namespace: namespace.to_string(),
                        name: name.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Immutable table of relation rules, matched by origin kind.
#[derive(Debug, Clone)]
pub struct RelationTable {
    rules: Vec<RelationRule>,
}

impl RelationTable {
    pub fn new(rules: Vec<RelationRule>) -> Self {
        Self { rules }
    }

    /// The rules shipped with the engine: pod scheduling, owner references
    /// for workload kinds, and RBAC binding references.
    pub fn builtin() -> Self {
        let rbac_binding = GroupKind::new(RBAC_GROUP, "RoleBinding");
        let rbac_cluster_binding = GroupKind::new(RBAC_GROUP, "ClusterRoleBinding");
        Self::new(vec![
            RelationRule::scheduling_target(
                GroupKind::new("", "Pod"),
                GroupKind::new("", "Node"),
            ),
            RelationRule::owner_references(GroupKind::new("", "Pod")),
            RelationRule::owner_references(GroupKind::new("apps", "ReplicaSet")),
            RelationRule::owner_references(GroupKind::new("batch", "Job")),
            RelationRule::role_ref(rbac_binding.clone()),
            RelationRule::subjects(rbac_binding),
            RelationRule::role_ref(rbac_cluster_binding.clone()),
            RelationRule::subjects(rbac_cluster_binding),
        ])
    }

    pub fn rules(&self) -> &[RelationRule] {
        &self.rules
    }

    /// Destinations of every rule registered for the origin kind, in table
    /// order. A kind may have several independent rules; all fire.
    pub fn relations_for(&self, obj: &Value, origin: &GroupKind) -> Vec<RelationDestination> {
        self.rules
            .iter()
            .filter(|rule| rule.origin == *origin)
            .flat_map(|rule| rule.destinations(obj))
            .collect()
    }

    /// Filter candidates to those whose forward destinations under `rule`
    /// include the target's group/kind and name ("what points at me").
    ///
    /// O(candidates × rule cost), recomputed per call with no index.
    pub fn reverse_matches<'a>(
        target: &RelationDestination,
        rule: &RelationRule,
        candidates: &'a [Value],
    ) -> Vec<&'a Value> {
        candidates
            .iter()
            .filter(|candidate| {
                rule.destinations(candidate)
                    .iter()
                    .any(|d| d.group_kind == target.group_kind && d.name == target.name)
            })
            .collect()
    }
}

impl Default for RelationTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_group_of_api_version() {
        assert_eq!(group_of_api_version("apps/v1"), "apps");
        assert_eq!(group_of_api_version("v1"), "");
    }

    #[test]
    fn test_owner_rule_inherits_origin_namespace() {
        let rule = RelationRule::owner_references(GroupKind::new("", "Pod"));
        let pod = json!({
            "metadata": {
                "name": "web-abc",
                "namespace": "prod",
                "ownerReferences": [
                    {"apiVersion": "apps/v1", "kind": "ReplicaSet", "name": "web"}
                ]
            }
        });

        let destinations = rule.destinations(&pod);
        assert_eq!(destinations.len(), 1);
        assert_eq!(destinations[0].group_kind, GroupKind::new("apps", "ReplicaSet"));
        assert_eq!(destinations[0].namespace, "prod");
        assert_eq!(destinations[0].name, "web");
    }

    #[test]
    fn test_applicability_matches_destinations() {
        let rule = RelationRule::scheduling_target(
            GroupKind::new("", "Pod"),
            GroupKind::new("", "Node"),
        );

        let scheduled = json!({"spec": {"nodeName": "node-1"}});
        assert!(rule.is_applicable(&scheduled));
        assert!(!rule.destinations(&scheduled).is_empty());

        let pending = json!({"spec": {}});
        assert!(!rule.is_applicable(&pending));
        assert!(rule.destinations(&pending).is_empty());

        let empty_name = json!({"spec": {"nodeName": ""}});
        assert!(!rule.is_applicable(&empty_name));
    }

    #[test]
    fn test_role_ref_requires_kind_and_name() {
        let rule = RelationRule::role_ref(GroupKind::new(RBAC_GROUP, "RoleBinding"));

        let missing_name = json!({"roleRef": {"kind": "Role"}});
        assert!(rule.destinations(&missing_name).is_empty());

        let binding = json!({
            "metadata": {"namespace": "team-a"},
            "roleRef": {"apiGroup": RBAC_GROUP, "kind": "Role", "name": "viewer"}
        });
        let destinations = rule.destinations(&binding);
        assert_eq!(destinations.len(), 1);
        assert_eq!(destinations[0].group_kind.kind, "Role");
        assert_eq!(destinations[0].namespace, "team-a");

        let cluster_binding = json!({
            "roleRef": {"apiGroup": RBAC_GROUP, "kind": "ClusterRole", "name": "admin"}
        });
        let destinations = rule.destinations(&cluster_binding);
        assert_eq!(destinations[0].group_kind.kind, "ClusterRole");
        assert_eq!(destinations[0].namespace, "");
    }

    #[test]
    fn test_subjects_use_their_own_coordinates() {
        let rule = RelationRule::subjects(GroupKind::new(RBAC_GROUP, "ClusterRoleBinding"));
        let binding = json!({
            "subjects": [
                {"kind": "ServiceAccount", "name": "deployer", "namespace": "ci"},
                {"kind": "User", "apiGroup": RBAC_GROUP, "name": "alice"}
            ]
        });

        let destinations = rule.destinations(&binding);
        assert_eq!(destinations.len(), 2);
        assert_eq!(destinations[0].group_kind, GroupKind::new("", "ServiceAccount"));
        assert_eq!(destinations[0].namespace, "ci");
        assert_eq!(destinations[1].group_kind, GroupKind::new(RBAC_GROUP, "User"));
        assert_eq!(destinations[1].namespace, "");
    }

    #[test]
    fn test_multiple_rules_for_one_origin_all_fire() {
        let table = RelationTable::builtin();
        let pod = json!({
            "metadata": {
                "namespace": "default",
                "ownerReferences": [
                    {"apiVersion": "apps/v1", "kind": "ReplicaSet", "name": "web"}
                ]
            },
            "spec": {"nodeName": "node-7"}
        });

        let destinations = table.relations_for(&pod, &GroupKind::new("", "Pod"));
        assert_eq!(destinations.len(), 2);
        assert!(destinations.iter().any(|d| d.group_kind.kind == "Node"));
        assert!(destinations.iter().any(|d| d.group_kind.kind == "ReplicaSet"));
    }

    #[test]
    fn test_reverse_matches_filters_by_kind_and_name() {
        let rule = RelationRule::scheduling_target(
            GroupKind::new("", "Pod"),
            GroupKind::new("", "Node"),
        );
        let candidates = vec![
            json!({"metadata": {"name": "a"}, "spec": {"nodeName": "node-1"}}),
            json!({"metadata": {"name": "b"}, "spec": {"nodeName": "node-2"}}),
            json!({"metadata": {"name": "c"}, "spec": {}}),
        ];
        let target = RelationDestination {
            group_kind: GroupKind::new("", "Node"),
            namespace: String::new(),
            name: "node-1".to_string(),
        };

        let matches = RelationTable::reverse_matches(&target, &rule, &candidates);
        assert_eq!(matches.len(), 1);
        assert_eq!(
            matches[0].pointer("/metadata/name").and_then(Value::as_str),
            Some("a")
        );
    }
}
