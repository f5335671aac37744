//! Catalog construction tests
//!
//! Exercises the discovery-to-catalog algorithm against synthetic group and
//! resource-list data: preferred-version exclusion, subresource filtering,
//! malformed group/version handling, and alias matching over the result.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{
    APIGroup, APIResource, APIResourceList, GroupVersionForDiscovery,
};

use kubenav::catalog::{build_catalog, find_resources};

fn gv(group_version: &str, version: &str) -> GroupVersionForDiscovery {
    GroupVersionForDiscovery {
        group_version: group_version.to_string(),
        version: version.to_string(),
    }
}

fn group(name: &str, versions: &[(&str, &str)], preferred: Option<(&str, &str)>) -> APIGroup {
    APIGroup {
        name: name.to_string(),
        versions: versions.iter().map(|(g, v)| gv(g, v)).collect(),
        preferred_version: preferred.map(|(g, v)| gv(g, v)),
        ..Default::default()
    }
}

fn resource(name: &str, kind: &str, singular: &str, namespaced: bool) -> APIResource {
    APIResource {
        name: name.to_string(),
        kind: kind.to_string(),
        singular_name: singular.to_string(),
        namespaced,
        verbs: vec!["get".to_string(), "list".to_string()],
        ..Default::default()
    }
}

fn resource_list(group_version: &str, resources: Vec<APIResource>) -> APIResourceList {
    APIResourceList {
        group_version: group_version.to_string(),
        resources,
    }
}

#[test]
fn test_preferred_version_wins_for_multi_version_groups() {
    let groups = vec![group(
        "apps",
        &[("apps/v1", "v1"), ("apps/v1beta1", "v1beta1")],
        Some(("apps/v1", "v1")),
    )];
    let lists = vec![
        resource_list(
            "apps/v1",
            vec![resource("deployments", "Deployment", "deployment", true)],
        ),
        resource_list(
            "apps/v1beta1",
            vec![resource("deployments", "Deployment", "deployment", true)],
        ),
    ];

    let catalog = build_catalog(&groups, &lists);

    assert_eq!(catalog.len(), 1);
    let rd = &catalog.resources()[0];
    assert_eq!(rd.kind, "Deployment");
    assert_eq!(rd.version, "v1");

    // never two descriptors for the same group+kind in different versions
    let deployment_count = catalog
        .iter()
        .filter(|rd| rd.group == "apps" && rd.kind == "Deployment")
        .count();
    assert_eq!(deployment_count, 1);
}

#[test]
fn test_single_version_group_is_never_excluded() {
    let groups = vec![group(
        "batch",
        &[("batch/v1", "v1")],
        Some(("batch/v1", "v1")),
    )];
    let lists = vec![resource_list(
        "batch/v1",
        vec![resource("jobs", "Job", "job", true)],
    )];

    let catalog = build_catalog(&groups, &lists);
    assert_eq!(catalog.len(), 1);
}

#[test]
fn test_subresources_are_dropped() {
    let lists = vec![resource_list(
        "v1",
        vec![
            resource("pods", "Pod", "pod", true),
            resource("pods/log", "Pod", "", true),
            resource("pods/status", "Pod", "", true),
        ],
    )];

    let catalog = build_catalog(&[], &lists);

    assert_eq!(catalog.len(), 1);
    assert!(catalog.iter().all(|rd| !rd.plural.contains('/')));
}

#[test]
fn test_core_group_version_splits_to_empty_group() {
    let lists = vec![resource_list(
        "v1",
        vec![resource("pods", "Pod", "pod", true)],
    )];

    let catalog = build_catalog(&[], &lists);
    let rd = &catalog.resources()[0];
    assert_eq!(rd.group, "");
    assert_eq!(rd.version, "v1");
    assert_eq!(rd.group_version(), "v1");
}

#[test]
fn test_malformed_group_version_is_skipped_not_fatal() {
    let lists = vec![
        resource_list("bad/gv/shape", vec![resource("widgets", "Widget", "widget", true)]),
        resource_list("v1", vec![resource("pods", "Pod", "pod", true)]),
    ];

    let catalog = build_catalog(&[], &lists);

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.resources()[0].kind, "Pod");
}

#[test]
fn test_catalog_preserves_list_order() {
    let lists = vec![
        resource_list(
            "v1",
            vec![
                resource("pods", "Pod", "pod", true),
                resource("services", "Service", "service", true),
            ],
        ),
        resource_list(
            "apps/v1",
            vec![resource("deployments", "Deployment", "deployment", true)],
        ),
    ];

    let catalog = build_catalog(&[], &lists);
    let kinds: Vec<&str> = catalog.iter().map(|rd| rd.kind.as_str()).collect();
    assert_eq!(kinds, vec!["Pod", "Service", "Deployment"]);
}

#[test]
fn test_alias_matching_over_built_catalog() {
    let mut pods = resource("pods", "Pod", "pod", true);
    pods.short_names = Some(vec!["po".to_string()]);
    pods.categories = Some(vec!["all".to_string()]);

    let lists = vec![
        resource_list("v1", vec![pods]),
        resource_list(
            "apps/v1",
            vec![resource("deployments", "Deployment", "deployment", true)],
        ),
    ];
    let catalog = build_catalog(&[], &lists);

    for token in ["pods", "pod", "Pod", "PO", "all"] {
        let matches = find_resources(&catalog, token);
        assert!(
            matches.iter().any(|rd| rd.kind == "Pod"),
            "token '{}' should match Pod",
            token
        );
    }

    // group name matches too
    let matches = find_resources(&catalog, "apps");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].kind, "Deployment");

    assert!(find_resources(&catalog, "nonesuch").is_empty());
}
