//! Table rendering tests
//!
//! The fast path for registered kinds, the generic fallback, the error
//! table shape, query-result ordering, and rendering determinism.

use serde_json::{Value, json};

use kubenav::catalog::ResourceDescriptor;
use kubenav::services::{KindTable, order_query_results};
use kubenav::table::{self, ResourceTable, TableRow, TypeRegistry};

fn descriptor(group: &str, version: &str, kind: &str, plural: &str) -> ResourceDescriptor {
    ResourceDescriptor {
        group: group.to_string(),
        version: version.to_string(),
        kind: kind.to_string(),
        plural: plural.to_string(),
        singular: kind.to_lowercase(),
        namespaced: true,
        short_names: Vec::new(),
        categories: Vec::new(),
    }
}

fn pod(name: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {"name": name, "namespace": "default"},
        "spec": {"containers": [{"name": "app", "image": "nginx"}]},
        "status": {
            "phase": "Running",
            "containerStatuses": [
                {"name": "app", "ready": true, "restartCount": 0, "image": "nginx", "imageID": "", "state": {}}
            ]
        }
    })
}

#[test]
fn test_fast_path_renders_typed_columns_and_strips_payloads() {
    let registry = TypeRegistry::builtin();
    let rd = descriptor("", "v1", "Pod", "pods");

    let table = table::render(&registry, &rd, &[pod("web-1"), pod("web-2")]);

    assert!(!table.is_error);
    let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Name", "Ready", "Status", "Restarts", "Age"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.row_names, vec!["web-1", "web-2"]);
    // raw objects are never sent downstream
    assert!(table.rows.iter().all(|row| row.object.is_none()));
}

#[test]
fn test_unregistered_kind_falls_back_to_name_and_age() {
    let registry = TypeRegistry::builtin();
    let rd = descriptor("example.com", "v1alpha1", "Widget", "widgets");
    let items = vec![json!({
        "apiVersion": "example.com/v1alpha1",
        "kind": "Widget",
        "metadata": {"name": "w-1"}
    })];

    let table = table::render(&registry, &rd, &items);

    assert!(!table.is_error);
    assert_eq!(table.columns.len(), 2);
    assert_eq!(table.columns[0].name, "Name");
    assert_eq!(table.columns[1].name, "Age");
    assert_eq!(table.rows[0].cells[0], json!("w-1"));
    // no creationTimestamp on the instance
    assert_eq!(table.rows[0].cells[1], json!("<unknown>"));
    assert_eq!(table.row_names, vec!["w-1"]);
}

#[test]
fn test_rendering_failure_folds_into_error_table() {
    let registry = TypeRegistry::builtin();
    let rd = descriptor("", "v1", "Pod", "pods");
    // a Pod whose spec is the wrong shape entirely
    let items = vec![json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {"name": "broken"},
        "spec": "not-an-object"
    })];

    let table = table::render(&registry, &rd, &items);

    assert!(table.is_error);
    assert_eq!(table.columns.len(), 1);
    assert_eq!(table.rows.len(), 1);
    assert!(table.rows[0].cells[0].as_str().is_some());
}

#[test]
fn test_error_table_shape_is_fixed() {
    let table = table::error_table("boom");
    assert!(table.is_error);
    assert_eq!(table.columns.len(), 1);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].cells, vec![json!("boom")]);
}

fn kind_table(kind: &str, row_count: usize) -> KindTable {
    let rd = descriptor("example.com", "v1", kind, &kind.to_lowercase());
    let registry = TypeRegistry::builtin();
    let items: Vec<Value> = (0..row_count)
        .map(|i| json!({"metadata": {"name": format!("{}-{}", kind.to_lowercase(), i)}}))
        .collect();
    KindTable {
        table: table::render(&registry, &rd, &items),
        resource: rd,
    }
}

#[test]
fn test_query_ordering_is_a_stable_partition() {
    // [A(0 rows), B(2 rows), C(0 rows), D(1 row)] -> [B, D, A, C]
    let tables = vec![
        kind_table("A", 0),
        kind_table("B", 2),
        kind_table("C", 0),
        kind_table("D", 1),
    ];

    let ordered = order_query_results(tables);
    let kinds: Vec<&str> = ordered.iter().map(|kt| kt.resource.kind.as_str()).collect();
    assert_eq!(kinds, vec!["B", "D", "A", "C"]);
}

#[test]
fn test_rendering_is_deterministic() {
    let registry = TypeRegistry::builtin();
    let rd = descriptor("", "v1", "Pod", "pods");
    let items = vec![pod("web-1")];

    let first = table::render(&registry, &rd, &items);
    let second = table::render(&registry, &rd, &items);
    assert_eq!(first, second);

    let first_json = serde_json::to_vec(&first).unwrap();
    let second_json = serde_json::to_vec(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn test_row_names_empty_when_no_name_column() {
    let table = ResourceTable {
        columns: vec![table::TableColumn::new("Error", "", "")],
        rows: vec![TableRow {
            cells: vec![json!("x")],
            object: None,
        }],
        row_names: vec![String::new()],
        is_error: true,
    };
    assert_eq!(table.row_names, vec![String::new()]);
}
