//! Uniform table rendering for heterogeneous resource lists
//!
//! Every list of instances becomes a [`ResourceTable`], whatever its kind:
//! registered kinds get kubectl-style columns through the type registry's
//! fast path, unknown kinds fall back to a name/age pair, and any rendering
//! failure folds into a single-cell error table so multi-kind query results
//! stay uniform for the caller.

pub mod typed;

pub use typed::TypeRegistry;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::catalog::ResourceDescriptor;

/// One column of a rendered table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub name: String,
    /// Declared cell type, e.g. "string" or "integer".
    #[serde(rename = "type")]
    pub data_type: String,
    pub description: String,
}

impl TableColumn {
    pub fn new(name: &str, data_type: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            description: description.to_string(),
        }
    }
}

/// One row of cells, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub cells: Vec<Value>,
    /// The source object, attached by typed generators while rows are
    /// built. Always stripped before a table leaves the presenter; the full
    /// payload is not sent downstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<Value>,
}

/// A rendered list of instances of one resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTable {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
    /// Each row's primary name, used for downstream object lookup. Empty
    /// string where the table has no string-typed "name" column.
    pub row_names: Vec<String>,
    pub is_error: bool,
}

/// A single-cell table carrying an error message.
///
/// Callers treat this as a table like any other so one failing kind never
/// blanks out a whole multi-kind result.
pub fn error_table(message: &str) -> ResourceTable {
    let mut table = ResourceTable {
        columns: vec![TableColumn::new("Error", "", "")],
        rows: vec![TableRow {
            cells: vec![Value::String(message.to_string())],
            object: None,
        }],
        row_names: Vec::new(),
        is_error: true,
    };
    table.row_names = derive_row_names(&table);
    table
}

/// Project instances of one kind into a display table.
///
/// Fast path for kinds whose group/version is registered, name/age fallback
/// otherwise; any failure yields an error table instead of propagating.
pub fn render(registry: &TypeRegistry, rd: &ResourceDescriptor, items: &[Value]) -> ResourceTable {
    let mut table = if registry.is_registered(&rd.group_version()) {
        match registry.render_typed(rd, items) {
            Ok(Some(table)) => table,
            // registered version but no generator for this kind
            Ok(None) => render_fallback(items),
            Err(e) => {
                tracing::error!("typed rendering failed for {}: {:#}", rd.kind, e);
                error_table(&format!("{:#}", e))
            }
        }
    } else {
        render_fallback(items)
    };

    for row in &mut table.rows {
        row.object = None;
    }
    table.row_names = derive_row_names(&table);
    table
}

/// The two-column table used for kinds without a registered renderer.
fn render_fallback(items: &[Value]) -> ResourceTable {
    let columns = vec![
        TableColumn::new(
            "Name",
            "string",
            "Name must be unique within a namespace.",
        ),
        TableColumn::new(
            "Age",
            "string",
            "Time elapsed since the server accepted this object.",
        ),
    ];

    let rows = items
        .iter()
        .map(|item| {
            let name = item
                .pointer("/metadata/name")
                .and_then(Value::as_str)
                .unwrap_or("");
            let created = item
                .pointer("/metadata/creationTimestamp")
                .and_then(Value::as_str);
            TableRow {
                cells: vec![
                    Value::String(name.to_string()),
                    Value::String(format_age(created)),
                ],
                object: None,
            }
        })
        .collect();

    ResourceTable {
        columns,
        rows,
        row_names: Vec::new(),
        is_error: false,
    }
}

fn derive_row_names(table: &ResourceTable) -> Vec<String> {
    let name_idx = table
        .columns
        .iter()
        .position(|c| c.name.to_lowercase() == "name" && c.data_type == "string");

    table
        .rows
        .iter()
        .map(|row| match name_idx {
            Some(idx) => row
                .cells
                .get(idx)
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            None => String::new(),
        })
        .collect()
}

/// Elapsed time since an RFC3339 timestamp in compact human form.
pub fn format_age(timestamp: Option<&str>) -> String {
    let Some(raw) = timestamp else {
        return "<unknown>".to_string();
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => format_age_since(dt.with_timezone(&Utc)),
        Err(_) => "<unknown>".to_string(),
    }
}

/// Compact age tiers matching the kubectl printers: s below a minute, then
/// m, h, d.
pub fn format_age_since(created: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(created);
    if duration.num_seconds() < 0 {
        return "0s".to_string();
    }
    if duration.num_seconds() < 60 {
        format!("{}s", duration.num_seconds())
    } else if duration.num_minutes() < 60 {
        format!("{}m", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h", duration.num_hours())
    } else {
        format!("{}d", duration.num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_error_table_shape() {
        let table = error_table("list failed: forbidden");
        assert!(table.is_error);
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(
            table.rows[0].cells[0],
            Value::String("list failed: forbidden".to_string())
        );
        // error column is untyped, so no row name is derived
        assert_eq!(table.row_names, vec![String::new()]);
    }

    #[test]
    fn test_format_age_tiers() {
        let now = Utc::now();
        assert_eq!(format_age_since(now - Duration::seconds(45)), "45s");
        assert_eq!(format_age_since(now - Duration::minutes(12)), "12m");
        assert_eq!(format_age_since(now - Duration::hours(5)), "5h");
        assert_eq!(format_age_since(now - Duration::days(3)), "3d");
        // clock skew on a future timestamp never renders negative
        assert_eq!(format_age_since(now + Duration::minutes(5)), "0s");
    }

    #[test]
    fn test_format_age_missing_or_invalid() {
        assert_eq!(format_age(None), "<unknown>");
        assert_eq!(format_age(Some("not-a-time")), "<unknown>");
    }
}
