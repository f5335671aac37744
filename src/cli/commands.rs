//! CLI command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::Value;

use crate::catalog::ResourceDescriptor;
use crate::services::{ConnectionRegistry, KindTable};
use crate::table::ResourceTable;

/// Main commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List contexts from the kubeconfig
    Contexts,
    /// List namespaces in the cluster
    Namespaces,
    /// List every resource kind the cluster exposes
    ApiResources,
    /// List instances of every kind matching a name, short name, or
    /// category
    Query {
        /// Name, short name, or category of resource(s) to query
        token: String,
    },
    /// Show one object: relations, describe text and yaml
    Get {
        /// Kind or alias of the resource
        kind: String,
        /// Object name
        name: String,
    },
}

/// Dispatch a parsed command against the connection registry.
pub async fn handle_command(
    registry: &ConnectionRegistry,
    context: Option<String>,
    namespace: &str,
    command: Command,
) -> Result<()> {
    if let Command::Contexts = command {
        // the only command that doesn't need a live connection
        for name in crate::kube::list_contexts()? {
            println!("{}", name);
        }
        return Ok(());
    }

    let context = match context {
        Some(context) => context,
        None => crate::kube::current_context()?
            .context("no current context in kubeconfig; pass --context")?,
    };

    match command {
        Command::Contexts => unreachable!("handled above"),
        Command::Namespaces => {
            let connection = registry.get_or_connect(&context).await?;
            for name in connection.namespaces().await? {
                println!("{}", name);
            }
        }
        Command::ApiResources => {
            let connection = registry.get_or_connect(&context).await?;
            print!("{}", render_api_resources(connection.catalog().resources()));
        }
        Command::Query { token } => {
            let results = registry.query(&context, namespace, &token).await?;
            if results.is_empty() {
                println!("no resource kinds match '{}'", token);
            }
            for kind_table in &results {
                print_kind_table(kind_table);
            }
        }
        Command::Get { kind, name } => {
            let view = registry
                .get_object(&context, namespace, &kind, &name)
                .await?;
            print!("{}", view.describe);
            if !view.relations.is_empty() {
                println!("\nRelated:");
                for relation in &view.relations {
                    let scope = if relation.namespace.is_empty() {
                        String::new()
                    } else {
                        format!("{}/", relation.namespace)
                    };
                    println!(
                        "  {} {}{}",
                        relation.group_kind.kind, scope, relation.name
                    );
                }
            }
            for error in &view.errors {
                eprintln!("warning: {}", error);
            }
            println!("\n---\n{}", view.yaml);
        }
    }

    Ok(())
}

fn print_kind_table(kind_table: &KindTable) {
    let rd = &kind_table.resource;
    println!("{} ({})", rd.plural, rd.group_version());
    print!("{}", render_table_text(&kind_table.table));
    println!();
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render a table as aligned plain text.
pub fn render_table_text(table: &ResourceTable) -> String {
    let headers: Vec<String> = table.columns.iter().map(|c| c.name.to_uppercase()).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(cell_text).collect())
        .collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() && cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let render_line = |cells: &[String]| {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i + 1 == cells.len() {
                line.push_str(cell);
            } else {
                line.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
            }
        }
        line.trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&render_line(&headers));
    out.push('\n');
    for row in &rows {
        out.push_str(&render_line(row));
        out.push('\n');
    }
    out
}

/// The `api-resources` listing, in kubectl's column layout.
fn render_api_resources(resources: &[ResourceDescriptor]) -> String {
    let mut lines = vec![vec![
        "NAME".to_string(),
        "SHORTNAMES".to_string(),
        "APIVERSION".to_string(),
        "NAMESPACED".to_string(),
        "KIND".to_string(),
    ]];
    for rd in resources {
        lines.push(vec![
            rd.plural.clone(),
            rd.short_names.join(","),
            rd.group_version(),
            rd.namespaced.to_string(),
            rd.kind.clone(),
        ]);
    }

    let mut widths = vec![0usize; 5];
    for line in &lines {
        for (i, cell) in line.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = String::new();
    for line in &lines {
        let rendered: Vec<String> = line
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        out.push_str(rendered.join("  ").trim_end());
        out.push('\n');
    }
    out
}
