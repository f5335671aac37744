//! Free-text command classification
//!
//! A single-step classifier over one line of input: context switches, kind
//! queries and object lookups. No flags, no quoting, no multi-word names;
//! anything the catalog doesn't recognize comes back as an error variant
//! rather than a failure.

use serde::Serialize;

use crate::catalog::{ResourceCatalog, find_resources};

/// Classification of one line of input. Pure output; carries no side
/// effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "commandResultType", rename_all = "camelCase")]
pub enum CommandResult {
    /// "ctx" alone opens context selection; "ctx name" switches. The target
    /// is not validated at this layer.
    #[serde(rename = "ctx")]
    ContextSwitch { target: Option<String> },
    /// A bare kind/alias token: list instances of the matching kinds.
    Query { token: String },
    /// A kind token plus a name: look up one object.
    #[serde(rename = "obj")]
    ObjectLookup { kind: String, name: String },
    #[serde(rename = "err")]
    Error { message: String },
}

impl CommandResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// Classify one line of free text against a catalog.
///
/// When several descriptors share an alias the first catalog-order match
/// wins; the collision is logged but not surfaced here.
pub fn interpret(catalog: &ResourceCatalog, input: &str) -> CommandResult {
    let fields: Vec<&str> = input.split_whitespace().collect();
    let Some(&action) = fields.first() else {
        return CommandResult::error("empty command");
    };

    if action == "ctx" || action == "context" {
        return CommandResult::ContextSwitch {
            target: fields.get(1).map(|s| s.to_string()),
        };
    }

    let matches = find_resources(catalog, action);
    let Some(first) = matches.first() else {
        return CommandResult::error(format!(
            "unknown command or resource '{}' in '{}'",
            action, input
        ));
    };
    if matches.len() > 1 {
        tracing::debug!(
            "alias '{}' matched {} resources; using {}",
            action,
            matches.len(),
            first.kind
        );
    }

    match fields.get(1) {
        Some(name) => CommandResult::ObjectLookup {
            kind: first.kind.clone(),
            name: name.to_string(),
        },
        None => CommandResult::Query {
            token: action.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ResourceDescriptor;

    fn catalog() -> ResourceCatalog {
        ResourceCatalog::new(vec![ResourceDescriptor {
            group: String::new(),
            version: "v1".to_string(),
            kind: "Pod".to_string(),
            plural: "pods".to_string(),
            singular: "pod".to_string(),
            namespaced: true,
            short_names: vec!["po".to_string()],
            categories: vec!["all".to_string()],
        }])
    }

    #[test]
    fn test_context_switch_with_and_without_target() {
        assert_eq!(
            interpret(&catalog(), "ctx prod-east"),
            CommandResult::ContextSwitch {
                target: Some("prod-east".to_string())
            }
        );
        assert_eq!(
            interpret(&catalog(), "context"),
            CommandResult::ContextSwitch { target: None }
        );
    }

    #[test]
    fn test_empty_input_is_an_error_variant() {
        assert_eq!(
            interpret(&catalog(), ""),
            CommandResult::error("empty command")
        );
        assert_eq!(
            interpret(&catalog(), "   "),
            CommandResult::error("empty command")
        );
    }

    #[test]
    fn test_bare_alias_is_a_query() {
        assert_eq!(
            interpret(&catalog(), "po"),
            CommandResult::Query {
                token: "po".to_string()
            }
        );
    }

    #[test]
    fn test_alias_plus_name_is_an_object_lookup() {
        assert_eq!(
            interpret(&catalog(), "pods web-1"),
            CommandResult::ObjectLookup {
                kind: "Pod".to_string(),
                name: "web-1".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_token_is_an_error_variant() {
        let result = interpret(&catalog(), "gizmo web-1");
        match result {
            CommandResult::Error { message } => {
                assert!(message.contains("gizmo"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }
}
