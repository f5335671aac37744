//! Process-wide connection registry
//!
//! Maps context name to a cached [`ClusterConnection`], creating one on
//! first use. Locking is per context: the registry lock is held only long
//! enough to fetch or insert a slot, never across the discovery round
//! trip, so a slow connection to one context does not block requests for
//! another. A failed construction leaves the slot empty (no partial
//! connection is ever cached) and the next request retries.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

use super::cluster_connection::{ClusterConnection, KindTable, ObjectView};
use crate::command::CommandResult;
use crate::relations::RelationTable;
use crate::table::TypeRegistry;

type ConnectionSlot = Arc<OnceCell<Arc<ClusterConnection>>>;

/// Owns every cached connection plus the type and relation tables shared
/// between them. Constructed once near the top of the process and passed
/// down explicitly.
pub struct ConnectionRegistry {
    types: Arc<TypeRegistry>,
    relations: Arc<RelationTable>,
    connections: Mutex<HashMap<String, ConnectionSlot>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            types: Arc::new(TypeRegistry::builtin()),
            relations: Arc::new(RelationTable::builtin()),
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the cached connection for a context, creating (and caching) it
    /// on first use. Creation triggers catalog discovery exactly once per
    /// context.
    pub async fn get_or_connect(&self, context: &str) -> Result<Arc<ClusterConnection>> {
        let slot = {
            let mut connections = self.connections.lock().await;
            connections
                .entry(context.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        let connection = slot
            .get_or_try_init(|| async {
                let connection =
                    ClusterConnection::connect(context, self.types.clone(), self.relations.clone())
                        .await?;
                Ok::<_, anyhow::Error>(Arc::new(connection))
            })
            .await?;

        Ok(connection.clone())
    }

    /// Namespace names for a context.
    pub async fn namespaces(&self, context: &str) -> Result<Vec<String>> {
        self.get_or_connect(context).await?.namespaces().await
    }

    /// Multi-kind query for a context.
    pub async fn query(&self, context: &str, namespace: &str, token: &str) -> Result<Vec<KindTable>> {
        Ok(self
            .get_or_connect(context)
            .await?
            .query(namespace, token)
            .await)
    }

    /// Single-object view for a context.
    pub async fn get_object(
        &self,
        context: &str,
        namespace: &str,
        kind: &str,
        name: &str,
    ) -> Result<ObjectView> {
        self.get_or_connect(context)
            .await?
            .get_object(namespace, kind, name)
            .await
    }

    /// Classify a line of input against a context's catalog.
    pub async fn interpret(&self, context: &str, input: &str) -> Result<CommandResult> {
        Ok(self.get_or_connect(context).await?.interpret(input))
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
