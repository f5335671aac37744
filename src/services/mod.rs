//! Cluster connections and the process-wide connection registry
//!
//! A [`ClusterConnection`] bundles everything needed to navigate one
//! cluster context: the client, the discovered resource catalog, and the
//! shared type/relation tables. The [`ConnectionRegistry`] caches one
//! connection per context for the life of the process.

pub mod cluster_connection;
pub mod registry;

pub use cluster_connection::{
    ClusterConnection, KindTable, LIST_LIMIT, ObjectView, order_query_results, render_yaml,
};
pub use registry::ConnectionRegistry;
