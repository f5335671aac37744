//! kubenav library
//!
//! A navigation and relationship-discovery layer over the Kubernetes
//! resource model: per-cluster resource catalogs, alias-based queries,
//! uniform table rendering for kinds known and unknown, and declarative
//! relation rules between object instances. Usable as a binary or as a
//! library behind a custom front end.

pub mod catalog;
pub mod cli;
pub mod command;
pub mod kube;
pub mod relations;
pub mod services;
pub mod table;

// Re-export commonly used types for convenience
pub use catalog::{ResourceCatalog, ResourceDescriptor, find_resources};
pub use command::CommandResult;
pub use relations::{GroupKind, RelationDestination, RelationRule, RelationTable};
pub use services::{ClusterConnection, ConnectionRegistry, KindTable, ObjectView};
pub use table::{ResourceTable, TypeRegistry};
