//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::node::NodeId;
use crate::domain::role::Role;

/// Domain errors represent malformed curriculum structure.
/// Any of them aborts the load of the file being processed.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{role} node {node} has no {field}")]
    MissingField {
        node: NodeId,
        role: Role,
        field: &'static str,
    },

    #[error("invalid modified timestamp on {node}: {value:?}")]
    InvalidTimestamp { node: NodeId, value: String },

    #[error("expected exactly one root node, found {count}")]
    RootCardinality { count: usize },

    #[error("duplicate {role} key {key:?} under {parent}")]
    DuplicateKey {
        parent: String,
        role: Role,
        key: String,
    },

    #[error("dangling back-reference: {0}")]
    DanglingReference(String),

    #[error("cycle detected in graph at: {0}")]
    CycleDetected(NodeId),
}
