//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod node;
pub mod role;
pub mod timestamp;
pub mod vocab;

pub use arena::{NodeData, TreeArena, TreeNode};
pub use entities::*;
pub use error::DomainError;
pub use node::{NodeId, NodeInfo, ObjectPattern, Value};
pub use role::Role;
pub use timestamp::Modified;
