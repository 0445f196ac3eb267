//! Rebuilds curriculum RDF/XML exports as a typed, navigable tree.
//!
//! Layers, innermost first:
//! - [`domain`]: curriculum model, roles, timestamps, node arena
//! - [`infrastructure`]: triple store adapter, filesystem boundary, service container
//! - [`application`]: extraction, classification, tree building, walking, rendering
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
