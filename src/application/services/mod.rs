//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, TripleStore)
//! but are themselves concrete structs, not traits.

mod builder;
mod classifier;
mod curriculum;
mod extractor;
mod render;
mod walker;

pub use builder::{BuildResult, FileBuild, TreeBuilder};
pub use classifier::{ClassifiedChild, HierarchyClassifier};
pub use curriculum::{expand_inputs, CurriculumService};
pub use extractor::NodeInfoExtractor;
pub use render::{MarkdownRenderer, RenderReport, INDEX_NAME};
pub use walker::GraphWalker;
