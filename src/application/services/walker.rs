//! Generic graph walker
//!
//! Follows the forward pointers `hasLevel` then `hasChild` from a root node
//! and records every node reached in a [`TreeArena`]. It knows nothing about
//! curriculum roles; it is a debugging view of the raw graph shape.

use std::collections::HashSet;

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::application::services::extractor::NodeInfoExtractor;
use crate::domain::{vocab, DomainError, NodeData, NodeId, ObjectPattern, TreeArena};
use crate::infrastructure::traits::TripleStore;

pub struct GraphWalker<'s> {
    store: &'s dyn TripleStore,
    extractor: NodeInfoExtractor<'s>,
}

impl<'s> GraphWalker<'s> {
    pub fn new(store: &'s dyn TripleStore) -> Self {
        Self {
            store,
            extractor: NodeInfoExtractor::new(store),
        }
    }

    /// Nodes with notation "root", in no particular order.
    pub fn roots(&self) -> Vec<NodeId> {
        self.store.subjects_matching(
            vocab::STATEMENT_NOTATION,
            ObjectPattern::Literal(vocab::ROOT_NOTATION),
        )
    }

    /// Walk from `root` depth-first.
    ///
    /// A node met again on its own ancestor path is a cycle and fails the walk.
    /// A node already expanded on another branch is recorded as a leaf.
    #[instrument(level = "debug", skip(self), fields(root = %root))]
    pub fn walk(&self, root: &NodeId) -> Result<TreeArena, DomainError> {
        let mut arena = TreeArena::new();
        let mut expanded = HashSet::new();
        let idx = arena.insert_node(self.node_data(root), None);
        self.expand(&mut arena, idx, &mut expanded)?;
        debug!(nodes = arena.len(), depth = arena.depth(), "walk finished");
        Ok(arena)
    }

    fn expand(
        &self,
        arena: &mut TreeArena,
        idx: Index,
        expanded: &mut HashSet<NodeId>,
    ) -> Result<(), DomainError> {
        let id = match arena.get_node(idx) {
            Some(node) => node.data.id.clone(),
            None => return Ok(()),
        };
        if !expanded.insert(id.clone()) {
            trace!(node = %id, "already expanded");
            return Ok(());
        }

        for child in self.forward_links(&id) {
            if arena.path_to(idx).contains(&&child) {
                return Err(DomainError::CycleDetected(child));
            }
            let child_idx = arena.insert_node(self.node_data(&child), Some(idx));
            self.expand(arena, child_idx, expanded)?;
        }
        Ok(())
    }

    /// Objects of `hasLevel`, then of `hasChild`. Literal objects are ignored.
    fn forward_links(&self, id: &NodeId) -> Vec<NodeId> {
        [vocab::HAS_LEVEL, vocab::HAS_CHILD]
            .into_iter()
            .flat_map(|predicate| self.store.values_of(id, predicate))
            .filter_map(|value| value.as_node().cloned())
            .collect()
    }

    fn node_data(&self, id: &NodeId) -> NodeData {
        let info = self.extractor.extract(id);
        NodeData {
            id: id.clone(),
            label: info.label,
            code: info.code,
            title: info.title,
        }
    }
}
