//! Node info extraction
//!
//! Reads the fixed set of attribute predicates for one node. No
//! interpretation happens here; absent values stay `None`.

use crate::domain::{vocab, NodeId, NodeInfo};
use crate::infrastructure::traits::TripleStore;

/// Pulls the canonical attributes of a node out of a triple store.
#[derive(Clone, Copy)]
pub struct NodeInfoExtractor<'s> {
    store: &'s dyn TripleStore,
}

impl<'s> NodeInfoExtractor<'s> {
    pub fn new(store: &'s dyn TripleStore) -> Self {
        Self { store }
    }

    pub fn extract(&self, node: &NodeId) -> NodeInfo {
        NodeInfo {
            title: self.text(node, vocab::TITLE),
            label: self.text(node, vocab::STATEMENT_LABEL),
            code: self.text(node, vocab::STATEMENT_NOTATION),
            description: self.text(node, vocab::DESCRIPTION),
            modified_raw: self.text(node, vocab::MODIFIED),
            nominal_year_level: self.text(node, vocab::NOMINAL_YEAR_LEVEL),
        }
    }

    fn text(&self, node: &NodeId, predicate: &str) -> Option<String> {
        self.store
            .value_of(node, predicate)
            .map(|v| v.text().to_string())
    }
}
