//! Hierarchy classification over `isChildOf` relationships

use tracing::trace;

use crate::application::services::extractor::NodeInfoExtractor;
use crate::domain::{vocab, NodeId, NodeInfo, ObjectPattern, Role};
use crate::infrastructure::traits::TripleStore;

/// A child node together with its attributes and classified role.
#[derive(Debug, Clone)]
pub struct ClassifiedChild {
    pub id: NodeId,
    pub info: NodeInfo,
    pub role: Role,
}

/// Decides the structural role of nodes and looks one level ahead.
#[derive(Clone, Copy)]
pub struct HierarchyClassifier<'s> {
    store: &'s dyn TripleStore,
    extractor: NodeInfoExtractor<'s>,
}

impl<'s> HierarchyClassifier<'s> {
    pub fn new(store: &'s dyn TripleStore) -> Self {
        Self {
            store,
            extractor: NodeInfoExtractor::new(store),
        }
    }

    pub fn extractor(&self) -> NodeInfoExtractor<'s> {
        self.extractor
    }

    pub fn role_of(&self, label: Option<&str>) -> Role {
        Role::of_opt(label)
    }

    /// Nodes whose `isChildOf` points at `parent`.
    pub fn children(&self, parent: &NodeId) -> Vec<NodeId> {
        self.store
            .subjects_matching(vocab::IS_CHILD_OF, ObjectPattern::Node(parent))
    }

    /// Immediate children with their info and role.
    pub fn classified_children(&self, parent: &NodeId) -> Vec<ClassifiedChild> {
        self.children(parent)
            .into_iter()
            .map(|id| {
                let info = self.extractor.extract(&id);
                let role = self.role_of(info.label.as_deref());
                ClassifiedChild { id, info, role }
            })
            .collect()
    }

    /// Immediate children classified as `role`; everything else is skipped.
    pub fn children_with_role(&self, parent: &NodeId, role: Role) -> Vec<ClassifiedChild> {
        self.classified_children(parent)
            .into_iter()
            .filter(|child| {
                let keep = child.role == role;
                if !keep {
                    trace!(child = %child.id, found = %child.role, wanted = %role, "skipping child");
                }
                keep
            })
            .collect()
    }

    /// True iff any immediate child is a sub-strand.
    pub fn has_sub_strand_children(&self, node: &NodeId) -> bool {
        self.children(node).iter().any(|child| {
            let label = self.extractor.extract(child).label;
            self.role_of(label.as_deref()) == Role::SubStrand
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::RdfStore;

    fn child(store: &mut RdfStore, id: &str, label: &str, parent: &NodeId) -> NodeId {
        let node = NodeId::iri(format!("http://example.org/{}", id));
        store.insert_literal(&node, vocab::STATEMENT_LABEL, label, Some("en-au"));
        store.insert_link(&node, vocab::IS_CHILD_OF, parent);
        node
    }

    #[test]
    fn given_strand_with_sub_strand_child_when_lookahead_then_true() {
        let mut store = RdfStore::new();
        let strand = NodeId::iri("http://example.org/strand");
        child(&mut store, "ss", "Sub-Strand", &strand);
        child(&mut store, "cd", "Content Description", &strand);

        let classifier = HierarchyClassifier::new(&store);

        assert!(classifier.has_sub_strand_children(&strand));
    }

    #[test]
    fn given_strand_with_only_content_when_lookahead_then_false() {
        let mut store = RdfStore::new();
        let strand = NodeId::iri("http://example.org/strand");
        child(&mut store, "cd1", "Content Description", &strand);
        child(&mut store, "gc", "General Capability", &strand);

        let classifier = HierarchyClassifier::new(&store);

        assert!(!classifier.has_sub_strand_children(&strand));
    }

    #[test]
    fn given_mixed_children_when_filtered_by_role_then_only_matching() {
        let mut store = RdfStore::new();
        let cd = NodeId::iri("http://example.org/cd");
        let e1 = child(&mut store, "e1", "Elaboration", &cd);
        child(&mut store, "asc", "Achievement Standard Component", &cd);
        child(&mut store, "ccp", "Cross-curriculum Priority", &cd);

        let classifier = HierarchyClassifier::new(&store);
        let elaborations = classifier.children_with_role(&cd, Role::Elaboration);

        assert_eq!(elaborations.len(), 1);
        assert_eq!(elaborations[0].id, e1);
        assert_eq!(classifier.classified_children(&cd).len(), 3);
    }
}
