//! In-memory triple store backed by `oxrdf::Graph`
//!
//! One store per curriculum model; each loaded file is parsed into its own
//! store first and then merged into the shared one.

use std::path::Path;

use itertools::Itertools;
use oxrdf::{
    BlankNode, BlankNodeRef, Graph, Literal, NamedNode, NamedNodeRef, Subject, SubjectRef, Term,
    TermRef, Triple,
};
use oxrdfio::{RdfFormat, RdfParser};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{NodeId, ObjectPattern, Value};
use crate::infrastructure::traits::{FileSystem, TripleStore};

/// Triple store adapter over an owned RDF graph.
#[derive(Debug, Default, Clone)]
pub struct RdfStore {
    graph: Graph,
}

impl RdfStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an RDF/XML file into a fresh store.
    ///
    /// Fails with `FileNotFound` for a missing or unreadable path and
    /// `EmptyGraph` when the document yields no triples.
    #[instrument(level = "debug", skip(fs))]
    pub fn load(fs: &dyn FileSystem, path: &Path) -> ApplicationResult<Self> {
        if !fs.is_file(path) {
            return Err(ApplicationError::FileNotFound(path.to_path_buf()));
        }
        let bytes = fs.read(path).with_path_context("read rdf file", path)?;

        let store = Self::parse_rdf_xml(&bytes).map_err(|message| ApplicationError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        if store.is_empty() {
            return Err(ApplicationError::EmptyGraph(path.to_path_buf()));
        }
        debug!("loaded {} triples from {}", store.len(), path.display());
        Ok(store)
    }

    /// Parse an RDF/XML document held in memory.
    pub fn parse_rdf_xml(bytes: &[u8]) -> Result<Self, String> {
        let mut graph = Graph::new();
        for quad in RdfParser::from_format(RdfFormat::RdfXml).for_reader(bytes) {
            let quad = quad.map_err(|e| e.to_string())?;
            graph.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
        }
        Ok(Self { graph })
    }

    /// Add every triple of `other`; returns the triples that were new.
    pub fn merge(&mut self, other: &RdfStore) -> Vec<Triple> {
        other
            .graph
            .iter()
            .filter(|t| self.graph.insert(*t))
            .map(|t| t.into_owned())
            .collect()
    }

    /// Remove triples previously returned by [`RdfStore::merge`].
    pub fn retract(&mut self, triples: &[Triple]) {
        for triple in triples {
            self.graph.remove(triple);
        }
    }

    /// Add `subject predicate "value"@language`.
    pub fn insert_literal(
        &mut self,
        subject: &NodeId,
        predicate: &str,
        value: &str,
        language: Option<&str>,
    ) {
        let literal = match language {
            Some(lang) => Literal::new_language_tagged_literal_unchecked(value, lang),
            None => Literal::new_simple_literal(value),
        };
        self.graph.insert(&Triple::new(
            owned_subject(subject),
            NamedNode::new_unchecked(predicate),
            literal,
        ));
    }

    /// Add `subject predicate object` between two nodes.
    pub fn insert_link(&mut self, subject: &NodeId, predicate: &str, object: &NodeId) {
        let object: Term = match owned_subject(object) {
            Subject::NamedNode(n) => n.into(),
            Subject::BlankNode(b) => b.into(),
            #[allow(unreachable_patterns)]
            _ => return,
        };
        self.graph.insert(&Triple::new(
            owned_subject(subject),
            NamedNode::new_unchecked(predicate),
            object,
        ));
    }
}

impl TripleStore for RdfStore {
    fn subjects_matching(&self, predicate: &str, object: ObjectPattern<'_>) -> Vec<NodeId> {
        let predicate = NamedNodeRef::new_unchecked(predicate);
        match object {
            ObjectPattern::Node(node) => {
                let object: TermRef<'_> = match subject_ref(node) {
                    SubjectRef::NamedNode(n) => n.into(),
                    SubjectRef::BlankNode(b) => b.into(),
                    #[allow(unreachable_patterns)]
                    _ => return Vec::new(),
                };
                self.graph
                    .subjects_for_predicate_object(predicate, object)
                    .filter_map(node_id)
                    .collect()
            }
            ObjectPattern::Literal(value) => self
                .graph
                .triples_for_predicate(predicate)
                .filter(|t| matches!(t.object, TermRef::Literal(l) if l.value() == value))
                .filter_map(|t| node_id(t.subject))
                .unique()
                .collect(),
        }
    }

    fn value_of(&self, subject: &NodeId, predicate: &str) -> Option<Value> {
        self.graph
            .object_for_subject_predicate(subject_ref(subject), NamedNodeRef::new_unchecked(predicate))
            .and_then(value)
    }

    fn values_of(&self, subject: &NodeId, predicate: &str) -> Vec<Value> {
        self.graph
            .objects_for_subject_predicate(subject_ref(subject), NamedNodeRef::new_unchecked(predicate))
            .filter_map(value)
            .collect()
    }

    fn len(&self) -> usize {
        self.graph.len()
    }
}

fn subject_ref(id: &NodeId) -> SubjectRef<'_> {
    match id {
        NodeId::Iri(iri) => NamedNodeRef::new_unchecked(iri).into(),
        NodeId::Blank(label) => BlankNodeRef::new_unchecked(label).into(),
    }
}

fn owned_subject(id: &NodeId) -> Subject {
    match id {
        NodeId::Iri(iri) => NamedNode::new_unchecked(iri.clone()).into(),
        NodeId::Blank(label) => BlankNode::new_unchecked(label.clone()).into(),
    }
}

#[allow(unreachable_patterns)]
fn node_id(subject: SubjectRef<'_>) -> Option<NodeId> {
    match subject {
        SubjectRef::NamedNode(n) => Some(NodeId::Iri(n.as_str().to_owned())),
        SubjectRef::BlankNode(b) => Some(NodeId::Blank(b.as_str().to_owned())),
        _ => None,
    }
}

#[allow(unreachable_patterns)]
fn value(term: TermRef<'_>) -> Option<Value> {
    match term {
        TermRef::NamedNode(n) => Some(Value::Node(NodeId::Iri(n.as_str().to_owned()))),
        TermRef::BlankNode(b) => Some(Value::Node(NodeId::Blank(b.as_str().to_owned()))),
        TermRef::Literal(l) => Some(Value::Literal {
            value: l.value().to_owned(),
            language: l.language().map(str::to_owned),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vocab;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:dcterms="http://purl.org/dc/terms/"
         xmlns:asn="http://purl.org/ASN/schema/core/"
         xmlns:gem="http://purl.org/gem/qualifiers/">
  <rdf:Description rdf:about="http://example.org/LA">
    <dcterms:title xml:lang="en-au">Mathematics</dcterms:title>
    <asn:statementLabel xml:lang="en-au">Learning Area</asn:statementLabel>
  </rdf:Description>
  <rdf:Description rdf:about="http://example.org/S">
    <asn:statementLabel xml:lang="en-au">Subject</asn:statementLabel>
    <gem:isChildOf rdf:resource="http://example.org/LA"/>
  </rdf:Description>
</rdf:RDF>"#;

    #[test]
    fn given_rdf_xml_when_parsed_then_literal_lookup_ignores_language() {
        let store = RdfStore::parse_rdf_xml(DOC.as_bytes()).unwrap();

        let found = store.subjects_matching(vocab::STATEMENT_LABEL, ObjectPattern::Literal("Learning Area"));

        assert_eq!(found, vec![NodeId::iri("http://example.org/LA")]);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn given_link_when_queried_by_node_then_returns_children() {
        let store = RdfStore::parse_rdf_xml(DOC.as_bytes()).unwrap();
        let la = NodeId::iri("http://example.org/LA");

        let children = store.subjects_matching(vocab::IS_CHILD_OF, ObjectPattern::Node(&la));

        assert_eq!(children, vec![NodeId::iri("http://example.org/S")]);
    }

    #[test]
    fn given_language_tagged_title_when_value_of_then_keeps_language() {
        let store = RdfStore::parse_rdf_xml(DOC.as_bytes()).unwrap();
        let la = NodeId::iri("http://example.org/LA");

        let title = store.value_of(&la, vocab::TITLE).unwrap();

        assert_eq!(title.text(), "Mathematics");
        assert_eq!(
            title,
            Value::Literal {
                value: "Mathematics".into(),
                language: Some("en-au".into())
            }
        );
        assert!(store.value_of(&la, vocab::DESCRIPTION).is_none());
    }

    #[test]
    fn given_merged_store_when_retracted_then_back_to_original() {
        let mut shared = RdfStore::new();
        let a = NodeId::iri("http://example.org/a");
        shared.insert_literal(&a, vocab::TITLE, "A", None);

        let mut other = RdfStore::new();
        other.insert_literal(&a, vocab::TITLE, "A", None);
        other.insert_literal(&a, vocab::STATEMENT_NOTATION, "root", Some("en-au"));

        let added = shared.merge(&other);
        assert_eq!(added.len(), 1, "only the notation triple is new");
        assert_eq!(shared.len(), 2);

        shared.retract(&added);
        assert_eq!(shared.len(), 1);
        assert!(shared.value_of(&a, vocab::TITLE).is_some());
    }

    #[test]
    fn given_malformed_xml_when_parsed_then_errors() {
        assert!(RdfStore::parse_rdf_xml(b"<rdf:RDF").is_err());
    }

    #[test]
    fn given_blank_nodes_when_linked_then_round_trip_ids() {
        let mut store = RdfStore::new();
        let parent = NodeId::blank("p");
        let child = NodeId::blank("c");
        store.insert_link(&child, vocab::IS_CHILD_OF, &parent);

        let found = store.subjects_matching(vocab::IS_CHILD_OF, ObjectPattern::Node(&parent));

        assert_eq!(found, vec![child]);
    }
}
