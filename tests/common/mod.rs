//! RDF/XML fixture builder shared by the integration tests
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use curriculum_tree::application::services::CurriculumService;
use curriculum_tree::config::LoadSettings;
use curriculum_tree::infrastructure::traits::RealFileSystem;
use curriculum_tree::util::testing;

pub const BASE: &str = "http://vocabulary.curriculum.edu.au/MRAC/2023/07/";
pub const MODIFIED: &str = "2023-07-01T10:00:00+00:00";

/// One `rdf:Description` in a fixture document.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub label: Option<String>,
    pub code: Option<String>,
    pub title: Option<String>,
    pub modified: Option<String>,
    pub description: Option<String>,
    pub parents: Vec<String>,
    pub children: Vec<String>,
    pub levels: Vec<String>,
}

impl Node {
    pub fn new(id: &str, label: &str, code: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            label: Some(label.to_string()),
            code: Some(code.to_string()),
            title: Some(title.to_string()),
            modified: Some(MODIFIED.to_string()),
            description: None,
            parents: vec![],
            children: vec![],
            levels: vec![],
        }
    }

    /// The node carrying notation "root".
    pub fn root(id: &str) -> Self {
        Self {
            label: None,
            ..Self::new(id, "", "root", "Australian Curriculum")
        }
    }

    pub fn child_of(mut self, parent: &str) -> Self {
        self.parents.push(parent.to_string());
        self
    }

    pub fn has_child(mut self, child: &str) -> Self {
        self.children.push(child.to_string());
        self
    }

    pub fn has_level(mut self, level: &str) -> Self {
        self.levels.push(level.to_string());
        self
    }

    pub fn without_title(mut self) -> Self {
        self.title = None;
        self
    }

    pub fn without_code(mut self) -> Self {
        self.code = None;
        self
    }

    pub fn modified(mut self, raw: &str) -> Self {
        self.modified = Some(raw.to_string());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn iri(&self) -> String {
        iri(&self.id)
    }
}

pub fn iri(id: &str) -> String {
    format!("{BASE}{id}")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Serialise nodes as an RDF/XML document using the curriculum vocabulary.
pub fn document(nodes: &[Node]) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:dcterms="http://purl.org/dc/terms/"
         xmlns:asn="http://purl.org/ASN/schema/core/"
         xmlns:gem="http://purl.org/gem/qualifiers/">
"#,
    );
    for node in nodes {
        out.push_str(&format!("  <rdf:Description rdf:about=\"{}\">\n", node.iri()));
        let literals = [
            ("dcterms:title", &node.title),
            ("asn:statementLabel", &node.label),
            ("asn:statementNotation", &node.code),
            ("dcterms:description", &node.description),
        ];
        for (tag, value) in literals {
            if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
                out.push_str(&format!(
                    "    <{tag} xml:lang=\"en-au\">{}</{tag}>\n",
                    escape(value)
                ));
            }
        }
        if let Some(modified) = &node.modified {
            out.push_str(&format!("    <dcterms:modified>{}</dcterms:modified>\n", modified));
        }
        for (tag, targets) in [
            ("gem:isChildOf", &node.parents),
            ("gem:hasChild", &node.children),
            ("asn:hasLevel", &node.levels),
        ] {
            for target in targets {
                out.push_str(&format!("    <{tag} rdf:resource=\"{}\"/>\n", iri(target)));
            }
        }
        out.push_str("  </rdf:Description>\n");
    }
    out.push_str("</rdf:RDF>\n");
    out
}

pub fn write_fixture(dir: &TempDir, name: &str, nodes: &[Node]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, document(nodes)).expect("write rdf fixture");
    path
}

pub fn service(settings: LoadSettings) -> CurriculumService {
    testing::init_test_setup();
    CurriculumService::new(Arc::new(RealFileSystem), settings)
}

/// Mathematics, Year 7, strand Number with two direct content descriptions.
pub fn mathematics() -> Vec<Node> {
    vec![
        Node::root("root"),
        Node::new("LA/MAT", "Learning Area", "MAT", "Mathematics").child_of("root"),
        Node::new("MAT", "Subject", "MAT", "Mathematics").child_of("LA/MAT"),
        Node::new("MAT/Y7", "Year Level", "Y7", "Year 7")
            .child_of("MAT")
            .description("<p>In Year 7, learning in <em>Mathematics</em> builds on</p>"),
        Node::new("MAT/Y7/N", "Strand", "N", "Number").child_of("MAT/Y7"),
        Node::new("AC9M7N01", "Content Description", "AC9M7N01", "describe the relationship between perfect square numbers and square roots")
            .child_of("MAT/Y7/N"),
        Node::new("AC9M7N02", "Content Description", "AC9M7N02", "represent natural numbers as products of powers of prime numbers")
            .child_of("MAT/Y7/N"),
        Node::new("AC9M7N01_E1", "Elaboration", "AC9M7N01_E1", "using concrete materials such as grid paper")
            .child_of("AC9M7N01"),
        Node::new("AC9M7N01_GC", "General Capability", "GC1", "Numeracy").child_of("AC9M7N01"),
        Node::new("MAT/Y7/AS", "Achievement Standard", "AS7", "By the end of Year 7, students ...")
            .child_of("MAT/Y7"),
        Node::new("AS7_1", "Achievement Standard Component", "AS7_1", "students use square numbers")
            .child_of("MAT/Y7/AS"),
    ]
}

/// English, Year 8, strand Language with two sub-strands.
pub fn english() -> Vec<Node> {
    vec![
        Node::root("en-root"),
        Node::new("LA/ENG", "Learning Area", "ENG", "English").child_of("en-root"),
        Node::new("ENG", "Subject", "ENG", "English").child_of("LA/ENG"),
        Node::new("ENG/Y8", "Year Level", "Y8", "Year 8").child_of("ENG"),
        Node::new("ENG/Y8/LAN", "Strand", "LAN", "Language").child_of("ENG/Y8"),
        Node::new("ENG/Y8/LAN/TS", "Sub-Strand", "TS", "Text structure and organisation")
            .child_of("ENG/Y8/LAN"),
        Node::new("ENG/Y8/LAN/EG", "Sub-Strand", "EG", "Expressing and developing ideas")
            .child_of("ENG/Y8/LAN"),
        Node::new("AC9E8LA03", "Content Description", "AC9E8LA03", "analyse how text structures")
            .child_of("ENG/Y8/LAN/TS"),
        Node::new("AC9E8LA05", "Content Description", "AC9E8LA05", "understand how coherence")
            .child_of("ENG/Y8/LAN/EG"),
        Node::new("AC9E8LA06", "Content Description", "AC9E8LA06", "analyse and evaluate")
            .child_of("ENG/Y8/LAN/EG"),
    ]
}
