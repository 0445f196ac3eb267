//! Graph node identifiers and the values attached to them

use std::fmt;

/// Opaque reference to a node in the source graph.
///
/// Stable for the lifetime of the store that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    /// Named node (IRI)
    Iri(String),
    /// Blank node label, without the `_:` prefix
    Blank(String),
}

impl NodeId {
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Self::Blank(label.into())
    }

    /// Last path or fragment segment of an IRI, handy for compact display.
    pub fn short(&self) -> &str {
        match self {
            NodeId::Iri(iri) => iri
                .rsplit(['/', '#'])
                .find(|s| !s.is_empty())
                .unwrap_or(iri.as_str()),
            NodeId::Blank(label) => label,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Iri(iri) => write!(f, "<{}>", iri),
            NodeId::Blank(label) => write!(f, "_:{}", label),
        }
    }
}

/// Object position of a statement: either a literal or another node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Literal {
        value: String,
        language: Option<String>,
    },
    Node(NodeId),
}

impl Value {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: None,
        }
    }

    /// Text form: the lexical value of a literal, or the IRI / label of a node.
    pub fn text(&self) -> &str {
        match self {
            Value::Literal { value, .. } => value,
            Value::Node(NodeId::Iri(iri)) => iri,
            Value::Node(NodeId::Blank(label)) => label,
        }
    }

    pub fn as_node(&self) -> Option<&NodeId> {
        match self {
            Value::Node(id) => Some(id),
            Value::Literal { .. } => None,
        }
    }
}

/// Pattern for the object position of a subject lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectPattern<'a> {
    /// Any literal with this lexical value, whatever its language tag or datatype
    Literal(&'a str),
    /// Exactly this node
    Node(&'a NodeId),
}

/// Canonical attributes of a curriculum node, as read from the graph.
///
/// Every field may be absent; callers decide which absences are fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeInfo {
    pub title: Option<String>,
    pub label: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub modified_raw: Option<String>,
    pub nominal_year_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_iri_when_short_then_returns_last_segment() {
        let id = NodeId::iri("http://vocabulary.curriculum.edu.au/MRAC/2023/07/LA/MAT");
        assert_eq!(id.short(), "MAT");
        let hash = NodeId::iri("http://example.org/ns#Thing");
        assert_eq!(hash.short(), "Thing");
    }

    #[test]
    fn given_blank_node_when_display_then_uses_prefix() {
        assert_eq!(NodeId::blank("b0").to_string(), "_:b0");
        assert_eq!(NodeId::iri("http://x/y").to_string(), "<http://x/y>");
    }
}
