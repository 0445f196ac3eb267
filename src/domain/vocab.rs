//! Fixed predicate vocabulary of the curriculum ontology

pub const TITLE: &str = "http://purl.org/dc/terms/title";
pub const DESCRIPTION: &str = "http://purl.org/dc/terms/description";
pub const MODIFIED: &str = "http://purl.org/dc/terms/modified";
pub const STATEMENT_LABEL: &str = "http://purl.org/ASN/schema/core/statementLabel";
pub const STATEMENT_NOTATION: &str = "http://purl.org/ASN/schema/core/statementNotation";
pub const NOMINAL_YEAR_LEVEL: &str = "http://www.esa.edu.au/nominalYearLevel";
pub const IS_CHILD_OF: &str = "http://purl.org/gem/qualifiers/isChildOf";
pub const HAS_CHILD: &str = "http://purl.org/gem/qualifiers/hasChild";
pub const HAS_LEVEL: &str = "http://purl.org/ASN/schema/core/hasLevel";

/// Notation literal carried by the single root node of a file.
pub const ROOT_NOTATION: &str = "root";
