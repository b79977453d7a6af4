//! I define [`Term`], an owning representation of RDF terms.

/// The datatype IRI of plain string literals.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// The datatype IRI of language-tagged literals.
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// A single RDF term: an IRI, a [literal](Literal) or a blank node.
///
/// Equality and ordering are structural;
/// derived `Ord` is only used for deterministic container ordering,
/// not for the codepoint ordering of canonical N-Quads lines
/// (which is obtained by sorting the serialized lines themselves).
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Term {
    /// An IRI, stored without the surrounding angle brackets.
    Iri(Box<str>),
    /// A literal.
    Literal(Literal),
    /// A blank node, identified by its label (without the `_:` prefix).
    BlankNode(Box<str>),
}

/// The parts of a [literal term](Term::Literal).
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Literal {
    /// The lexical form.
    pub lexical: Box<str>,
    /// The datatype IRI
    /// ([`RDF_LANG_STRING`] whenever `language` is set).
    pub datatype: Box<str>,
    /// The language tag, if any.
    pub language: Option<Box<str>>,
}

impl Term {
    /// Build an IRI term.
    pub fn iri(iri: impl Into<Box<str>>) -> Self {
        Term::Iri(iri.into())
    }

    /// Build a blank node term from its label (without the `_:` prefix).
    pub fn blank(label: impl Into<Box<str>>) -> Self {
        Term::BlankNode(label.into())
    }

    /// Build an `xsd:string` literal term.
    pub fn literal(lexical: impl Into<Box<str>>) -> Self {
        Term::typed_literal(lexical, XSD_STRING)
    }

    /// Build a datatyped literal term.
    pub fn typed_literal(lexical: impl Into<Box<str>>, datatype: impl Into<Box<str>>) -> Self {
        Term::Literal(Literal {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language: None,
        })
    }

    /// Build a language-tagged literal term
    /// (datatype is implicitly `rdf:langString`).
    pub fn lang_literal(lexical: impl Into<Box<str>>, tag: impl Into<Box<str>>) -> Self {
        Term::Literal(Literal {
            lexical: lexical.into(),
            datatype: RDF_LANG_STRING.into(),
            language: Some(tag.into()),
        })
    }

    /// The IRI of this term, if it is an IRI.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The blank node label of this term, if it is a blank node.
    pub fn bnode_id(&self) -> Option<&str> {
        match self {
            Term::BlankNode(label) => Some(label),
            _ => None,
        }
    }

    /// The literal parts of this term, if it is a literal.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Whether this term is an IRI.
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }
}
