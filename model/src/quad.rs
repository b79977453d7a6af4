//! I define [`Quad`], an owning subject-predicate-object-graph statement.

use crate::Term;

/// An RDF quad.
///
/// The graph name is `None` for the default graph.
/// Immutable once built; the predicate is always an IRI.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Quad {
    /// The subject (IRI or blank node).
    pub s: Term,
    /// The predicate (always an IRI).
    pub p: Term,
    /// The object (any term).
    pub o: Term,
    /// The graph name (IRI or blank node), `None` for the default graph.
    pub g: Option<Term>,
}

impl Quad {
    /// Build a quad; panics if `p` is not an IRI or `g` is a literal.
    pub fn new(s: Term, p: Term, o: Term, g: Option<Term>) -> Self {
        assert!(p.is_iri(), "predicate must be an IRI");
        assert!(
            g.as_ref().map_or(true, |g| g.as_literal().is_none()),
            "graph name must be an IRI or a blank node"
        );
        Quad { s, p, o, g }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accepts_default_and_named_graphs() {
        let q = Quad::new(
            Term::blank("s"),
            Term::iri("tag:p"),
            Term::literal("o"),
            None,
        );
        assert_eq!(q.g, None);
        let q = Quad::new(
            Term::iri("tag:s"),
            Term::iri("tag:p"),
            Term::iri("tag:o"),
            Some(Term::blank("g")),
        );
        assert_eq!(q.g, Some(Term::blank("g")));
    }

    #[test]
    #[should_panic(expected = "graph name must be an IRI or a blank node")]
    fn literal_graph_rejected() {
        Quad::new(
            Term::iri("tag:s"),
            Term::iri("tag:p"),
            Term::iri("tag:o"),
            Some(Term::literal("g")),
        );
    }

    #[test]
    #[should_panic(expected = "predicate must be an IRI")]
    fn blank_predicate_rejected() {
        Quad::new(
            Term::iri("tag:s"),
            Term::blank("p"),
            Term::iri("tag:o"),
            None,
        );
    }
}
