//! This crate is part of `rdfc`,
//! an implementation of [RDF dataset canonicalization] (RDFC-1.0) in Rust.
//!
//! It provides the data model shared by the canonicalization engine and its
//! collaborators: [terms](Term), [quads](Quad), the canonical [N-Quads]
//! serialization ([`nq`]) and a label-preserving N-Quads [parser].
//!
//! [RDF dataset canonicalization]: https://www.w3.org/TR/rdf-canon/
//! [N-Quads]: https://www.w3.org/TR/n-quads/

#![deny(missing_docs)]

pub mod nq;
pub mod parser;
mod quad;
mod term;

pub use parser::{parse_nquads, ParseError};
pub use quad::Quad;
pub use term::{Literal, Term, RDF_LANG_STRING, XSD_STRING};
