//! Canonical N-Quads serialization.

use crate::{Quad, Term, XSD_STRING};

/// Serialize a term in canonical N-Quads, followed by a single space.
pub fn nq_term(term: &Term, buffer: &mut String) {
    match term {
        Term::Iri(iri) => {
            buffer.push('<');
            buffer.push_str(iri);
            buffer.push('>');
        }
        Term::Literal(lit) => {
            buffer.push('"');
            for c in lit.lexical.chars() {
                match c {
                    '"' => buffer.push_str("\\\""),
                    '\\' => buffer.push_str("\\\\"),
                    '\n' => buffer.push_str("\\n"),
                    '\r' => buffer.push_str("\\r"),
                    '\t' => buffer.push_str("\\t"),
                    '\x08' => buffer.push_str("\\b"),
                    '\x0c' => buffer.push_str("\\f"),
                    '\x7f' => buffer.push_str("\\u007F"),
                    c if c <= '\x1f' => buffer.push_str(&format!("\\u{:04X}", c as u8)),
                    _ => buffer.push(c),
                }
            }
            buffer.push('"');
            if let Some(tag) = &lit.language {
                buffer.push('@');
                buffer.push_str(tag);
            } else if &*lit.datatype != XSD_STRING {
                buffer.push_str("^^<");
                buffer.push_str(&lit.datatype);
                buffer.push('>');
            }
        }
        Term::BlankNode(label) => {
            buffer.push_str("_:");
            buffer.push_str(label);
        }
    }
    buffer.push(' ');
}

/// Serialize a quad as one canonical N-Quads line, terminated by `.\n`.
pub fn nq_quad(quad: &Quad, buffer: &mut String) {
    nq_term(&quad.s, buffer);
    nq_term(&quad.p, buffer);
    nq_term(&quad.o, buffer);
    if let Some(gn) = &quad.g {
        nq_term(gn, buffer);
    }
    buffer.push_str(".\n");
}
