//! Line-based [N-Quads] parser.
//!
//! Blank node labels are preserved verbatim,
//! which the canonicalization engine relies on
//! (the original labels are the keys of the canonical identifier map).
//!
//! [N-Quads]: https://www.w3.org/TR/n-quads/

use thiserror::Error;

use crate::{Quad, Term};

/// Error raised when parsing an N-Quads document.
#[derive(Debug, Error)]
#[error("N-Quads syntax error at line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number of the offending line.
    pub line: usize,
    /// What went wrong.
    pub kind: ErrorKind,
}

/// The different kinds of [`ParseError`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ErrorKind {
    /// Something else was found where `0` was expected.
    #[error("expected {0}")]
    Expected(&'static str),
    /// An invalid or truncated escape sequence.
    #[error("invalid escape sequence")]
    BadEscape,
    /// A character not allowed inside an IRI reference.
    #[error("invalid character in IRI")]
    BadIriChar,
    /// Extra material after the terminating period.
    #[error("unexpected trailing characters")]
    TrailingChars,
}

/// Parse an N-Quads document into a list of [`Quad`]s.
///
/// Empty lines and comment lines (starting with `#`) are skipped;
/// a comment may also follow the terminating period of a statement.
pub fn parse_nquads(input: &str) -> Result<Vec<Quad>, ParseError> {
    let mut quads = Vec::new();
    for (i, raw) in input.lines().enumerate() {
        match parse_line(raw) {
            Ok(Some(quad)) => quads.push(quad),
            Ok(None) => {}
            Err(kind) => return Err(ParseError { line: i + 1, kind }),
        }
    }
    Ok(quads)
}

fn parse_line(raw: &str) -> Result<Option<Quad>, ErrorKind> {
    let mut cursor = Cursor { rest: raw };
    cursor.skip_ws();
    if cursor.rest.is_empty() || cursor.rest.starts_with('#') {
        return Ok(None);
    }
    let s = cursor.term()?;
    if s.as_literal().is_some() {
        return Err(ErrorKind::Expected("IRI or blank node as subject"));
    }
    cursor.skip_ws();
    let p = cursor.term()?;
    if !p.is_iri() {
        return Err(ErrorKind::Expected("IRI as predicate"));
    }
    cursor.skip_ws();
    let o = cursor.term()?;
    cursor.skip_ws();
    let g = if cursor.rest.starts_with('.') {
        None
    } else {
        let g = cursor.term()?;
        if g.as_literal().is_some() {
            return Err(ErrorKind::Expected("IRI or blank node as graph name"));
        }
        cursor.skip_ws();
        Some(g)
    };
    if !cursor.eat('.') {
        return Err(ErrorKind::Expected("."));
    }
    cursor.skip_ws();
    if !cursor.rest.is_empty() && !cursor.rest.starts_with('#') {
        return Err(ErrorKind::TrailingChars);
    }
    Ok(Some(Quad { s, p, o, g }))
}

struct Cursor<'a> {
    rest: &'a str,
}

impl Cursor<'_> {
    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start_matches([' ', '\t']);
    }

    fn eat(&mut self, c: char) -> bool {
        match self.rest.strip_prefix(c) {
            Some(r) => {
                self.rest = r;
                true
            }
            None => false,
        }
    }

    fn term(&mut self) -> Result<Term, ErrorKind> {
        match self.rest.chars().next() {
            Some('<') => Ok(Term::Iri(self.iriref()?)),
            Some('_') => self.bnode(),
            Some('"') => self.literal(),
            _ => Err(ErrorKind::Expected("term")),
        }
    }

    fn iriref(&mut self) -> Result<Box<str>, ErrorKind> {
        let body = self.rest.strip_prefix('<').ok_or(ErrorKind::Expected("IRI"))?;
        let (iri, used) = scan_until(body, '>', false)?;
        self.rest = &body[used..];
        Ok(iri.into())
    }

    fn bnode(&mut self) -> Result<Term, ErrorKind> {
        let body = self
            .rest
            .strip_prefix("_:")
            .ok_or(ErrorKind::Expected("blank node label"))?;
        let end = body
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(body.len());
        if end == 0 {
            return Err(ErrorKind::Expected("blank node label"));
        }
        let label = &body[..end];
        self.rest = &body[end..];
        Ok(Term::blank(label))
    }

    fn literal(&mut self) -> Result<Term, ErrorKind> {
        let body = self
            .rest
            .strip_prefix('"')
            .ok_or(ErrorKind::Expected("literal"))?;
        let (lexical, used) = scan_until(body, '"', true)?;
        self.rest = &body[used..];
        if let Some(r) = self.rest.strip_prefix("^^") {
            self.rest = r;
            if !self.rest.starts_with('<') {
                return Err(ErrorKind::Expected("datatype IRI"));
            }
            let datatype = self.iriref()?;
            Ok(Term::typed_literal(lexical, datatype))
        } else if let Some(r) = self.rest.strip_prefix('@') {
            let end = r
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
                .unwrap_or(r.len());
            if end == 0 {
                return Err(ErrorKind::Expected("language tag"));
            }
            let tag = &r[..end];
            self.rest = &r[end..];
            Ok(Term::lang_literal(lexical, tag))
        } else {
            Ok(Term::literal(lexical))
        }
    }
}

/// Scan `body` until the unescaped `delim`,
/// returning the unescaped content and the number of bytes consumed
/// (including the delimiter).
///
/// With `string_escapes` the full N-Quads ECHAR set is accepted;
/// without it (IRI references) only `\uXXXX`/`\UXXXXXXXX` are,
/// and characters forbidden by the IRIREF production are rejected.
fn scan_until(body: &str, delim: char, string_escapes: bool) -> Result<(String, usize), ErrorKind> {
    let mut out = String::new();
    let mut pos = 0;
    while pos < body.len() {
        let c = body[pos..].chars().next().expect("pos is on a char boundary");
        if c == delim {
            return Ok((out, pos + c.len_utf8()));
        }
        if c == '\\' {
            let esc = body[pos + 1..].chars().next().ok_or(ErrorKind::BadEscape)?;
            match esc {
                'u' => {
                    let hex = body.get(pos + 2..pos + 6).ok_or(ErrorKind::BadEscape)?;
                    out.push(uchar(hex)?);
                    pos += 6;
                }
                'U' => {
                    let hex = body.get(pos + 2..pos + 10).ok_or(ErrorKind::BadEscape)?;
                    out.push(uchar(hex)?);
                    pos += 10;
                }
                't' | 'b' | 'n' | 'r' | 'f' | '"' | '\'' | '\\' if string_escapes => {
                    out.push(match esc {
                        't' => '\t',
                        'b' => '\x08',
                        'n' => '\n',
                        'r' => '\r',
                        'f' => '\x0c',
                        other => other,
                    });
                    pos += 2;
                }
                _ => return Err(ErrorKind::BadEscape),
            }
        } else {
            if !string_escapes
                && (c <= ' ' || matches!(c, '<' | '"' | '{' | '}' | '|' | '^' | '`'))
            {
                return Err(ErrorKind::BadIriChar);
            }
            out.push(c);
            pos += c.len_utf8();
        }
    }
    Err(ErrorKind::Expected(if delim == '>' {
        ">"
    } else {
        "closing quote"
    }))
}

fn uchar(hex: &str) -> Result<char, ErrorKind> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ErrorKind::BadEscape);
    }
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or(ErrorKind::BadEscape)
}

#[cfg(test)]
mod test {
    use super::*;
    use test_case::test_case;

    #[test_case("", 0; "empty")]
    #[test_case("# comment only\n\n", 0; "comments and blank lines")]
    #[test_case("<tag:s> <tag:p> <tag:o> .", 1; "triple iii")]
    #[test_case("_:b0 <tag:p> _:b1 .", 1; "triple bib")]
    #[test_case("<tag:s> <tag:p> \"o\" .", 1; "triple iil")]
    #[test_case("<tag:s> <tag:p> \"o\"^^<tag:dt> .", 1; "typed literal")]
    #[test_case("<tag:s> <tag:p> \"o\"@en-GB .", 1; "lang literal")]
    #[test_case("<tag:s> <tag:p> <tag:o> <tag:g> .", 1; "quad iiii")]
    #[test_case("<tag:s> <tag:p> <tag:o> _:g .", 1; "quad with blank graph")]
    #[test_case("<tag:s> <tag:p> <tag:o> . # trailing comment", 1; "trailing comment")]
    #[test_case("  <tag:s>\t<tag:p> <tag:o> .  ", 1; "extra whitespace")]
    #[test_case("<tag:s> <tag:p> <tag:o> .\n_:b <tag:p> \"x\" .\n", 2; "two lines")]
    fn count(input: &str, n: usize) {
        assert_eq!(parse_nquads(input).unwrap().len(), n);
    }

    #[test]
    fn preserves_blank_node_labels() {
        let quads = parse_nquads("_:a1 <urn:p> _:a2 .").unwrap();
        assert_eq!(quads[0].s, Term::blank("a1"));
        assert_eq!(quads[0].o, Term::blank("a2"));
    }

    #[test]
    fn default_vs_named_graph() {
        let quads = parse_nquads("<tag:s> <tag:p> <tag:o> .\n<tag:s> <tag:p> <tag:o> <tag:g> .").unwrap();
        assert_eq!(quads[0].g, None);
        assert_eq!(quads[1].g, Some(Term::iri("tag:g")));
    }

    #[test]
    fn string_escapes() {
        let quads = parse_nquads(r#"<tag:s> <tag:p> "a\nb\tc\"d\\eA\U00000042" ."#).unwrap();
        let lit = quads[0].o.as_literal().unwrap();
        assert_eq!(&*lit.lexical, "a\nb\tc\"d\\eAB");
    }

    #[test]
    fn iri_uchar() {
        let quads = parse_nquads(r"<tag:s> <tag:p> <tag:\u0041> .").unwrap();
        assert_eq!(quads[0].o, Term::iri("tag:A"));
    }

    #[test_case("<tag:s> <tag:p> <tag:o>", ErrorKind::Expected("."); "missing period")]
    #[test_case("\"l\" <tag:p> <tag:o> .", ErrorKind::Expected("IRI or blank node as subject"); "literal subject")]
    #[test_case("<tag:s> _:p <tag:o> .", ErrorKind::Expected("IRI as predicate"); "blank predicate")]
    #[test_case("<tag:s> <tag:p> \"l\" \"g\" .", ErrorKind::Expected("IRI or blank node as graph name"); "literal graph")]
    #[test_case("<tag:s> <tag:p> \"o\\x\" .", ErrorKind::BadEscape; "bad string escape")]
    #[test_case("<tag:s> <tag:p> \"o\\u00\" .", ErrorKind::BadEscape; "truncated uchar")]
    #[test_case("<tag:s> <tag:p> <tag:o .", ErrorKind::BadIriChar; "space in IRI")]
    #[test_case("<tag:s> <tag:p> \"o .", ErrorKind::Expected("closing quote"); "unterminated literal")]
    #[test_case("<tag:s> <tag:p> <tag:o> . <tag:x>", ErrorKind::TrailingChars; "trailing term")]
    #[test_case("<tag:s> <tag:p> \"o\"^^tag:dt .", ErrorKind::Expected("datatype IRI"); "unbracketed datatype")]
    fn errors(input: &str, kind: ErrorKind) {
        let err = parse_nquads(input).unwrap_err();
        assert_eq!(err.kind, kind);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn error_line_number() {
        let err = parse_nquads("<tag:s> <tag:p> <tag:o> .\n<tag:s> <tag:p>\n").unwrap_err();
        assert_eq!(err.line, 2);
    }
}
