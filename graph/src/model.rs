//! Core RDF model types.
//!
//! Terms are owned strings tagged with their kind. A [`Triple`] optionally
//! carries a graph name, which makes it a quad. Both render in the
//! line-oriented N-Quads form through [`std::fmt::Display`].

use std::fmt;

use crate::vocab::{RDF_LANG_STRING, XSD_STRING};

/// An RDF term: an IRI, a blank node, or a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// An absolute IRI, stored without angle brackets.
    Iri(String),
    /// A blank node, stored without the `_:` prefix.
    BlankNode(String),
    /// A literal with an optional datatype IRI or language tag.
    ///
    /// Simple literals carry neither; `xsd:string` is normalized away on
    /// construction through [`Term::literal`].
    Literal {
        /// Lexical form, unescaped.
        value: String,
        /// Datatype IRI, absent for simple and language-tagged literals.
        datatype: Option<String>,
        /// Language tag, lowercase as given by the parser.
        language: Option<String>,
    },
}

impl Term {
    /// Creates an IRI term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Creates a blank node term from its label (without `_:`).
    pub fn blank(label: impl Into<String>) -> Self {
        Term::BlankNode(label.into())
    }

    /// Creates a literal, dropping datatypes implied by RDF 1.1
    /// (`xsd:string`, and `rdf:langString` when a language tag is present).
    pub fn literal(
        value: impl Into<String>,
        datatype: Option<String>,
        language: Option<String>,
    ) -> Self {
        let datatype = match (&language, datatype) {
            (Some(_), _) => None,
            (None, Some(dt)) if dt == XSD_STRING || dt == RDF_LANG_STRING => None,
            (None, dt) => dt,
        };
        Term::Literal {
            value: value.into(),
            datatype,
            language,
        }
    }

    /// Creates a simple literal.
    pub fn plain(value: impl Into<String>) -> Self {
        Term::literal(value, None, None)
    }

    /// Returns the IRI string, blank node label, or lexical form.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::BlankNode(label) => label,
            Term::Literal { value, .. } => value,
        }
    }

    /// Returns true for IRI terms.
    #[must_use]
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Returns true for blank nodes.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    /// Returns the trailing name of an IRI: the part after the last `#`,
    /// or after the last `/` when there is no fragment.
    ///
    /// Non-IRI terms return their whole value.
    #[must_use]
    pub fn local_name(&self) -> &str {
        let value = self.value();
        if !self.is_iri() {
            return value;
        }
        match value.rfind('#') {
            Some(pos) => &value[pos + 1..],
            None => value.rsplit('/').next().unwrap_or(value),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::BlankNode(label) => write!(f, "_:{}", label),
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                write!(f, "\"{}\"", escape_literal(value))?;
                if let Some(lang) = language {
                    write!(f, "@{}", lang)
                } else if let Some(dt) = datatype {
                    write!(f, "^^<{}>", dt)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// A subject-predicate-object statement with an optional graph name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Subject term (IRI or blank node).
    pub subject: Term,
    /// Predicate IRI.
    pub predicate: Term,
    /// Object term.
    pub object: Term,
    /// Graph name; `None` for the default graph.
    pub graph: Option<Term>,
}

impl Triple {
    /// Creates a triple in the default graph.
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph: None,
        }
    }

    /// Places this triple in a named graph.
    #[must_use]
    pub fn in_graph(mut self, graph: Term) -> Self {
        self.graph = Some(graph);
        self
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if let Some(graph) = &self.graph {
            write!(f, " {}", graph)?;
        }
        f.write_str(" .")
    }
}

/// Escapes a lexical form for a double-quoted N-Triples string.
#[must_use]
pub fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iri_and_blank_rendering() {
        assert_eq!(Term::iri("http://ex.org/s").to_string(), "<http://ex.org/s>");
        assert_eq!(Term::blank("b0").to_string(), "_:b0");
    }

    #[test]
    fn literal_rendering_variants() {
        assert_eq!(Term::plain("a\"b\nc").to_string(), r#""a\"b\nc""#);
        let typed = Term::literal(
            "1",
            Some("http://www.w3.org/2001/XMLSchema#integer".to_string()),
            None,
        );
        assert_eq!(
            typed.to_string(),
            "\"1\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
        let tagged = Term::literal("chat", Some(RDF_LANG_STRING.to_string()), Some("fr".into()));
        assert_eq!(tagged.to_string(), "\"chat\"@fr");
    }

    #[test]
    fn xsd_string_is_normalized_away() {
        let lit = Term::literal("x", Some(XSD_STRING.to_string()), None);
        assert_eq!(lit, Term::plain("x"));
    }

    #[test]
    fn quad_line_places_graph_before_period() {
        let t = Triple::new(
            Term::iri("http://ex.org/s"),
            Term::iri("http://ex.org/p"),
            Term::blank("o"),
        )
        .in_graph(Term::iri("http://ex.org/g"));
        assert_eq!(
            t.to_string(),
            "<http://ex.org/s> <http://ex.org/p> _:o <http://ex.org/g> ."
        );
    }

    #[test]
    fn local_name_prefers_fragment() {
        let t = Term::iri("http://www.w3.org/2001/sw/DataAccess/tests/test-manifest#action");
        assert_eq!(t.local_name(), "action");
        assert_eq!(Term::iri("http://ex.org/a/b").local_name(), "b");
    }
}
