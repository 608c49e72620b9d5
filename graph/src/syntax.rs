//! Concrete syntaxes accepted by the parser adapter.

use std::fmt;
use std::str::FromStr;

/// An RDF concrete syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syntax {
    /// Turtle 1.1.
    Turtle,
    /// N-Triples 1.1.
    NTriples,
    /// TriG 1.1.
    TriG,
    /// N-Quads 1.1.
    NQuads,
}

impl Syntax {
    /// Returns the lowercase name used in configuration files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Syntax::Turtle => "turtle",
            Syntax::NTriples => "ntriples",
            Syntax::TriG => "trig",
            Syntax::NQuads => "nquads",
        }
    }

    /// Infers the syntax from an `rdft:` test type such as
    /// `rdft:TestTurtleNegativeSyntax` or `rdft:TestNQuadsPositiveSyntax`.
    ///
    /// Accepts either a full IRI or a bare local name.
    #[must_use]
    pub fn from_test_type(test_type: &str) -> Option<Self> {
        let local = test_type
            .rsplit(|c| c == '#' || c == '/')
            .next()
            .unwrap_or(test_type);
        let rest = local.strip_prefix("Test")?;
        if rest.starts_with("NTriples") {
            Some(Syntax::NTriples)
        } else if rest.starts_with("NQuads") {
            Some(Syntax::NQuads)
        } else if rest.starts_with("Trig") || rest.starts_with("TriG") {
            Some(Syntax::TriG)
        } else if rest.starts_with("Turtle") {
            Some(Syntax::Turtle)
        } else {
            None
        }
    }

    /// Infers the syntax from a file name extension.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = name.rsplit_once('.')?.1;
        match ext.to_ascii_lowercase().as_str() {
            "ttl" => Some(Syntax::Turtle),
            "nt" => Some(Syntax::NTriples),
            "trig" => Some(Syntax::TriG),
            "nq" => Some(Syntax::NQuads),
            _ => None,
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a syntax name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown syntax '{0}' (expected turtle, ntriples, trig or nquads)")]
pub struct UnknownSyntax(pub String);

impl FromStr for Syntax {
    type Err = UnknownSyntax;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "turtle" | "ttl" => Ok(Syntax::Turtle),
            "ntriples" | "n-triples" | "nt" => Ok(Syntax::NTriples),
            "trig" => Ok(Syntax::TriG),
            "nquads" | "n-quads" | "nq" => Ok(Syntax::NQuads),
            _ => Err(UnknownSyntax(s.to_string())),
        }
    }
}
