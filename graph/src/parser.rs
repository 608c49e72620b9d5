//! Streaming adapter over the sophia Turtle-family parsers.
//!
//! [`parse_document`] feeds a document through the parser for the requested
//! [`Syntax`] and hands every produced statement to a callback, converted
//! into the owned [`Triple`] model. Statements delivered before a syntax
//! error stay delivered: callers see partial output plus the error.

use sophia_api::parser::{QuadParser, TripleParser};
use sophia_api::quad::Quad as _;
use sophia_api::source::{QuadSource, StreamError, TripleSource};
use sophia_api::term::{Term as SophiaTerm, TermKind};
use sophia_api::triple::Triple as _;
use sophia_iri::Iri;
use sophia_turtle::parser::nq::NQuadsParser;
use sophia_turtle::parser::nt::NTriplesParser;
use sophia_turtle::parser::trig::TriGParser;
use sophia_turtle::parser::turtle::TurtleParser;

use crate::model::{Term, Triple};
use crate::syntax::Syntax;

/// A failure reported by the parser, or a statement the model cannot hold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{syntax} parse error: {message}")]
pub struct ParseError {
    /// Syntax the document was parsed as.
    pub syntax: Syntax,
    /// Parser message, including position information when available.
    pub message: String,
}

impl ParseError {
    fn new(syntax: Syntax, message: impl Into<String>) -> Self {
        Self {
            syntax,
            message: message.into(),
        }
    }
}

/// Parses `text` as `syntax`, calling `on_triple` for every statement.
///
/// `base` is the document IRI used to resolve relative references; it is
/// ignored by the line-based syntaxes, which only accept absolute IRIs.
///
/// # Errors
///
/// Returns the first syntax error, or an error if `base` is not a valid
/// absolute IRI.
pub fn parse_document<F>(
    text: &str,
    syntax: Syntax,
    base: Option<&str>,
    mut on_triple: F,
) -> Result<(), ParseError>
where
    F: FnMut(Triple),
{
    let base = base
        .map(|b| {
            Iri::new(b.to_string())
                .map_err(|_| ParseError::new(syntax, format!("invalid base IRI <{}>", b)))
        })
        .transpose()?;

    match syntax {
        Syntax::Turtle => {
            let parser = TurtleParser { base };
            let source = TripleParser::<&[u8]>::parse(&parser, text.as_bytes());
            drain_triples(source, syntax, &mut on_triple)
        }
        Syntax::NTriples => {
            let parser = NTriplesParser {};
            let source = TripleParser::<&[u8]>::parse(&parser, text.as_bytes());
            drain_triples(source, syntax, &mut on_triple)
        }
        Syntax::TriG => {
            let parser = TriGParser { base };
            let source = QuadParser::<&[u8]>::parse(&parser, text.as_bytes());
            drain_quads(source, syntax, &mut on_triple)
        }
        Syntax::NQuads => {
            let parser = NQuadsParser {};
            let source = QuadParser::<&[u8]>::parse(&parser, text.as_bytes());
            drain_quads(source, syntax, &mut on_triple)
        }
    }
}

/// Parses a whole document into a vector, stopping at the first error.
///
/// # Errors
///
/// Same as [`parse_document`].
pub fn parse_to_vec(
    text: &str,
    syntax: Syntax,
    base: Option<&str>,
) -> Result<Vec<Triple>, ParseError> {
    let mut triples = Vec::new();
    parse_document(text, syntax, base, |t| triples.push(t))?;
    Ok(triples)
}

fn drain_triples<S>(
    mut source: S,
    syntax: Syntax,
    on_triple: &mut dyn FnMut(Triple),
) -> Result<(), ParseError>
where
    S: TripleSource,
{
    let result = source.try_for_each_triple(|t| -> Result<(), ParseError> {
        let triple = Triple::new(
            convert(t.s(), syntax)?,
            convert(t.p(), syntax)?,
            convert(t.o(), syntax)?,
        );
        on_triple(triple);
        Ok(())
    });
    finish(result, syntax)
}

fn drain_quads<S>(
    mut source: S,
    syntax: Syntax,
    on_triple: &mut dyn FnMut(Triple),
) -> Result<(), ParseError>
where
    S: QuadSource,
{
    let result = source.try_for_each_quad(|q| -> Result<(), ParseError> {
        let mut triple = Triple::new(
            convert(q.s(), syntax)?,
            convert(q.p(), syntax)?,
            convert(q.o(), syntax)?,
        );
        if let Some(g) = q.g() {
            triple.graph = Some(convert(g, syntax)?);
        }
        on_triple(triple);
        Ok(())
    });
    finish(result, syntax)
}

fn finish<E>(
    result: Result<(), StreamError<E, ParseError>>,
    syntax: Syntax,
) -> Result<(), ParseError>
where
    E: std::error::Error,
{
    match result {
        Ok(()) => Ok(()),
        Err(StreamError::SourceError(e)) => Err(ParseError::new(syntax, e.to_string())),
        Err(StreamError::SinkError(e)) => Err(e),
    }
}

fn convert<T: SophiaTerm>(term: T, syntax: Syntax) -> Result<Term, ParseError> {
    let converted = match term.kind() {
        TermKind::Iri => term.iri().map(|iri| Term::iri(iri.as_str())),
        TermKind::BlankNode => term.bnode_id().map(|id| Term::blank(id.as_str())),
        TermKind::Literal => term.lexical_form().map(|lex| {
            Term::literal(
                String::from(&*lex),
                term.datatype().map(|dt| dt.as_str().to_string()),
                term.language_tag().map(|tag| tag.as_str().to_string()),
            )
        }),
        _ => None,
    };
    converted.ok_or_else(|| {
        ParseError::new(syntax, "unsupported term kind (quoted triple or variable)")
    })
}
