//! RDF graph model for the rdft conformance harness.
//!
//! The `rdft-graph` crate provides the owned term and triple model, an
//! append-only [`TripleStore`] with subject/predicate/object indexes, the
//! sophia-backed parser adapter that plays the parser under test, and the
//! N-Quads and Turtle serializers used for captured output and reports.
//!
//! # Entry Point
//!
//! ```
//! use rdft_graph::{parse_document, Syntax, TripleStore};
//!
//! let mut store = TripleStore::new();
//! parse_document(
//!     "<http://ex.org/s> <http://ex.org/p> <http://ex.org/o> .",
//!     Syntax::NTriples,
//!     None,
//!     |t| store.insert(t),
//! )
//! .expect("valid N-Triples");
//! assert_eq!(store.len(), 1);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod model;
pub mod parser;
pub mod serializer;
pub mod store;
pub mod syntax;
pub mod vocab;

pub use model::{Term, Triple};
pub use parser::{parse_document, parse_to_vec, ParseError};
pub use store::{Pattern, TripleStore};
pub use syntax::{Syntax, UnknownSyntax};
