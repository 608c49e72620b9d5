//! Error taxonomy for the harness.
//!
//! Only [`ManifestError`] and a [`FetchError`] on the manifest itself stop a
//! run. Everything else is captured on the case and reported.

use std::path::PathBuf;

use rdft_graph::{ParseError, Term};

/// A fixture could not be retrieved from disk or from the network.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The remote request failed or returned an error status.
    #[error("failed to fetch {url}: {message}")]
    Http {
        /// Resolved location.
        url: String,
        /// Transport or status message.
        message: String,
    },
    /// Reading or persisting a local copy failed.
    #[error("fixture I/O on {}: {source}", path.display())]
    Io {
        /// Local path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The name cannot be resolved or mapped to a safe local path.
    #[error("invalid fixture name '{name}': {reason}")]
    InvalidName {
        /// Name as given.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// The manifest is malformed or its entry list is broken.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The manifest document itself failed to parse.
    #[error("manifest does not parse: {0}")]
    Parse(#[from] ParseError),
    /// No `mf:entries` triple was found.
    #[error("manifest has no mf:entries list")]
    MissingEntries,
    /// A list cell has no `rdf:first`.
    #[error("list cell {cell} has no rdf:first")]
    MissingFirst {
        /// The offending cell.
        cell: Term,
    },
    /// A list cell has no `rdf:rest`.
    #[error("list cell {cell} has no rdf:rest")]
    MissingRest {
        /// The offending cell.
        cell: Term,
    },
    /// The list loops back on a cell already visited.
    #[error("entry list revisits cell {cell}; refusing to loop")]
    CyclicList {
        /// The first repeated cell.
        cell: Term,
    },
    /// Two entries share an identifier.
    #[error("test {id} is listed more than once")]
    DuplicateTest {
        /// The duplicated identifier.
        id: Term,
    },
}

/// The comparison tool could not be run at all.
#[derive(Debug, thiserror::Error)]
pub enum ComparisonError {
    /// No tool is configured.
    #[error("no comparison tool configured")]
    Unavailable,
    /// Spawning the tool failed (missing binary, permissions).
    #[error("could not run comparison tool '{program}': {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Staging the compared files failed.
    #[error("could not stage files for comparison: {0}")]
    Staging(#[source] std::io::Error),
}
