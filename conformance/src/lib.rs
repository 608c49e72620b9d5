//! Manifest-driven conformance runner for RDF parsers.
//!
//! A run reads a test manifest (an `mf:Manifest` whose `mf:entries` list
//! names the cases), fetches each case's fixtures through a disk cache, feeds
//! the action fixture to the parser, and checks the outcome:
//!
//! | Case kind | Passes when |
//! |-----------|-------------|
//! | negative | the parser reports an error |
//! | positive, no expected result | the parser reports no error |
//! | positive, expected result | output is equivalent to the expected graph |
//!
//! Equivalence is decided by exact text, then by blank-node canonicalization,
//! then by an optional external comparison tool. Results are written as an
//! EARL report.
//!
//! # Entry Point
//!
//! ```no_run
//! use rdft_conformance::{Harness, HarnessConfig};
//!
//! let config = HarnessConfig {
//!     manifest: Some("https://w3c.github.io/rdf-tests/rdf/rdf11/rdf-turtle/manifest.ttl".into()),
//!     ..HarnessConfig::default()
//! };
//! let harness = Harness::new(config).expect("Invalid configuration");
//! let report = harness.run(|_| {}).expect("Failed to run conformance");
//! println!("{}", report.summary());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod earl;
pub mod equivalence;
pub mod error;
pub mod executor;
pub mod fixtures;
pub mod manifest;
pub mod report;
pub mod runner;

pub use config::{HarnessConfig, ReportConfig, DEFAULT_WORKERS};
pub use equivalence::{CommandOracle, Comparison, EquivalenceChecker, Oracle, Tier, Verdict};
pub use error::{ComparisonError, FetchError, ManifestError};
pub use executor::{Execution, Executor};
pub use fixtures::{Fetch, FixtureCache, HttpFetcher, StaticFetcher};
pub use manifest::{parse_manifest, Manifest, ManifestPolicy, TestCase};
pub use report::{ConformanceReport, Outcome, TestResult};
pub use runner::Harness;
