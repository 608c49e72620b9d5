//! Single-case execution.
//!
//! The action fixture is fed through the parser under test with the case's
//! syntax and its action location as base IRI. Every emitted statement is
//! captured as one N-Quads line; the captured text is written to the results
//! directory even when the parser fails part-way. Each case gets its own
//! file, named after the local part of its id plus a hash of the full id.

use std::path::{Path, PathBuf};

use rdft_graph::serializer::nquads;
use rdft_graph::{parse_document, Syntax};
use xxhash_rust::xxh3::xxh3_64;

use crate::manifest::TestCase;

/// Outcome of running the parser on one action fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Execution {
    /// Captured statements, one N-Quads line each.
    pub captured: String,
    /// File holding the captured output; `None` if it could not be written.
    pub output: Option<PathBuf>,
    /// Parser error, if the parser failed.
    pub error: Option<String>,
    /// Number of statements captured before completion or failure.
    pub statements: usize,
}

/// Runs action fixtures through the parser and captures the output.
#[derive(Debug, Clone)]
pub struct Executor {
    results_dir: PathBuf,
    fallback: Syntax,
}

impl Executor {
    /// Creates an executor writing into `results_dir`.
    pub fn new(results_dir: impl Into<PathBuf>, fallback: Syntax) -> Self {
        Self {
            results_dir: results_dir.into(),
            fallback,
        }
    }

    /// Syntax for `case`: from its type, else its action's extension, else
    /// the configured fallback.
    #[must_use]
    pub fn syntax_for(&self, case: &TestCase) -> Syntax {
        case.declared_syntax()
            .or_else(|| Syntax::from_file_name(&case.action))
            .unwrap_or(self.fallback)
    }

    /// Where the captured output of `case` is written. Distinct ids never
    /// share a path, even when their local names collide.
    #[must_use]
    pub fn output_path(&self, case: &TestCase) -> PathBuf {
        let stem = file_stem(case.id.local_name(), case.label());
        let digest = xxh3_64(case.id.to_string().as_bytes()) as u32;
        self.results_dir.join(format!("{stem}-{digest:08x}.nq"))
    }

    /// Parses `action` for `case`. Never fails: parser errors are returned
    /// in [`Execution::error`] alongside whatever was captured.
    #[must_use]
    pub fn execute(&self, case: &TestCase, action: &str) -> Execution {
        let syntax = self.syntax_for(case);
        let mut captured = String::new();
        let mut statements = 0usize;

        let error = parse_document(action, syntax, case.action_location.as_deref(), |t| {
            nquads::push_line(&mut captured, &t);
            statements += 1;
        })
        .err()
        .map(|e| e.to_string());

        if let Some(e) = &error {
            tracing::debug!(case = case.label(), error = %e, statements, "parser error");
        }

        let path = self.output_path(case);
        let output = match write_output(&path, &captured) {
            Ok(()) => Some(path),
            Err(e) => {
                tracing::warn!(
                    case = case.label(),
                    path = %path.display(),
                    error = %e,
                    "could not write captured output"
                );
                None
            }
        };

        Execution {
            captured,
            output,
            error,
            statements,
        }
    }
}

fn write_output(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}

/// A file-name-safe stem; falls back to `label` when `id` is empty.
fn file_stem(id: &str, label: &str) -> String {
    let source = if id.is_empty() { label } else { id };
    let stem: String = source
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "unnamed".to_string()
    } else {
        stem
    }
}
