//! Graph equivalence checking.
//!
//! Two serialized graphs are compared in three tiers, cheapest first:
//!
//! 1. exact text equality,
//! 2. equality after renaming blank nodes to `b0`, `b1`, ... in order of
//!    first appearance within each text,
//! 3. an external comparison tool, invoked as
//!    `<tool> -d <expected> --compare <actual>`, which matches iff it prints
//!    nothing but `matched`.
//!
//! The first tier that reports equality wins. A tool that cannot be run is a
//! non-match carrying the failure as diagnostic text.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ComparisonError;

/// The tier that settled a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Texts were identical.
    Exact,
    /// Texts were identical after blank node canonicalization.
    Canonical,
    /// The external tool decided.
    Oracle,
}

/// Result of comparing two serialized graphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// The graphs are considered the same.
    pub equal: bool,
    /// The tier that produced the verdict; `None` when no tier could decide.
    pub tier: Option<Tier>,
    /// Raw tool output, or the reason the last tier could not run.
    pub diagnostic: Option<String>,
}

impl Comparison {
    fn matched(tier: Tier) -> Self {
        Self {
            equal: true,
            tier: Some(tier),
            diagnostic: None,
        }
    }
}

/// The tool's answer for one comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// The tool signalled a match.
    pub matched: bool,
    /// Everything the tool printed.
    pub output: String,
}

/// A last-resort semantic comparison.
pub trait Oracle: Send + Sync {
    /// Compares `actual` against `expected`.
    ///
    /// # Errors
    ///
    /// Returns a [`ComparisonError`] when the comparison could not be run;
    /// a negative answer is an `Ok` verdict.
    fn judge(&self, actual: &str, expected: &str) -> Result<Verdict, ComparisonError>;
}

/// Runs an external program on two temporary files.
#[derive(Debug, Clone)]
pub struct CommandOracle {
    program: PathBuf,
}

impl CommandOracle {
    /// Uses `program` (a path or a name looked up on `PATH`).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Oracle for CommandOracle {
    fn judge(&self, actual: &str, expected: &str) -> Result<Verdict, ComparisonError> {
        // Removed on drop, whatever the outcome.
        let dir = tempfile::tempdir().map_err(ComparisonError::Staging)?;
        let expected_path = stage(dir.path(), "expected.nq", expected)?;
        let actual_path = stage(dir.path(), "actual.nq", actual)?;

        let output = Command::new(&self.program)
            .arg("-d")
            .arg(&expected_path)
            .arg("--compare")
            .arg(&actual_path)
            .output()
            .map_err(|source| ComparisonError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let matched = stdout.trim() == "matched";
        let mut text = stdout.into_owned();
        if !stderr.trim().is_empty() {
            text.push_str(&stderr);
        }
        if !output.status.success() && !matched {
            text.push_str(&format!("\n(exit status: {})", output.status));
        }
        Ok(Verdict {
            matched,
            output: text,
        })
    }
}

fn stage(dir: &Path, name: &str, content: &str) -> Result<PathBuf, ComparisonError> {
    let path = dir.join(name);
    std::fs::write(&path, content).map_err(ComparisonError::Staging)?;
    Ok(path)
}

/// Compares serialized graphs with an optional last-resort oracle.
pub struct EquivalenceChecker {
    oracle: Option<Box<dyn Oracle>>,
}

impl EquivalenceChecker {
    /// Creates a checker; without an oracle, tier 3 always fails.
    #[must_use]
    pub fn new(oracle: Option<Box<dyn Oracle>>) -> Self {
        Self { oracle }
    }

    /// Compares `actual` against `expected`.
    #[must_use]
    pub fn compare(&self, actual: &str, expected: &str) -> Comparison {
        if actual == expected {
            tracing::debug!("graphs equal as text");
            return Comparison::matched(Tier::Exact);
        }
        if canonicalize_blank_nodes(actual) == canonicalize_blank_nodes(expected) {
            tracing::debug!("graphs equal after blank node canonicalization");
            return Comparison::matched(Tier::Canonical);
        }

        let Some(oracle) = &self.oracle else {
            return Comparison {
                equal: false,
                tier: None,
                diagnostic: Some(ComparisonError::Unavailable.to_string()),
            };
        };
        match oracle.judge(actual, expected) {
            Ok(verdict) => {
                tracing::debug!(matched = verdict.matched, "oracle verdict");
                Comparison {
                    equal: verdict.matched,
                    tier: Some(Tier::Oracle),
                    diagnostic: (!verdict.matched).then_some(verdict.output),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "comparison tool failed");
                Comparison {
                    equal: false,
                    tier: None,
                    diagnostic: Some(e.to_string()),
                }
            }
        }
    }
}

/// Renames every blank node label to `b0`, `b1`, ... in order of first
/// appearance. IRIs and quoted strings are copied untouched.
///
/// The rewrite is idempotent: canonical labels are already numbered in
/// first-appearance order.
#[must_use]
pub fn canonicalize_blank_nodes(text: &str) -> String {
    let mut labels: HashMap<&str, usize> = HashMap::new();
    let mut out = String::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < text.len() {
        match bytes[i] {
            b'<' => {
                let end = text[i..].find('>').map_or(text.len(), |p| i + p + 1);
                out.push_str(&text[i..end]);
                i = end;
            }
            b'"' => {
                let end = string_end(text, i);
                out.push_str(&text[i..end]);
                i = end;
            }
            b'_' if bytes.get(i + 1) == Some(&b':') => {
                let start = i + 2;
                let end = label_end(text, start);
                let label = &text[start..end];
                let next = labels.len();
                let index = *labels.entry(label).or_insert(next);
                out.push_str(&format!("_:b{}", index));
                i = end;
            }
            _ => {
                // Copy one whole character to stay on UTF-8 boundaries.
                let ch_len = text[i..].chars().next().map_or(1, char::len_utf8);
                out.push_str(&text[i..i + ch_len]);
                i += ch_len;
            }
        }
    }
    out
}

/// Index just past the closing quote of the string starting at `start`.
fn string_end(text: &str, start: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    text.len()
}

/// Index just past a blank node label starting at `start`. A label may
/// contain `.` but never ends with one.
fn label_end(text: &str, start: usize) -> usize {
    let mut end = start;
    for (offset, c) in text[start..].char_indices() {
        if c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '\u{B7}') {
            end = start + offset + c.len_utf8();
        } else {
            break;
        }
    }
    while end > start && text[..end].ends_with('.') {
        end -= 1;
    }
    end
}
