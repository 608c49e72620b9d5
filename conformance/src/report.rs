//! Run results: per-case outcomes and the aggregated report.

use crate::equivalence::Comparison;
use crate::manifest::TestCase;

/// Outcome recorded for a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The case passed.
    Passed,
    /// The case failed.
    Failed,
}

impl Outcome {
    /// The `earl:` outcome individual's local name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
        }
    }
}

/// A case after execution and verification.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// The case as declared.
    pub case: TestCase,
    /// Fetch or parser error captured while running the case.
    pub error: Option<String>,
    /// Verdict under the case's success rule.
    pub success: bool,
    /// Graph comparison, for positive cases with an expected result.
    pub comparison: Option<Comparison>,
    /// Captured parser output.
    pub actual: Option<String>,
    /// Expected result fixture content.
    pub expected: Option<String>,
}

impl TestResult {
    /// Creates a result without comparison details.
    pub fn new(case: TestCase, error: Option<String>, success: bool) -> Self {
        Self {
            case,
            error,
            success,
            comparison: None,
            actual: None,
            expected: None,
        }
    }

    /// The EARL outcome.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        if self.success {
            Outcome::Passed
        } else {
            Outcome::Failed
        }
    }

    /// Returns true if this case counts against the run.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !self.success && !self.case.skipped
    }
}

/// All results of a run, in manifest order.
#[derive(Debug, Default)]
pub struct ConformanceReport {
    /// Scored cases.
    pub results: Vec<TestResult>,
    /// Cases run for display only.
    pub skipped: Vec<TestResult>,
}

impl ConformanceReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scored cases that succeeded.
    #[must_use]
    pub fn score(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Number of scored cases.
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Returns the count of failed scored cases.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    /// Returns true if every scored case succeeded.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }

    /// The summary line: `score / total (N skipped)`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} / {} ({} skipped)",
            self.score(),
            self.total(),
            self.skipped.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rdft_graph::Term;

    use super::*;

    fn case(id: &str, skipped: bool) -> TestCase {
        TestCase {
            id: Term::iri(id),
            name: None,
            comment: None,
            test_type: None,
            action: String::new(),
            action_location: None,
            result: None,
            result_location: None,
            negative: skipped,
            skipped,
            properties: BTreeMap::new(),
        }
    }

    #[test]
    fn skipped_cases_never_affect_the_score() {
        let report = ConformanceReport {
            results: vec![
                TestResult::new(case("a", false), None, true),
                TestResult::new(case("b", false), Some("boom".into()), false),
            ],
            skipped: vec![TestResult::new(case("c", true), None, false)],
        };
        assert_eq!(report.score(), 1);
        assert_eq!(report.total(), 2);
        assert_eq!(report.failure_count(), 1);
        assert!(!report.all_passed());
        assert_eq!(report.summary(), "1 / 2 (1 skipped)");
    }

    #[test]
    fn empty_report_passes() {
        assert!(ConformanceReport::new().all_passed());
        assert_eq!(Outcome::Failed.as_str(), "failed");
    }
}
