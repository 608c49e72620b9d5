//! Test orchestration.
//!
//! A [`Harness`] fetches and parses the manifest, runs every case on a
//! fixed-size worker pool, verifies each outcome, and writes the EARL
//! report. Results are collected by manifest position, so reporting order
//! is independent of completion order.

use anyhow::{Context, Result};
use rayon::prelude::*;
use regex::Regex;
use url::Url;

use crate::config::HarnessConfig;
use crate::earl;
use crate::equivalence::{CommandOracle, Comparison, EquivalenceChecker, Oracle};
use crate::executor::{Execution, Executor};
use crate::fixtures::{Fetch, FixtureCache, HttpFetcher};
use crate::manifest::{parse_manifest, Manifest, ManifestPolicy, TestCase};
use crate::report::{ConformanceReport, TestResult};

/// A configured conformance run.
pub struct Harness {
    config: HarnessConfig,
    manifest_url: Url,
    cache: FixtureCache,
    executor: Executor,
    checker: EquivalenceChecker,
    policy: ManifestPolicy,
    filter: Option<Regex>,
}

impl Harness {
    /// Builds a harness that fetches over HTTP and uses the configured
    /// comparison tool, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn new(config: HarnessConfig) -> Result<Self> {
        let oracle = config
            .oracle
            .clone()
            .map(|program| Box::new(CommandOracle::new(program)) as Box<dyn Oracle>);
        Self::with_parts(config, Box::new(HttpFetcher::new()), oracle)
    }

    /// Builds a harness from explicit collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn with_parts(
        config: HarnessConfig,
        fetcher: Box<dyn Fetch>,
        oracle: Option<Box<dyn Oracle>>,
    ) -> Result<Self> {
        config.validate()?;
        let manifest_url = config.manifest_url()?;
        let policy = ManifestPolicy {
            negative: config.negative_regex()?,
            skip_negative: config.skip_negative,
        };
        let filter = config.filter_regex()?;
        let cache = FixtureCache::new(manifest_url.clone(), config.suite_dir.clone(), fetcher);
        let executor = Executor::new(config.results_dir.clone(), config.fallback_syntax()?);
        Ok(Self {
            config,
            manifest_url,
            cache,
            executor,
            checker: EquivalenceChecker::new(oracle),
            policy,
            filter,
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Fetches and parses the manifest, applying the case filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be fetched or parsed.
    pub fn load_manifest(&self) -> Result<Manifest> {
        let location = self.manifest_url.as_str();
        let name = self.cache.name_for(location);
        let text = self
            .cache
            .fetch(&name)
            .with_context(|| format!("Failed to fetch manifest {}", location))?;
        let mut manifest = parse_manifest(&text, location, &self.policy, |l| {
            self.cache.name_for(l)
        })
        .with_context(|| format!("Failed to read manifest {}", location))?;

        if let Some(filter) = &self.filter {
            let keep = |case: &TestCase| {
                filter.is_match(case.id.value())
                    || case.name.as_deref().is_some_and(|n| filter.is_match(n))
            };
            manifest.tests.retain(keep);
            manifest.skipped.retain(keep);
        }
        Ok(manifest)
    }

    /// Runs every case of the manifest and writes the report.
    ///
    /// `on_result` is called from worker threads as each case completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be loaded, the worker pool
    /// cannot be started, or the report cannot be written. Case-level
    /// failures are recorded in the returned report instead.
    pub fn run<F>(&self, on_result: F) -> Result<ConformanceReport>
    where
        F: Fn(&TestResult) + Sync,
    {
        let manifest = self.load_manifest()?;
        tracing::info!(
            tests = manifest.tests.len(),
            skipped = manifest.skipped.len(),
            workers = self.config.workers,
            "running manifest {}",
            self.manifest_url
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .thread_name(|i| format!("rdft-worker-{i}"))
            .build()
            .context("Failed to start worker pool")?;

        let run_all = |cases: &[TestCase]| -> Vec<TestResult> {
            cases
                .par_iter()
                .map(|case| {
                    let result = self.run_case(case);
                    on_result(&result);
                    result
                })
                .collect()
        };
        let (results, skipped) =
            pool.install(|| (run_all(&manifest.tests), run_all(&manifest.skipped)));

        let report = ConformanceReport { results, skipped };
        tracing::info!(summary = %report.summary(), "run complete");

        earl::write(&self.config.report, &self.config.report_meta, &report.results)?;
        Ok(report)
    }

    /// Fetches, executes and verifies a single case.
    #[must_use]
    pub fn run_case(&self, case: &TestCase) -> TestResult {
        let compares = !case.negative && !case.skipped;
        let (action, expected) = rayon::join(
            || self.cache.fetch(&case.action),
            || match &case.result {
                Some(name) if compares => self.cache.fetch(name).map(Some),
                _ => Ok(None),
            },
        );
        let fetched = action.and_then(|a| expected.map(|e| (a, e)));
        let (action, expected) = match fetched {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(case = case.label(), error = %e, "fixture fetch failed");
                return TestResult::new(case.clone(), Some(e.to_string()), false);
            }
        };

        let execution = self.executor.execute(case, &action);
        verify(case, execution, expected, &self.checker)
    }
}

/// Applies the success rules to one execution.
///
/// - negative or skipped: success iff an error occurred; content is never
///   compared
/// - positive without expected result: success iff no error occurred
/// - positive with expected result: success iff the captured output is
///   equivalent to it; a case whose output file was not produced fails
pub fn verify(
    case: &TestCase,
    execution: Execution,
    expected: Option<String>,
    checker: &EquivalenceChecker,
) -> TestResult {
    let actual = execution.output.is_some().then_some(execution.captured);

    let mut result = TestResult::new(case.clone(), execution.error, false);
    if case.negative || case.skipped {
        result.success = result.error.is_some();
    } else if let Some(expected) = expected {
        let comparison = match &actual {
            Some(actual) => checker.compare(actual, &expected),
            None => Comparison {
                equal: false,
                tier: None,
                diagnostic: Some("no captured output".to_string()),
            },
        };
        result.success = comparison.equal;
        result.comparison = Some(comparison);
        result.expected = Some(expected);
    } else {
        result.success = result.error.is_none();
    }
    result.actual = actual;
    result
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rdft_graph::Term;

    use super::*;

    fn case(negative: bool, skipped: bool, result: Option<&str>) -> TestCase {
        TestCase {
            id: Term::iri("http://example.org/suite/manifest#t"),
            name: Some("t".into()),
            comment: None,
            test_type: None,
            action: "t.ttl".into(),
            action_location: None,
            result: result.map(str::to_string),
            result_location: None,
            negative,
            skipped,
            properties: BTreeMap::new(),
        }
    }

    fn execution(
        dir: &std::path::Path,
        output: Option<&str>,
        error: Option<&str>,
    ) -> Execution {
        let path = output.map(|text| {
            let path = dir.join("t.nq");
            std::fs::write(&path, text).unwrap();
            path
        });
        Execution {
            captured: output.unwrap_or_default().to_string(),
            output: path,
            error: error.map(str::to_string),
            statements: 0,
        }
    }

    #[test]
    fn negative_case_passes_only_on_error_and_never_compares() {
        let dir = tempfile::tempdir().unwrap();
        let checker = EquivalenceChecker::new(None);
        let c = case(true, false, Some("t.nt"));

        let run = execution(dir.path(), Some(""), Some("bad"));
        let r = verify(&c, run, Some("X".into()), &checker);
        assert!(r.success);
        assert!(r.comparison.is_none());

        let r = verify(&c, execution(dir.path(), Some(""), None), Some("".into()), &checker);
        assert!(!r.success);
        assert!(r.comparison.is_none());
    }

    #[test]
    fn skipped_case_reports_error_status_only() {
        let dir = tempfile::tempdir().unwrap();
        let checker = EquivalenceChecker::new(None);
        let c = case(false, true, Some("t.nt"));
        let run = execution(dir.path(), Some("same"), None);
        let r = verify(&c, run, Some("same".into()), &checker);
        assert!(!r.success);
        assert!(r.comparison.is_none());
        assert!(!r.is_failure());
    }

    #[test]
    fn positive_without_result_passes_iff_no_error() {
        let dir = tempfile::tempdir().unwrap();
        let checker = EquivalenceChecker::new(None);
        let c = case(false, false, None);
        assert!(verify(&c, execution(dir.path(), Some(""), None), None, &checker).success);
        assert!(!verify(&c, execution(dir.path(), Some(""), Some("e")), None, &checker).success);
    }

    #[test]
    fn positive_with_result_uses_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let checker = EquivalenceChecker::new(None);
        let c = case(false, false, Some("t.nt"));
        let doc = "<http://a> <http://b> <http://c> .\n";

        let r = verify(&c, execution(dir.path(), Some(doc), None), Some(doc.into()), &checker);
        assert!(r.success);
        assert_eq!(r.actual.as_deref(), Some(doc));
        assert_eq!(r.comparison.unwrap().tier, Some(crate::equivalence::Tier::Exact));

        let run = execution(dir.path(), Some(doc), None);
        let r = verify(&c, run, Some(String::new()), &checker);
        assert!(!r.success);
    }

    #[test]
    fn missing_output_file_fails_outright() {
        let dir = tempfile::tempdir().unwrap();
        let checker = EquivalenceChecker::new(None);
        let c = case(false, false, Some("t.nt"));
        let r = verify(&c, execution(dir.path(), None, None), Some(String::new()), &checker);
        assert!(!r.success);
        assert_eq!(
            r.comparison.unwrap().diagnostic.as_deref(),
            Some("no captured output")
        );
    }

    #[test]
    fn comparison_uses_the_captured_text_not_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let checker = EquivalenceChecker::new(None);
        let c = case(false, false, Some("t.nt"));
        let doc = "<http://a> <http://b> <http://c> .\n";
        let run = execution(dir.path(), Some(doc), None);
        // Another case overwriting the file must not change this verdict.
        std::fs::write(run.output.as_ref().unwrap(), "").unwrap();
        let r = verify(&c, run, Some(doc.into()), &checker);
        assert!(r.success);
    }
}
