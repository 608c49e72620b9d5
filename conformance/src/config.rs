//! Harness configuration.
//!
//! A [`HarnessConfig`] is read from an optional TOML file; every field has a
//! default, so an empty file (or none at all) is valid as long as a manifest
//! location is supplied some other way. The CLI overrides fields after
//! loading. [`ReportConfig`] is the static EARL metadata block handed to the
//! report generator.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rdft_graph::Syntax;
use regex::Regex;
use serde::Deserialize;
use url::Url;

/// Default number of concurrently executing cases.
pub const DEFAULT_WORKERS: usize = 4;

/// Runner configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Manifest location (absolute URL, `file:` URLs included).
    pub manifest: Option<String>,
    /// Local fixture cache directory.
    pub suite_dir: PathBuf,
    /// Directory for captured per-case output.
    pub results_dir: PathBuf,
    /// EARL report output path.
    pub report: PathBuf,
    /// Maximum number of cases executing at once.
    pub workers: usize,
    /// Move negative cases to the skipped list.
    pub skip_negative: bool,
    /// Pattern tested against a case's type IRI to flag it negative.
    pub negative_pattern: String,
    /// Syntax used when neither the test type nor the file name names one.
    pub syntax: String,
    /// External graph comparison tool; `None` disables the last tier.
    pub oracle: Option<PathBuf>,
    /// Only cases whose id or name matches this pattern are run.
    pub filter: Option<String>,
    /// Static report metadata.
    pub report_meta: ReportConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            manifest: None,
            suite_dir: PathBuf::from(".rdf-test-suite"),
            results_dir: PathBuf::from(".rdf-test-results"),
            report: PathBuf::from("earl.ttl"),
            workers: DEFAULT_WORKERS,
            skip_negative: false,
            negative_pattern: "Negative".to_string(),
            syntax: Syntax::Turtle.as_str().to_string(),
            oracle: None,
            filter: None,
            report_meta: ReportConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Loads a configuration file, or returns defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this schema.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML or unknown fields.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Returns the manifest location as a URL.
    ///
    /// Plain filesystem paths are accepted and converted to `file:` URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if no manifest is configured or it cannot be turned
    /// into an absolute URL.
    pub fn manifest_url(&self) -> Result<Url> {
        let Some(location) = self.manifest.as_deref() else {
            bail!("no manifest location given");
        };
        if let Ok(url) = Url::parse(location) {
            return Ok(url);
        }
        let path = std::path::absolute(location)
            .with_context(|| format!("Cannot resolve manifest path {}", location))?;
        Url::from_file_path(&path)
            .map_err(|()| anyhow::anyhow!("manifest path {} is not absolute", path.display()))
    }

    /// Returns the fallback syntax.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured name is not a known syntax.
    pub fn fallback_syntax(&self) -> Result<Syntax> {
        Ok(self.syntax.parse::<Syntax>()?)
    }

    /// Compiles the negative-test pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid regex.
    pub fn negative_regex(&self) -> Result<Regex> {
        Regex::new(&self.negative_pattern)
            .with_context(|| format!("Invalid negative_pattern '{}'", self.negative_pattern))
    }

    /// Compiles the case filter, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid regex.
    pub fn filter_regex(&self) -> Result<Option<Regex>> {
        self.filter
            .as_deref()
            .map(|f| Regex::new(f).with_context(|| format!("Invalid filter '{}'", f)))
            .transpose()
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker count is zero or any pattern,
    /// syntax name, or manifest location is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            bail!("workers must be at least 1");
        }
        self.manifest_url()?;
        self.fallback_syntax()?;
        self.negative_regex()?;
        self.filter_regex()?;
        Ok(())
    }
}

/// Static metadata written into every report.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// IRI of the software under test.
    pub subject_iri: String,
    /// Name of the software under test.
    pub subject_name: String,
    /// One-line description of the software under test.
    pub subject_description: String,
    /// Homepage of the software under test.
    pub subject_homepage: Option<String>,
    /// Implementation language.
    pub subject_language: String,
    /// Released version under test.
    pub subject_version: Option<String>,
    /// License IRI of the software under test.
    pub license: Option<String>,
    /// IRI of the person or organization asserting the results.
    pub maintainer_iri: String,
    /// Name of the asserting maintainer.
    pub maintainer_name: String,
    /// Homepage of the asserting maintainer.
    pub maintainer_homepage: Option<String>,
    /// IRI identifying this harness.
    pub tool_iri: String,
    /// Name of this harness.
    pub tool_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            subject_iri: "https://github.com/pchampin/sophia_rs".to_string(),
            subject_name: "sophia_turtle".to_string(),
            subject_description: "Turtle-family parsers of the sophia RDF toolkit".to_string(),
            subject_homepage: Some("https://github.com/pchampin/sophia_rs".to_string()),
            subject_language: "Rust".to_string(),
            subject_version: None,
            license: Some(
                "http://www.cecill.info/licences/Licence_CeCILL-B_V1-en.html".to_string(),
            ),
            maintainer_iri: "urn:rdft:maintainer".to_string(),
            maintainer_name: "rdft maintainers".to_string(),
            maintainer_homepage: None,
            tool_iri: "urn:rdft:conformance".to_string(),
            tool_name: format!("rdft-conformance {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_once_manifest_is_set() {
        let mut config = HarnessConfig::default();
        assert!(config.validate().is_err());
        config.manifest =
            Some("https://w3c.github.io/rdf-tests/rdf/rdf11/rdf-turtle/manifest.ttl".into());
        config.validate().unwrap();
        assert_eq!(config.workers, DEFAULT_WORKERS);
        assert_eq!(config.fallback_syntax().unwrap(), Syntax::Turtle);
    }

    #[test]
    fn toml_overrides_and_nested_meta() {
        let config = HarnessConfig::from_toml_str(
            r#"
            manifest = "https://example.org/suite/manifest.ttl"
            workers = 1
            skip_negative = true
            syntax = "nquads"

            [report_meta]
            subject_name = "my-parser"
            "#,
        )
        .unwrap();
        assert_eq!(config.workers, 1);
        assert!(config.skip_negative);
        assert_eq!(config.fallback_syntax().unwrap(), Syntax::NQuads);
        assert_eq!(config.report_meta.subject_name, "my-parser");
        assert_eq!(config.report_meta.subject_language, "Rust");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(HarnessConfig::from_toml_str("wrokers = 2").is_err());
    }

    #[test]
    fn zero_workers_is_invalid() {
        let config = HarnessConfig {
            manifest: Some("https://example.org/m.ttl".into()),
            workers: 0,
            ..HarnessConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_patterns_are_reported() {
        let config = HarnessConfig {
            manifest: Some("https://example.org/m.ttl".into()),
            filter: Some("(".into()),
            ..HarnessConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
