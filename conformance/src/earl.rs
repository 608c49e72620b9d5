//! EARL report generation.
//!
//! The report is a Turtle document in the Evaluation and Report Language
//! vocabulary: a fixed block describing the software under test, its
//! maintainer and this harness, then one `earl:TestCase` resource and one
//! `earl:Assertion` per case. Every assertion carries the same timestamp,
//! captured once when generation starts.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rdft_graph::serializer::turtle::{
    anonymous_node, iri, prefix_header, subject_block, turtle_string, typed_literal,
};
use rdft_graph::vocab::{DC, DOAP, EARL, FOAF, MF, XSD};

use crate::config::ReportConfig;
use crate::report::TestResult;

/// Renders the report, stamping it with the current time.
#[must_use]
pub fn generate(config: &ReportConfig, results: &[TestResult]) -> String {
    generate_at(config, results, Utc::now())
}

/// Renders the report with an explicit report instant.
#[must_use]
pub fn generate_at(config: &ReportConfig, results: &[TestResult], issued: DateTime<Utc>) -> String {
    let stamp = typed_literal(
        &issued.to_rfc3339_opts(SecondsFormat::Secs, true),
        "xsd:dateTime",
    );
    let subject = iri(&config.subject_iri);
    let maintainer = iri(&config.maintainer_iri);

    let mut out = prefix_header(&[
        ("dc", DC),
        ("doap", DOAP),
        ("earl", EARL),
        ("foaf", FOAF),
        ("mf", MF),
        ("xsd", XSD),
    ]);

    out.push_str(&subject_block(
        "<>",
        &[
            ("foaf:primaryTopic", subject.clone()),
            ("dc:issued", stamp.clone()),
            ("foaf:maker", maintainer.clone()),
        ],
    ));

    let mut project = vec![
        ("a", "doap:Project , earl:TestSubject , earl:Software".to_string()),
        ("doap:name", turtle_string(&config.subject_name)),
        ("doap:description", turtle_string(&config.subject_description)),
        ("doap:programming-language", turtle_string(&config.subject_language)),
        ("doap:developer", maintainer.clone()),
    ];
    if let Some(homepage) = &config.subject_homepage {
        project.push(("doap:homepage", iri(homepage)));
    }
    if let Some(license) = &config.license {
        project.push(("doap:license", iri(license)));
    }
    if let Some(version) = &config.subject_version {
        project.push((
            "doap:release",
            anonymous_node(&[("doap:revision", turtle_string(version))]),
        ));
    }
    out.push_str(&subject_block(&subject, &project));

    let mut person = vec![
        ("a", "foaf:Person , earl:Assertor".to_string()),
        ("foaf:name", turtle_string(&config.maintainer_name)),
    ];
    if let Some(homepage) = &config.maintainer_homepage {
        person.push(("foaf:homepage", iri(homepage)));
    }
    out.push_str(&subject_block(&maintainer, &person));

    out.push_str(&subject_block(
        &iri(&config.tool_iri),
        &[
            ("a", "earl:Software".to_string()),
            ("dc:title", turtle_string(&config.tool_name)),
        ],
    ));

    for result in results {
        out.push_str(&test_case_block(result));
        out.push_str(&assertion_block(result, &subject, &maintainer, &stamp));
    }
    out
}

/// Renders and writes the report to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write(path: &Path, config: &ReportConfig, results: &[TestResult]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, generate(config, results))
        .with_context(|| format!("Failed to write report {}", path.display()))
}

fn test_case_block(result: &TestResult) -> String {
    let case = &result.case;
    let mut props = vec![("a", "earl:TestCase".to_string())];
    props.push(("dc:title", turtle_string(case.label())));
    if let Some(comment) = &case.comment {
        props.push(("dc:description", turtle_string(comment)));
    }
    if let Some(action) = &case.action_location {
        props.push(("mf:action", iri(action)));
    }
    if let Some(expected) = &case.result_location {
        props.push(("mf:result", iri(expected)));
    }
    subject_block(&case.id.to_string(), &props)
}

fn assertion_block(result: &TestResult, subject: &str, maintainer: &str, stamp: &str) -> String {
    let outcome = anonymous_node(&[
        ("a", "earl:TestResult".to_string()),
        ("earl:outcome", format!("earl:{}", result.outcome().as_str())),
        ("dc:date", stamp.to_string()),
    ]);
    subject_block(
        "[]",
        &[
            ("a", "earl:Assertion".to_string()),
            ("earl:assertedBy", maintainer.to_string()),
            ("earl:subject", subject.to_string()),
            ("earl:test", result.case.id.to_string()),
            ("earl:mode", "earl:automatic".to_string()),
            ("earl:result", outcome),
        ],
    )
}
