//! Manifest parsing.
//!
//! A test manifest is an RDF document whose `mf:entries` property points at
//! an `rdf:first`/`rdf:rest` list of test items. The document is parsed into
//! a [`TripleStore`], then the list is walked cell by cell so that cases come
//! out in declared order.

use std::collections::{BTreeMap, HashSet};

use rdft_graph::vocab::{
    MF_ACTION, MF_ENTRIES, MF_NAME, MF_RESULT, RDFS_COMMENT, RDF_FIRST, RDF_NIL, RDF_REST,
    RDF_TYPE,
};
use rdft_graph::{parse_document, Pattern, Syntax, Term, TripleStore};
use regex::Regex;

use crate::error::ManifestError;

/// One test case as declared by a manifest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    /// The entry's subject (IRI or blank node); unique within a manifest.
    pub id: Term,
    /// `mf:name`.
    pub name: Option<String>,
    /// `rdfs:comment`.
    pub comment: Option<String>,
    /// `rdf:type`, as a full IRI.
    pub test_type: Option<String>,
    /// Fixture name of `mf:action`; empty when absent.
    pub action: String,
    /// `mf:action` as written in the manifest (resolved IRI).
    pub action_location: Option<String>,
    /// Fixture name of `mf:result`.
    pub result: Option<String>,
    /// `mf:result` as written in the manifest (resolved IRI).
    pub result_location: Option<String>,
    /// The type matches the negative-test pattern.
    pub negative: bool,
    /// Excluded from scoring by the skip-negative policy.
    pub skipped: bool,
    /// Every property of the entry, keyed by the predicate's local name.
    /// The first value wins when a property repeats.
    pub properties: BTreeMap<String, Term>,
}

impl TestCase {
    /// Human-readable label: the name, or the id's local name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.id.local_name())
    }

    /// Syntax named by the test type, if any.
    #[must_use]
    pub fn declared_syntax(&self) -> Option<Syntax> {
        self.test_type.as_deref().and_then(Syntax::from_test_type)
    }
}

/// Cases derived from a manifest, in declared order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    /// Cases that are run and scored.
    pub tests: Vec<TestCase>,
    /// Cases excluded from scoring.
    pub skipped: Vec<TestCase>,
}

impl Manifest {
    /// Number of list entries the manifest declared.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.tests.len() + self.skipped.len()
    }
}

/// How entries are classified.
#[derive(Debug, Clone)]
pub struct ManifestPolicy {
    /// Tested against the type IRI; a match marks the case negative.
    pub negative: Regex,
    /// Route negative cases to [`Manifest::skipped`].
    pub skip_negative: bool,
}

impl ManifestPolicy {
    /// Classifies by the given pattern without skipping.
    #[must_use]
    pub fn new(negative: Regex) -> Self {
        Self {
            negative,
            skip_negative: false,
        }
    }
}

/// Parses a Turtle manifest located at `location` and walks its entries.
///
/// `fixture_name` maps a resolved `mf:action`/`mf:result` IRI to the name the
/// fixture cache is keyed by.
///
/// # Errors
///
/// Returns [`ManifestError::Parse`] on malformed Turtle, or any list error
/// from [`read_entries`].
pub fn parse_manifest<F>(
    text: &str,
    location: &str,
    policy: &ManifestPolicy,
    fixture_name: F,
) -> Result<Manifest, ManifestError>
where
    F: Fn(&str) -> String,
{
    let mut store = TripleStore::new();
    parse_document(text, Syntax::Turtle, Some(location), |t| store.insert(t))?;
    tracing::debug!(triples = store.len(), location, "manifest parsed");
    read_entries(&store, policy, fixture_name)
}

/// Walks the `mf:entries` list of an already populated store.
///
/// # Errors
///
/// Returns an error if the list head is missing, a cell lacks `rdf:first`
/// or `rdf:rest`, the list revisits a cell, or two entries share an id.
pub fn read_entries<F>(
    store: &TripleStore,
    policy: &ManifestPolicy,
    fixture_name: F,
) -> Result<Manifest, ManifestError>
where
    F: Fn(&str) -> String,
{
    let entries = Term::iri(MF_ENTRIES);
    let first = Term::iri(RDF_FIRST);
    let rest = Term::iri(RDF_REST);
    let nil = Term::iri(RDF_NIL);

    let mut cell = store
        .find(&Pattern::any().predicate(&entries))
        .first()
        .map(|t| t.object.clone())
        .ok_or(ManifestError::MissingEntries)?;

    let mut manifest = Manifest::default();
    let mut visited = HashSet::new();
    let mut ids = HashSet::new();

    while cell != nil {
        if !visited.insert(cell.clone()) {
            return Err(ManifestError::CyclicList { cell });
        }
        let item = store
            .first_object(&cell, &first)
            .ok_or_else(|| ManifestError::MissingFirst { cell: cell.clone() })?;

        let case = build_case(store, item, policy, &fixture_name);
        if !ids.insert(case.id.clone()) {
            return Err(ManifestError::DuplicateTest { id: case.id });
        }
        if case.skipped {
            manifest.skipped.push(case);
        } else {
            manifest.tests.push(case);
        }

        cell = store
            .first_object(&cell, &rest)
            .cloned()
            .ok_or_else(|| ManifestError::MissingRest { cell: cell.clone() })?;
    }

    Ok(manifest)
}

fn build_case<F>(
    store: &TripleStore,
    item: &Term,
    policy: &ManifestPolicy,
    fixture_name: &F,
) -> TestCase
where
    F: Fn(&str) -> String,
{
    let mut properties = BTreeMap::new();
    for triple in store.find(&Pattern::any().subject(item)) {
        properties
            .entry(triple.predicate.local_name().to_string())
            .or_insert_with(|| triple.object.clone());
    }

    let text = |predicate: &str| {
        store
            .first_object(item, &Term::iri(predicate))
            .map(|t| t.value().to_string())
    };
    let name = text(MF_NAME);
    let comment = text(RDFS_COMMENT);
    let test_type = text(RDF_TYPE);
    let action_location = text(MF_ACTION);
    let result_location = text(MF_RESULT);

    // Any of several declared types can mark the case negative.
    let rdf_type = Term::iri(RDF_TYPE);
    let negative = store
        .find(&Pattern::any().subject(item).predicate(&rdf_type))
        .iter()
        .any(|t| policy.negative.is_match(t.object.value()));

    TestCase {
        id: item.clone(),
        name,
        comment,
        action: action_location.as_deref().map(fixture_name).unwrap_or_default(),
        result: result_location.as_deref().map(fixture_name),
        test_type,
        action_location,
        result_location,
        negative,
        skipped: negative && policy.skip_negative,
        properties,
    }
}

#[cfg(test)]
mod tests {
    use rdft_graph::Triple;

    use super::*;

    const LOCATION: &str = "http://example.org/suite/manifest.ttl";

    const MANIFEST: &str = r#"
@prefix mf: <http://www.w3.org/2001/sw/DataAccess/tests/test-manifest#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix rdft: <http://www.w3.org/ns/rdftest#> .

<> a mf:Manifest ;
   mf:entries ( <#t1> <#t2> <#t3> ) .

<#t1> a rdft:TestTurtleEval ;
   mf:name "t1" ;
   rdfs:comment "first" ;
   mf:action <t1.ttl> ;
   mf:result <t1.nt> .

<#t2> a rdft:TestTurtleNegativeSyntax ;
   mf:name "t2" ;
   mf:action <t2.ttl> .

<#t3> a rdft:TestTurtlePositiveSyntax ;
   mf:name "t3" ;
   mf:action <sub/t3.ttl> .
"#;

    fn strip_base(location: &str) -> String {
        location
            .strip_prefix("http://example.org/suite/")
            .unwrap_or(location)
            .to_string()
    }

    fn policy(skip_negative: bool) -> ManifestPolicy {
        ManifestPolicy {
            negative: Regex::new("Negative").unwrap(),
            skip_negative,
        }
    }

    #[test]
    fn entries_come_out_in_list_order() {
        let m = parse_manifest(MANIFEST, LOCATION, &policy(false), strip_base).unwrap();
        let names: Vec<_> = m.tests.iter().map(|c| c.label()).collect();
        assert_eq!(names, ["t1", "t2", "t3"]);
        assert!(m.skipped.is_empty());

        let t1 = &m.tests[0];
        assert_eq!(t1.id, Term::iri("http://example.org/suite/manifest.ttl#t1"));
        assert_eq!(t1.comment.as_deref(), Some("first"));
        assert_eq!(t1.action, "t1.ttl");
        assert_eq!(t1.result.as_deref(), Some("t1.nt"));
        assert_eq!(t1.action_location.as_deref(), Some("http://example.org/suite/t1.ttl"));
        assert_eq!(t1.declared_syntax(), Some(Syntax::Turtle));
        assert!(!t1.negative);
        assert_eq!(m.tests[2].action, "sub/t3.ttl");
    }

    #[test]
    fn negative_cases_are_flagged_and_optionally_skipped() {
        let m = parse_manifest(MANIFEST, LOCATION, &policy(false), strip_base).unwrap();
        assert!(m.tests[1].negative);
        assert!(!m.tests[1].skipped);

        let m = parse_manifest(MANIFEST, LOCATION, &policy(true), strip_base).unwrap();
        assert_eq!(m.tests.len(), 2);
        assert_eq!(m.skipped.len(), 1);
        assert_eq!(m.skipped[0].label(), "t2");
        assert!(m.skipped[0].skipped);
        assert_eq!(m.total_entries(), 3);
    }

    #[test]
    fn malformed_manifest_is_a_parse_error() {
        let err = parse_manifest("<> <p> .", LOCATION, &policy(false), strip_base).unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
    }

    #[test]
    fn missing_entries_is_fatal() {
        let err = parse_manifest(
            "<> a <http://ex.org/M> .",
            LOCATION,
            &policy(false),
            strip_base,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::MissingEntries));
    }

    fn iri(s: &str) -> Term {
        Term::iri(s)
    }

    #[test]
    fn entry_without_triples_yields_empty_case() {
        let store: TripleStore = vec![
            Triple::new(iri("m"), iri(MF_ENTRIES), Term::blank("c0")),
            Triple::new(Term::blank("c0"), iri(RDF_FIRST), iri("http://ex.org/bare")),
            Triple::new(Term::blank("c0"), iri(RDF_REST), iri(RDF_NIL)),
        ]
        .into_iter()
        .collect();
        let m = read_entries(&store, &policy(false), strip_base).unwrap();
        assert_eq!(m.tests.len(), 1);
        let case = &m.tests[0];
        assert_eq!(case.name, None);
        assert_eq!(case.comment, None);
        assert_eq!(case.action, "");
        assert_eq!(case.result, None);
        assert!(!case.negative);
        assert!(case.properties.is_empty());
    }

    #[test]
    fn missing_rest_is_fatal_not_a_silent_stop() {
        let store: TripleStore = vec![
            Triple::new(iri("m"), iri(MF_ENTRIES), Term::blank("c0")),
            Triple::new(Term::blank("c0"), iri(RDF_FIRST), iri("http://ex.org/t")),
        ]
        .into_iter()
        .collect();
        let err = read_entries(&store, &policy(false), strip_base).unwrap_err();
        assert!(matches!(err, ManifestError::MissingRest { .. }));
    }

    #[test]
    fn missing_first_is_fatal() {
        let store: TripleStore = vec![
            Triple::new(iri("m"), iri(MF_ENTRIES), Term::blank("c0")),
            Triple::new(Term::blank("c0"), iri(RDF_REST), iri(RDF_NIL)),
        ]
        .into_iter()
        .collect();
        let err = read_entries(&store, &policy(false), strip_base).unwrap_err();
        assert!(matches!(err, ManifestError::MissingFirst { .. }));
    }

    #[test]
    fn cyclic_list_terminates_with_error() {
        let store: TripleStore = vec![
            Triple::new(iri("m"), iri(MF_ENTRIES), Term::blank("c0")),
            Triple::new(Term::blank("c0"), iri(RDF_FIRST), iri("http://ex.org/a")),
            Triple::new(Term::blank("c0"), iri(RDF_REST), Term::blank("c1")),
            Triple::new(Term::blank("c1"), iri(RDF_FIRST), iri("http://ex.org/b")),
            Triple::new(Term::blank("c1"), iri(RDF_REST), Term::blank("c0")),
        ]
        .into_iter()
        .collect();
        let err = read_entries(&store, &policy(false), strip_base).unwrap_err();
        assert!(matches!(err, ManifestError::CyclicList { .. }));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let store: TripleStore = vec![
            Triple::new(iri("m"), iri(MF_ENTRIES), Term::blank("c0")),
            Triple::new(Term::blank("c0"), iri(RDF_FIRST), iri("http://ex.org/a")),
            Triple::new(Term::blank("c0"), iri(RDF_REST), Term::blank("c1")),
            Triple::new(Term::blank("c1"), iri(RDF_FIRST), iri("http://ex.org/a")),
            Triple::new(Term::blank("c1"), iri(RDF_REST), iri(RDF_NIL)),
        ]
        .into_iter()
        .collect();
        let err = read_entries(&store, &policy(false), strip_base).unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateTest { .. }));
    }

    #[test]
    fn any_declared_type_can_mark_a_case_negative() {
        let item = iri("http://ex.org/t");
        let store: TripleStore = vec![
            Triple::new(iri("m"), iri(MF_ENTRIES), Term::blank("c0")),
            Triple::new(Term::blank("c0"), iri(RDF_FIRST), item.clone()),
            Triple::new(Term::blank("c0"), iri(RDF_REST), iri(RDF_NIL)),
            Triple::new(
                item.clone(),
                iri(RDF_TYPE),
                iri("http://www.w3.org/ns/rdftest#TestTurtleEval"),
            ),
            Triple::new(
                item.clone(),
                iri(RDF_TYPE),
                iri("http://www.w3.org/ns/rdftest#TestTurtleNegativeEval"),
            ),
            Triple::new(item, iri(MF_NAME), Term::plain("typed twice")),
        ]
        .into_iter()
        .collect();
        let m = read_entries(&store, &policy(true), strip_base).unwrap();
        assert!(m.tests.is_empty());
        let case = &m.skipped[0];
        assert!(case.negative);
        assert_eq!(case.label(), "typed twice");
        assert_eq!(
            case.test_type.as_deref(),
            Some("http://www.w3.org/ns/rdftest#TestTurtleEval")
        );
    }
}
