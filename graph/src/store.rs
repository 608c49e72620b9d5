//! Append-only triple store with pattern queries.
//!
//! Triples are kept in insertion order in a single arena. Three secondary
//! indexes map subject, predicate and object terms to arena positions, so a
//! pattern with any bound slot only scans the shortest candidate list.

use std::collections::HashMap;

use crate::model::{Term, Triple};

/// A query pattern. `None` in any slot matches every term.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pattern<'a> {
    /// Subject to match.
    pub subject: Option<&'a Term>,
    /// Predicate to match.
    pub predicate: Option<&'a Term>,
    /// Object to match.
    pub object: Option<&'a Term>,
    /// Graph name to match. `Some(None)` matches only the default graph.
    pub graph: Option<Option<&'a Term>>,
}

impl<'a> Pattern<'a> {
    /// Pattern that matches everything.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Binds the subject slot.
    #[must_use]
    pub fn subject(mut self, term: &'a Term) -> Self {
        self.subject = Some(term);
        self
    }

    /// Binds the predicate slot.
    #[must_use]
    pub fn predicate(mut self, term: &'a Term) -> Self {
        self.predicate = Some(term);
        self
    }

    /// Binds the object slot.
    #[must_use]
    pub fn object(mut self, term: &'a Term) -> Self {
        self.object = Some(term);
        self
    }

    /// Binds the graph slot.
    #[must_use]
    pub fn graph(mut self, graph: Option<&'a Term>) -> Self {
        self.graph = Some(graph);
        self
    }

    fn matches(&self, triple: &Triple) -> bool {
        self.subject.map_or(true, |s| *s == triple.subject)
            && self.predicate.map_or(true, |p| *p == triple.predicate)
            && self.object.map_or(true, |o| *o == triple.object)
            && self.graph.map_or(true, |g| g == triple.graph.as_ref())
    }
}

/// An append-only, pattern-indexed collection of triples.
#[derive(Debug, Default)]
pub struct TripleStore {
    triples: Vec<Triple>,
    by_subject: HashMap<Term, Vec<usize>>,
    by_predicate: HashMap<Term, Vec<usize>>,
    by_object: HashMap<Term, Vec<usize>>,
}

impl TripleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a triple and indexes it.
    pub fn insert(&mut self, triple: Triple) {
        let pos = self.triples.len();
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .push(pos);
        self.by_predicate
            .entry(triple.predicate.clone())
            .or_default()
            .push(pos);
        self.by_object
            .entry(triple.object.clone())
            .or_default()
            .push(pos);
        self.triples.push(triple);
    }

    /// Number of stored triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if no triple has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Returns every triple matching `pattern`, in insertion order.
    #[must_use]
    pub fn find(&self, pattern: &Pattern<'_>) -> Vec<&Triple> {
        let candidates = [
            pattern.subject.map(|t| Self::positions(&self.by_subject, t)),
            pattern.predicate.map(|t| Self::positions(&self.by_predicate, t)),
            pattern.object.map(|t| Self::positions(&self.by_object, t)),
        ]
        .into_iter()
        .flatten()
        .min_by_key(|positions| positions.len());

        match candidates {
            Some(positions) => positions
                .iter()
                .map(|&pos| &self.triples[pos])
                .filter(|t| pattern.matches(t))
                .collect(),
            None => self.triples.iter().filter(|t| pattern.matches(t)).collect(),
        }
    }

    /// Returns the object of the first triple with the given subject and
    /// predicate.
    #[must_use]
    pub fn first_object(&self, subject: &Term, predicate: &Term) -> Option<&Term> {
        self.find(&Pattern::any().subject(subject).predicate(predicate))
            .first()
            .map(|t| &t.object)
    }

    /// Iterates over all triples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    fn positions<'s>(index: &'s HashMap<Term, Vec<usize>>, term: &Term) -> &'s [usize] {
        index.get(term).map(Vec::as_slice).unwrap_or_default()
    }
}

impl Extend<Triple> for TripleStore {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}

impl FromIterator<Triple> for TripleStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut store = TripleStore::new();
        store.extend(iter);
        store
    }
}
