//! IRI constants for the vocabularies the harness reads and writes.
//!
//! Manifests use `mf:`, `rdf:` and `rdfs:` terms; the report uses the
//! `earl:`, `dc:`, `doap:`, `foaf:` and `xsd:` namespaces.

/// `rdf:type`.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// `rdf:first`.
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
/// `rdf:rest`.
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
/// `rdf:nil`, the empty list.
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
/// `rdf:langString`.
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// `rdfs:comment`.
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";

/// `xsd:` namespace.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
/// `xsd:string`.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// `mf:` test manifest namespace.
pub const MF: &str = "http://www.w3.org/2001/sw/DataAccess/tests/test-manifest#";
/// `mf:entries`, the head of the test list.
pub const MF_ENTRIES: &str = "http://www.w3.org/2001/sw/DataAccess/tests/test-manifest#entries";
/// `mf:action`.
pub const MF_ACTION: &str = "http://www.w3.org/2001/sw/DataAccess/tests/test-manifest#action";
/// `mf:result`.
pub const MF_RESULT: &str = "http://www.w3.org/2001/sw/DataAccess/tests/test-manifest#result";
/// `mf:name`.
pub const MF_NAME: &str = "http://www.w3.org/2001/sw/DataAccess/tests/test-manifest#name";

/// `earl:` evaluation and report language namespace.
pub const EARL: &str = "http://www.w3.org/ns/earl#";
/// `dc:` Dublin Core terms namespace.
pub const DC: &str = "http://purl.org/dc/terms/";
/// `doap:` description of a project namespace.
pub const DOAP: &str = "http://usefulinc.com/ns/doap#";
/// `foaf:` friend of a friend namespace.
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
