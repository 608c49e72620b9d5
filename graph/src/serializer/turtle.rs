//! Turtle building blocks.
//!
//! Documents are assembled from a prefix header followed by subject blocks,
//! each block listing predicate/object pairs separated by ` ;`.

/// Renders `@prefix` declarations, one per line, followed by a blank line.
#[must_use]
pub fn prefix_header(prefixes: &[(&str, &str)]) -> String {
    let mut out = String::new();
    for (prefix, iri) in prefixes {
        out.push_str(&format!("@prefix {}: <{}> .\n", prefix, iri));
    }
    out.push('\n');
    out
}

/// Renders one subject block:
///
/// ```text
/// <subject>
///   p1 o1 ;
///   p2 o2 .
/// ```
///
/// Subjects and objects are expected in Turtle form already (`<iri>`,
/// `prefix:name`, `_:label`, `[ ... ]` or a literal).
#[must_use]
pub fn subject_block(subject: &str, predicate_objects: &[(&str, String)]) -> String {
    let mut out = String::from(subject);
    if predicate_objects.is_empty() {
        out.push_str(" .\n\n");
        return out;
    }
    let body: Vec<String> = predicate_objects
        .iter()
        .map(|(p, o)| format!("  {} {}", p, o))
        .collect();
    out.push('\n');
    out.push_str(&body.join(" ;\n"));
    out.push_str(" .\n\n");
    out
}

/// Renders an anonymous node `[ p1 o1 ; p2 o2 ]` on one line.
#[must_use]
pub fn anonymous_node(predicate_objects: &[(&str, String)]) -> String {
    let body: Vec<String> = predicate_objects
        .iter()
        .map(|(p, o)| format!("{} {}", p, o))
        .collect();
    format!("[ {} ]", body.join(" ; "))
}

/// Renders an IRI reference.
#[must_use]
pub fn iri(s: &str) -> String {
    format!("<{}>", s)
}

/// Renders a quoted string literal.
#[must_use]
pub fn turtle_string(s: &str) -> String {
    format!("\"{}\"", crate::model::escape_literal(s))
}

/// Renders a literal with a datatype given in Turtle form (e.g. `xsd:dateTime`).
#[must_use]
pub fn typed_literal(s: &str, datatype: &str) -> String {
    format!("{}^^{}", turtle_string(s), datatype)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lists_every_prefix() {
        let header = prefix_header(&[
            ("earl", "http://www.w3.org/ns/earl#"),
            ("dc", "http://purl.org/dc/terms/"),
        ]);
        assert!(header.contains("@prefix earl: <http://www.w3.org/ns/earl#> ."));
        assert!(header.contains("@prefix dc: <http://purl.org/dc/terms/> ."));
        assert!(header.ends_with("\n\n"));
    }

    #[test]
    fn block_separates_pairs() {
        let block = subject_block(
            "<http://ex.org/t>",
            &[("a", "earl:TestCase".to_string()), ("dc:title", turtle_string("t1"))],
        );
        assert_eq!(block, "<http://ex.org/t>\n  a earl:TestCase ;\n  dc:title \"t1\" .\n\n");
    }

    #[test]
    fn anonymous_node_is_inline() {
        let node = anonymous_node(&[
            ("a", "earl:TestResult".to_string()),
            ("earl:outcome", "earl:passed".to_string()),
        ]);
        assert_eq!(node, "[ a earl:TestResult ; earl:outcome earl:passed ]");
    }

    #[test]
    fn string_escaping() {
        assert_eq!(turtle_string("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(typed_literal("1", "xsd:integer"), "\"1\"^^xsd:integer");
    }
}
