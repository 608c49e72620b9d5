//! Line-oriented N-Quads serializer.
//!
//! Statements are written in the order given, one per line, each rendered
//! through [`Triple`]'s `Display` impl. Default-graph statements are plain
//! N-Triples lines, so the output of a triple-only document is valid N-Triples.

use crate::model::Triple;

/// Serializes `triples` to an N-Quads string, one line per statement.
#[must_use]
pub fn to_nquads<'a, I>(triples: I) -> String
where
    I: IntoIterator<Item = &'a Triple>,
{
    let mut out = String::new();
    for triple in triples {
        push_line(&mut out, triple);
    }
    out
}

/// Appends one statement line (with trailing newline) to `out`.
pub fn push_line(out: &mut String, triple: &Triple) {
    out.push_str(&triple.to_string());
    out.push('\n');
}
