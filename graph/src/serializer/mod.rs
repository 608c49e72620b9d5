//! Serializers for harness output.
//!
//! - **N-Quads** ([`nquads`]): one statement per line, used for captured parser output
//! - **Turtle** ([`turtle`]): prefixed subject blocks, used for the EARL report

pub mod nquads;
pub mod turtle;
