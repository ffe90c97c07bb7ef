//! Machine-readable output formats.

pub mod sarif;

pub use sarif::generate_sarif;
