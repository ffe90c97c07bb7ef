//! Single-pass scanners over the trivia stream and the line table.
//!
//! Scanners are pure functions returning spans. The document rules wrap
//! them, and the fixable ones also expose the edit for a reported span.

pub mod final_newline;
pub mod line_length;
pub mod trailing_whitespace;
