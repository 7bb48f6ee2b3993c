//! Markdown-level passes over pipeline documents.
//!
//! Splits a document into heading sections, pulls fenced code fragments out
//! of section text, and provides the two text-producing front ends: notebook
//! import and the auto-logs section.
//!
//! Everything here is purely textual. Deciding what a fragment means is left
//! to `pipedoc-core`.

mod auto_logs;
mod fences;
mod notebook;
mod sections;

pub use auto_logs::{AUTO_LOGS_MARKER, AUTO_LOGS_SECTION, AUTO_LOGS_TITLE, inject_auto_logs};
pub use fences::extract_fragments;
pub use notebook::{NOTEBOOK_CODE_LANGUAGE, notebook_to_markdown};
pub use sections::segment;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
