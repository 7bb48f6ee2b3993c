//! Notebook (`.ipynb`) to markdown conversion.
//!
//! Markdown cells pass through verbatim; code cells are wrapped in a fenced
//! block. Cells are separated by a blank line. Section structure is left to
//! the segmenter.

use serde::Deserialize;
use tracing::{debug, instrument};

use pipedoc_shared::{PipedocError, Result};

/// Fence tag given to code cells unless the caller overrides it.
pub const NOTEBOOK_CODE_LANGUAGE: &str = "python";

#[derive(Debug, Deserialize)]
struct Notebook {
    #[serde(default)]
    cells: Vec<Cell>,
}

#[derive(Debug, Deserialize)]
struct Cell {
    cell_type: String,
    #[serde(default)]
    source: CellSource,
}

/// nbformat allows either a list of lines or a single string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CellSource {
    Lines(Vec<String>),
    Text(String),
}

impl Default for CellSource {
    fn default() -> Self {
        Self::Lines(Vec::new())
    }
}

impl CellSource {
    fn text(&self) -> String {
        match self {
            Self::Lines(lines) => lines.concat(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Convert notebook JSON into document text.
///
/// Empty cells and cell types other than `markdown` and `code` are skipped.
#[instrument(skip_all, fields(bytes = notebook.len(), code_language = %code_language))]
pub fn notebook_to_markdown(notebook: &[u8], code_language: &str) -> Result<String> {
    let parsed: Notebook = serde_json::from_slice(notebook)
        .map_err(|e| PipedocError::parse(format!("notebook is not valid JSON: {e}")))?;

    let mut parts: Vec<String> = Vec::with_capacity(parsed.cells.len());

    for cell in &parsed.cells {
        let source = cell.source.text();
        if source.trim().is_empty() {
            continue;
        }

        match cell.cell_type.as_str() {
            "markdown" => parts.push(source),
            "code" => {
                let code = source.strip_suffix('\n').unwrap_or(&source);
                parts.push(format!("```{code_language}\n{code}\n```"));
            }
            other => debug!(cell_type = other, "skipping notebook cell"),
        }
    }

    debug!(cells = parsed.cells.len(), parts = parts.len(), "notebook converted");
    Ok(parts.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_and_code_cells_are_joined() {
        let nb = br##"{
            "cells": [
                {"cell_type": "markdown", "source": ["# ETL\n", "intro"]},
                {"cell_type": "code", "source": ["x = 1\n", "print(x)\n"]}
            ]
        }"##;

        let md = notebook_to_markdown(nb, NOTEBOOK_CODE_LANGUAGE).unwrap();
        assert_eq!(md, "# ETL\nintro\n\n```python\nx = 1\nprint(x)\n```");
    }

    #[test]
    fn string_source_is_accepted() {
        let nb = br#"{"cells": [{"cell_type": "code", "source": "SELECT 1"}]}"#;
        let md = notebook_to_markdown(nb, "sql").unwrap();
        assert_eq!(md, "```sql\nSELECT 1\n```");
    }

    #[test]
    fn empty_and_raw_cells_are_skipped() {
        let nb = br#"{
            "cells": [
                {"cell_type": "markdown", "source": []},
                {"cell_type": "raw", "source": ["ignored"]},
                {"cell_type": "code", "source": ["  \n"]},
                {"cell_type": "markdown", "source": ["kept"]}
            ]
        }"#;

        assert_eq!(notebook_to_markdown(nb, "python").unwrap(), "kept");
    }

    #[test]
    fn notebook_without_cells_is_empty() {
        assert_eq!(notebook_to_markdown(b"{}", "python").unwrap(), "");
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = notebook_to_markdown(b"not json", "python").unwrap_err();
        assert!(matches!(err, PipedocError::Parse { .. }));
    }
}
