//! Compile entry points.
//!
//! [`compile`] is the pure document → tree function. [`Compiler`] adds the
//! outer conveniences (auto-logs injection, notebook import and
//! file-extension dispatch) driven by [`CompileOptions`]. A compiler holds
//! only its options, so every call builds a fresh tree from its own input.

use std::path::Path;

use tracing::{info, instrument, warn};

use pipedoc_markdown::{inject_auto_logs, notebook_to_markdown, segment};
use pipedoc_shared::{CompileIssue, CompileOptions, ConfigNode, PipedocError, Result, Section};

use crate::assembler::assemble;
use crate::hierarchy::resolve;

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// The outcome of one compile: a possibly partial tree plus recovered issues.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    /// The assembled configuration tree.
    pub config: ConfigNode,
    /// Metadata failures recovered during assembly, in the order they occurred.
    pub issues: Vec<CompileIssue>,
}

impl Compilation {
    /// True when no metadata payload was rejected.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// The tree, or the first recorded decode failure as an error.
    pub fn into_strict(self) -> Result<ConfigNode> {
        match self.issues.into_iter().next() {
            Some(issue) => Err(PipedocError::Metadata(issue.error)),
            None => Ok(self.config),
        }
    }

    /// Render the tree as JSON, two-space indented when `pretty`.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        self.config.to_json(pretty)
    }
}

// ---------------------------------------------------------------------------
// Pure pipeline
// ---------------------------------------------------------------------------

/// Segment `document` and resolve every section's parent.
pub fn resolved_sections(document: &str) -> Vec<Section> {
    let mut sections = segment(document);
    resolve(&mut sections);
    sections
}

/// Compile document text into a config tree.
///
/// Never fails: rejected metadata is reported in [`Compilation::issues`].
#[instrument(skip_all, fields(len = document.len()))]
pub fn compile(document: &str) -> Compilation {
    let mut sections = segment(document);
    let hierarchy = resolve(&mut sections);
    let (config, issues) = assemble(&sections, &hierarchy);

    for issue in &issues {
        warn!(%issue, "metadata issue");
    }
    info!(
        sections = sections.len(),
        top_level = config.order.len(),
        orphans = hierarchy.orphans().len(),
        issues = issues.len(),
        "document compiled"
    );

    Compilation { config, issues }
}

// ---------------------------------------------------------------------------
// Compiler
// ---------------------------------------------------------------------------

/// Compiles documents from text or files under a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile document text, appending the auto-logs section unless disabled.
    pub fn compile_text(&self, document: &str) -> Compilation {
        let document = inject_auto_logs(document, self.options.auto_logs_disabled);
        compile(&document)
    }

    /// Read and compile a file.
    ///
    /// Notebook files are converted and get the auto-logs section unless it is
    /// disabled; any other file is compiled exactly as read. Read failures are
    /// fatal and yield no tree.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn compile_file(&self, path: &Path) -> Result<Compilation> {
        let document = self.load_document(path)?;
        Ok(compile(&document))
    }

    /// Read a file and produce the document text the compiler would see.
    pub fn load_document(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|e| PipedocError::io(path, e))?;

        if self.is_notebook(path) {
            let markdown = notebook_to_markdown(&bytes, &self.options.notebook_code_language)?;
            return Ok(inject_auto_logs(
                &markdown,
                self.options.auto_logs_disabled,
            ));
        }

        String::from_utf8(bytes).map_err(|e| {
            PipedocError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })
    }

    fn is_notebook(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.options.notebook_extension))
    }
}
