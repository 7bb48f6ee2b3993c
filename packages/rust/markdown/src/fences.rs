//! Fenced code block scanning.
//!
//! Recognizes backtick and tilde fences (three or more markers, up to three
//! spaces of indentation). A fence closes on a line made only of the same
//! marker, at least as long as the opening run. An unterminated fence runs to
//! the end of the text.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use pipedoc_shared::CodeFragment;

/// Matches an opening fence: indentation, marker run, info string.
static FENCE_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^( {0,3})(`{3,}|~{3,})(.*)$").expect("fence open regex"));

/// Matches a candidate closing fence.
static FENCE_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})[ \t]*$").expect("fence close regex"));

// ---------------------------------------------------------------------------
// Fence
// ---------------------------------------------------------------------------

/// An open fence, remembered until its closing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fence {
    indent: usize,
    marker: char,
    len: usize,
}

impl Fence {
    /// Try to open a fence on `line`. Returns the fence and its trimmed info string.
    pub(crate) fn open(line: &str) -> Option<(Self, &str)> {
        let caps = FENCE_OPEN_RE.captures(line.trim_end_matches(['\r', '\n']))?;
        let run = caps.get(2)?.as_str();
        let info = caps.get(3).map_or("", |m| m.as_str()).trim();
        let marker = run.chars().next()?;

        // A backtick fence cannot carry backticks in its info string.
        if marker == '`' && info.contains('`') {
            return None;
        }

        let fence = Self {
            indent: caps.get(1).map_or(0, |m| m.as_str().len()),
            marker,
            len: run.len(),
        };
        Some((fence, info))
    }

    /// Whether `line` closes this fence.
    pub(crate) fn closes(&self, line: &str) -> bool {
        FENCE_CLOSE_RE
            .captures(line.trim_end_matches(['\r', '\n']))
            .and_then(|caps| caps.get(1))
            .is_some_and(|run| {
                let run = run.as_str();
                run.starts_with(self.marker) && run.len() >= self.len
            })
    }

    /// Drop up to the fence's own indentation from a content line.
    fn dedent<'a>(&self, line: &'a str) -> &'a str {
        let spaces = line
            .bytes()
            .take(self.indent)
            .take_while(|b| *b == b' ')
            .count();
        &line[spaces..]
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Fragment being collected while its fence is open.
struct OpenFragment<'a> {
    fence: Fence,
    info: &'a str,
    lines: Vec<&'a str>,
}

impl OpenFragment<'_> {
    fn finish(self) -> CodeFragment {
        let language = self
            .info
            .split_whitespace()
            .next()
            .map(str::to_string);

        CodeFragment {
            language,
            info_string: self.info.to_string(),
            code: self.lines.join("\n"),
        }
    }
}

/// Extract fenced code fragments from `text`, in document order.
///
/// The code of each fragment excludes the newline before its closing fence.
#[instrument(skip_all, fields(len = text.len()))]
pub fn extract_fragments(text: &str) -> Vec<CodeFragment> {
    let mut fragments = Vec::new();
    let mut open: Option<OpenFragment<'_>> = None;

    for line in text.lines() {
        match open.take() {
            Some(current) if current.fence.closes(line) => {
                fragments.push(current.finish());
            }
            Some(mut current) => {
                current.lines.push(current.fence.dedent(line));
                open = Some(current);
            }
            None => {
                if let Some((fence, info)) = Fence::open(line) {
                    open = Some(OpenFragment {
                        fence,
                        info,
                        lines: Vec::new(),
                    });
                }
            }
        }
    }

    if let Some(current) = open {
        debug!(info = current.info, "unterminated fence runs to end of text");
        fragments.push(current.finish());
    }

    debug!(count = fragments.len(), "fragments extracted");
    fragments
}
