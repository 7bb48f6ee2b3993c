//! Document segmentation by ATX heading depth.
//!
//! Only depths 1–3 open sections. Deeper headings are ordinary body text of
//! the enclosing section, and heading-like lines inside fenced code blocks are
//! never headings. Text before the first heading belongs to no section.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use pipedoc_shared::{MAX_SECTION_DEPTH, Section};

use crate::fences::Fence;

/// Matches an ATX heading: marker run, optional text, optional closing run.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$").expect("heading regex")
});

/// A heading line located in the document.
#[derive(Debug)]
struct Heading {
    depth: u8,
    title: String,
    /// Byte offset of the heading line.
    start: usize,
    /// Byte offset just past the heading line.
    content_start: usize,
}

/// Parse a heading line into its depth and title.
fn parse_heading(line: &str) -> Option<(u8, String)> {
    let caps = HEADING_RE.captures(line.trim_end_matches(['\r', '\n']))?;
    let depth = u8::try_from(caps.get(1)?.as_str().len()).ok()?;
    let title = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
    Some((depth, title))
}

/// Locate every depth-1..=3 heading outside fenced code.
fn scan_headings(document: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut fence: Option<Fence> = None;
    let mut offset = 0;

    for line in document.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        if let Some(open) = fence {
            if open.closes(line) {
                fence = None;
            }
            continue;
        }

        if let Some((opened, _)) = Fence::open(line) {
            fence = Some(opened);
            continue;
        }

        if let Some((depth, title)) = parse_heading(line) {
            if depth <= MAX_SECTION_DEPTH {
                headings.push(Heading {
                    depth,
                    title,
                    start,
                    content_start: offset,
                });
            }
        }
    }

    headings
}

/// Split a document into sections in document order.
///
/// `body` runs to the next heading of equal or lesser depth; `lead` stops at
/// the next heading of any depth. Parents are left unresolved. An empty
/// document yields no sections.
#[instrument(skip_all, fields(len = document.len()))]
pub fn segment(document: &str) -> Vec<Section> {
    let headings = scan_headings(document);
    let mut body_ends = vec![document.len(); headings.len()];
    let mut open: Vec<usize> = Vec::new();

    for (idx, heading) in headings.iter().enumerate() {
        while let Some(&top) = open.last() {
            if headings[top].depth < heading.depth {
                break;
            }
            body_ends[top] = heading.start;
            open.pop();
        }
        open.push(idx);
    }

    let sections: Vec<Section> = headings
        .iter()
        .enumerate()
        .map(|(row, heading)| {
            let lead_end = headings
                .get(row + 1)
                .map_or(document.len(), |next| next.start);

            Section {
                row,
                depth: heading.depth,
                title: heading.title.clone(),
                body: document[heading.content_start..body_ends[row]].to_string(),
                lead: document[heading.content_start..lead_end].to_string(),
                parent_row: None,
            }
        })
        .collect();

    debug!(sections = sections.len(), "document segmented");
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_has_no_sections() {
        assert!(segment("").is_empty());
        assert!(segment("just prose, no headings\n").is_empty());
    }

    #[test]
    fn headings_become_rows_in_order() {
        let doc = "# A\ntext a\n## B\ntext b\n### C\ntext c\n# D\n";
        let sections = segment(doc);

        let summary: Vec<_> = sections
            .iter()
            .map(|s| (s.row, s.depth, s.title.as_str()))
            .collect();
        assert_eq!(summary, vec![(0, 1, "A"), (1, 2, "B"), (2, 3, "C"), (3, 1, "D")]);
    }

    #[test]
    fn body_spans_nested_sections_but_lead_does_not() {
        let doc = "# A\nintro\n## B\ninner\n# C\nlast";
        let sections = segment(doc);

        assert_eq!(sections[0].body, "intro\n## B\ninner\n");
        assert_eq!(sections[0].lead, "intro\n");
        assert_eq!(sections[1].body, "inner\n");
        assert_eq!(sections[2].body, "last");
    }

    #[test]
    fn deeper_headings_stay_in_body() {
        let doc = "### Leaf\n#### Detail\n```sql\nSELECT 1\n```\n";
        let sections = segment(doc);

        assert_eq!(sections.len(), 1);
        assert!(sections[0].lead.contains("#### Detail"));
        assert!(sections[0].lead.contains("SELECT 1"));
    }

    #[test]
    fn hashes_inside_fences_are_not_headings() {
        let doc = "# A\n```python\n# just a comment\n```\n## B\n";
        let sections = segment(doc);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].title, "B");
        assert!(sections[0].lead.contains("# just a comment"));
    }

    #[test]
    fn unterminated_fence_hides_every_later_heading() {
        let doc = "# A\n## B\n```sql\nSELECT 1\n## C\n# D\n";
        let sections = segment(doc);

        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(sections[1].lead, "```sql\nSELECT 1\n## C\n# D\n");
    }

    #[test]
    fn heading_syntax_variants() {
        assert_eq!(parse_heading("# Title"), Some((1, "Title".into())));
        assert_eq!(parse_heading("##   Spaced   "), Some((2, "Spaced".into())));
        assert_eq!(parse_heading("### Closed ###"), Some((3, "Closed".into())));
        assert_eq!(parse_heading("   # Indented"), Some((1, "Indented".into())));
        assert_eq!(parse_heading("#"), Some((1, String::new())));
        assert_eq!(parse_heading("#hashtag"), None);
        assert_eq!(parse_heading("    # code"), None);
        assert_eq!(parse_heading("####### seven"), None);
    }

    #[test]
    fn preamble_before_first_heading_is_ignored() {
        let sections = segment("preamble\n```yaml\nx: 1\n```\n# A\nbody\n");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].body, "body\n");
    }

    #[test]
    fn rows_are_strictly_increasing() {
        let doc = "# A\n## B\n## B\n### C\n# A\n";
        let rows: Vec<_> = segment(doc).iter().map(|s| s.row).collect();
        assert!(rows.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(rows.len(), 5);
    }
}
