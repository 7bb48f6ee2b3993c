//! Config tree assembler.
//!
//! Walks resolved sections from the top level down and builds the ordered
//! [`ConfigNode`] tree.
//!
//! A metadata decode failure never aborts the whole compile. The failing
//! section keeps its place in its parent's `order` as an empty node, and the
//! walk stops for the rest of that sibling list only:
//! - at depth 1 every later top-level section is dropped;
//! - at depth 2 (or 3) the remaining siblings under the same parent are
//!   dropped and the walk resumes with the parent's next sibling.

use tracing::{debug, instrument, warn};

use pipedoc_markdown::extract_fragments;
use pipedoc_shared::{CompileIssue, ConfigNode, MetadataDecodeError, MetadataFormat, Section};

use crate::hierarchy::Hierarchy;
use crate::metadata::decode_metadata;
use crate::naming::resolve_name;

/// Build the config tree from resolved sections.
///
/// Returns the (possibly partial) tree and every recovered decode failure.
#[instrument(skip_all, fields(sections = sections.len(), roots = hierarchy.roots().len()))]
pub fn assemble(sections: &[Section], hierarchy: &Hierarchy) -> (ConfigNode, Vec<CompileIssue>) {
    let mut assembler = Assembler {
        sections,
        hierarchy,
        issues: Vec::new(),
    };

    let mut root = ConfigNode::root();
    assembler.fill(hierarchy.roots(), &mut root);

    debug!(
        top_level = root.order.len(),
        issues = assembler.issues.len(),
        "config tree assembled"
    );
    (root, assembler.issues)
}

struct Assembler<'a> {
    sections: &'a [Section],
    hierarchy: &'a Hierarchy,
    issues: Vec<CompileIssue>,
}

impl<'a> Assembler<'a> {
    /// Assemble `rows` (one sibling list) as children of `parent`.
    fn fill(&mut self, rows: &'a [usize], parent: &mut ConfigNode) {
        let (sections, hierarchy) = (self.sections, self.hierarchy);

        for (pos, &row) in rows.iter().enumerate() {
            let section = &sections[row];
            let children = hierarchy.children(row);

            match section_node(section) {
                Ok(mut node) => {
                    if node.is_branch() {
                        self.fill(children, &mut node);
                    }
                    parent.push_child(section.title.clone(), node);
                }
                Err(error) => {
                    warn!(%error, "metadata rejected, skipping rest of sibling list");
                    parent.push_child(section.title.clone(), ConfigNode::at_depth(section.depth));

                    let skipped = children
                        .iter()
                        .chain(&rows[pos + 1..])
                        .map(|&r| sections[r].title.clone())
                        .collect();
                    self.issues.push(CompileIssue { error, skipped });
                    break;
                }
            }
        }
    }
}

/// Build one section's own node: decoded metadata plus named artifacts.
///
/// Only the section's lead text is read, so nested sections never lend their
/// fragments to an ancestor. The first fragment is the metadata payload when
/// its language is a recognized format; otherwise it is an ordinary artifact
/// candidate like every later fragment.
fn section_node(section: &Section) -> Result<ConfigNode, MetadataDecodeError> {
    let fragments = extract_fragments(&section.lead);
    let mut node = ConfigNode::at_depth(section.depth);

    let mut candidates = fragments.as_slice();
    if let Some((first, rest)) = fragments.split_first() {
        let format = first
            .language
            .as_deref()
            .and_then(MetadataFormat::from_tag);
        if let Some(format) = format {
            node.metadata = Some(decode_metadata(section, format, &first.code)?);
            candidates = rest;
        }
    }

    for fragment in candidates {
        match resolve_name(fragment) {
            Some((name, artifact)) => node.insert_artifact(name, artifact),
            None => debug!(
                title = %section.title,
                info = %fragment.info_string,
                "dropping fragment without a name"
            ),
        }
    }

    Ok(node)
}
