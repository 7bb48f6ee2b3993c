//! Parent resolution for segmented sections.
//!
//! A depth-`d` section's parent is the nearest preceding section at depth
//! `d - 1`. One forward pass remembers the last row seen at each depth.
//! Sections without such an ancestor are orphans: they stay in the section
//! list but are unreachable from the top level.

use tracing::{debug, instrument};

use pipedoc_shared::{MAX_SECTION_DEPTH, Section};

/// Child lists derived from resolved parents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    roots: Vec<usize>,
    children: Vec<Vec<usize>>,
    orphans: Vec<usize>,
}

impl Hierarchy {
    /// Depth-1 rows in document order.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Direct children of `row` in document order.
    pub fn children(&self, row: usize) -> &[usize] {
        self.children.get(row).map(Vec::as_slice).unwrap_or_default()
    }

    /// Rows of sections with no qualifying ancestor.
    pub fn orphans(&self) -> &[usize] {
        &self.orphans
    }
}

/// Assign `parent_row` to every section and build the child lists.
///
/// Expects sections as produced by `pipedoc_markdown::segment`, where each
/// section's `row` equals its index.
#[instrument(skip_all, fields(sections = sections.len()))]
pub fn resolve(sections: &mut [Section]) -> Hierarchy {
    let mut last_at_depth: [Option<usize>; MAX_SECTION_DEPTH as usize + 1] =
        [None; MAX_SECTION_DEPTH as usize + 1];
    let mut hierarchy = Hierarchy {
        children: vec![Vec::new(); sections.len()],
        ..Hierarchy::default()
    };

    for section in sections.iter_mut() {
        let depth = usize::from(section.depth.clamp(1, MAX_SECTION_DEPTH));
        section.parent_row = match depth {
            1 => None,
            d => last_at_depth[d - 1],
        };
        last_at_depth[depth] = Some(section.row);

        match section.parent_row {
            Some(parent) => {
                if let Some(siblings) = hierarchy.children.get_mut(parent) {
                    siblings.push(section.row);
                }
            }
            None if section.depth == 1 => hierarchy.roots.push(section.row),
            None => {
                debug!(row = section.row, depth = section.depth, title = %section.title, "orphan section");
                hierarchy.orphans.push(section.row);
            }
        }
    }

    hierarchy
}
