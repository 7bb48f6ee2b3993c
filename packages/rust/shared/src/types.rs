//! Core domain types for compiled pipeline documents.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::MetadataDecodeError;

/// Key under which a branch node lists its child titles in serialized output.
pub const ORDER_KEY: &str = "__order";

/// Key under which a node's decoded metadata payload is serialized.
pub const METADATA_KEY: &str = "metadata";

/// Deepest heading level that opens a section.
pub const MAX_SECTION_DEPTH: u8 = 3;

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// One heading of the source document together with the text it governs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Position in document order (0-based, strictly increasing).
    pub row: usize,
    /// Heading depth: 1 (top), 2 (mid) or 3 (leaf).
    pub depth: u8,
    /// Heading text without markers.
    pub title: String,
    /// Everything after the heading up to the next heading of depth <= this one.
    pub body: String,
    /// Prefix of `body` that precedes the first nested heading.
    pub lead: String,
    /// Row of the nearest preceding section exactly one level shallower.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_row: Option<usize>,
}

impl Section {
    /// A depth-2 or depth-3 section with no qualifying ancestor.
    pub fn is_orphan(&self) -> bool {
        self.depth > 1 && self.parent_row.is_none()
    }
}

// ---------------------------------------------------------------------------
// CodeFragment
// ---------------------------------------------------------------------------

/// A fenced code block found in a section's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeFragment {
    /// Leading token of the fence info string, if any.
    pub language: Option<String>,
    /// Whole info string after the fence marker, trimmed.
    pub info_string: String,
    /// Raw text between the fences.
    pub code: String,
}

// ---------------------------------------------------------------------------
// MetadataFormat
// ---------------------------------------------------------------------------

/// Serialization formats accepted for a section's metadata payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataFormat {
    Yaml,
    Json,
    Toml,
}

impl MetadataFormat {
    /// Map a fence language tag to a format. Tags are matched exactly.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

impl std::fmt::Display for MetadataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

/// A named code fragment stored on a config node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Fence language tag, if any.
    pub language: Option<String>,
    /// Code with any self-naming comment removed.
    pub code: String,
}

impl Serialize for Artifact {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code)
    }
}

// ---------------------------------------------------------------------------
// ConfigNode
// ---------------------------------------------------------------------------

/// A node of the compiled configuration tree.
///
/// The root sits at depth 0; depth-1 and depth-2 nodes are branches that list
/// their children in `order`; depth-3 nodes are leaves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigNode {
    /// Depth of the section this node was built from (0 for the root).
    pub depth: u8,
    /// Child titles in document order. Duplicated titles stay listed twice.
    pub order: Vec<String>,
    /// Child nodes by title; a repeated title keeps the later node.
    pub children: HashMap<String, ConfigNode>,
    /// Decoded metadata payload.
    pub metadata: Option<serde_json::Value>,
    /// Named artifacts in first-insertion order; a repeated name keeps the later code.
    pub artifacts: IndexMap<String, Artifact>,
}

impl ConfigNode {
    /// Empty root node.
    pub fn root() -> Self {
        Self::at_depth(0)
    }

    /// Empty node for a section of the given depth.
    pub fn at_depth(depth: u8) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    /// Whether this node lists children (root, depth 1 and depth 2).
    pub fn is_branch(&self) -> bool {
        self.depth < MAX_SECTION_DEPTH
    }

    /// Append `title` to `order` and store `node` under it.
    pub fn push_child(&mut self, title: impl Into<String>, node: ConfigNode) {
        let title = title.into();
        self.order.push(title.clone());
        self.children.insert(title, node);
    }

    /// Look up a direct child by title.
    pub fn child(&self, title: &str) -> Option<&ConfigNode> {
        self.children.get(title)
    }

    /// Mutable lookup of a direct child by title.
    pub fn child_mut(&mut self, title: &str) -> Option<&mut ConfigNode> {
        self.children.get_mut(title)
    }

    /// Follow a path of titles from this node.
    pub fn path(&self, titles: &[&str]) -> Option<&ConfigNode> {
        titles
            .iter()
            .try_fold(self, |node, title| node.child(title))
    }

    /// Code of the artifact named `name`.
    pub fn code(&self, name: &str) -> Option<&str> {
        self.artifacts.get(name).map(|a| a.code.as_str())
    }

    /// Store an artifact, replacing the code of an earlier one with the same name.
    pub fn insert_artifact(&mut self, name: impl Into<String>, artifact: Artifact) {
        self.artifacts.insert(name.into(), artifact);
    }

    /// Render as JSON, two-space indented when `pretty`.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

impl Serialize for ConfigNode {
    /// Serialized keys, in order: `__order`, `metadata`, artifacts, children.
    /// A child title shadows a same-named artifact or the metadata key.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        if self.is_branch() {
            map.serialize_entry(ORDER_KEY, &self.order)?;
        }

        let shadowed = |key: &str| key == ORDER_KEY || self.children.contains_key(key);

        if let Some(metadata) = &self.metadata {
            if !shadowed(METADATA_KEY) {
                map.serialize_entry(METADATA_KEY, metadata)?;
            }
        }

        for (name, artifact) in &self.artifacts {
            if shadowed(name) || (name == METADATA_KEY && self.metadata.is_some()) {
                continue;
            }
            map.serialize_entry(name, artifact)?;
        }

        let mut emitted: Vec<&str> = Vec::with_capacity(self.order.len());
        for title in &self.order {
            if emitted.contains(&title.as_str()) || title == ORDER_KEY {
                continue;
            }
            if let Some(child) = self.children.get(title) {
                map.serialize_entry(title, child)?;
                emitted.push(title);
            }
        }

        map.end()
    }
}

// ---------------------------------------------------------------------------
// CompileIssue
// ---------------------------------------------------------------------------

/// A recovered metadata failure recorded during assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileIssue {
    /// The decode failure itself.
    pub error: MetadataDecodeError,
    /// Titles of the sections that were not assembled because of it.
    pub skipped: Vec<String>,
}

impl std::fmt::Display for CompileIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)?;
        if !self.skipped.is_empty() {
            write!(f, " (skipped: {})", self.skipped.join(", "))?;
        }
        Ok(())
    }
}
