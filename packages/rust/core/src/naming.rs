//! Artifact name resolution.
//!
//! An `sql` fragment whose first line is a self-naming comment (`-- name`)
//! takes that name and loses the line. Any other fragment is named by its
//! info string minus the language token.

use std::sync::LazyLock;

use regex::Regex;

use pipedoc_shared::{Artifact, CodeFragment};

/// Language whose fragments may name themselves.
const SELF_NAMING_LANGUAGE: &str = "sql";

/// Matches a self-naming comment at the start of the first line.
static SELF_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--[ \t]*([A-Za-z0-9_]+)").expect("self-name regex"));

/// Resolve the artifact name and stored code for `fragment`.
///
/// Returns `None` when the resolved name is empty; such fragments are not
/// addressable and are dropped by the caller.
pub fn resolve_name(fragment: &CodeFragment) -> Option<(String, Artifact)> {
    if let Some((name, code)) = self_named(fragment) {
        return Some((
            name,
            Artifact {
                language: fragment.language.clone(),
                code,
            },
        ));
    }

    let name = match fragment.language.as_deref() {
        Some(language) => fragment.info_string.replacen(language, "", 1),
        None => fragment.info_string.clone(),
    };
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    Some((
        name.to_string(),
        Artifact {
            language: fragment.language.clone(),
            code: fragment.code.clone(),
        },
    ))
}

/// Name and remaining code of an `sql` fragment that opens with `-- name`.
fn self_named(fragment: &CodeFragment) -> Option<(String, String)> {
    if fragment.language.as_deref() != Some(SELF_NAMING_LANGUAGE) {
        return None;
    }

    let (first_line, rest) = fragment
        .code
        .split_once('\n')
        .unwrap_or((fragment.code.as_str(), ""));
    let caps = SELF_NAME_RE.captures(first_line)?;

    Some((caps[1].to_string(), rest.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(language: Option<&str>, info: &str, code: &str) -> CodeFragment {
        CodeFragment {
            language: language.map(str::to_string),
            info_string: info.to_string(),
            code: code.to_string(),
        }
    }

    #[test]
    fn sql_comment_names_fragment_and_is_stripped() {
        let (name, artifact) =
            resolve_name(&fragment(Some("sql"), "sql", "-- q1\nSELECT 1")).unwrap();
        assert_eq!(name, "q1");
        assert_eq!(artifact.code, "SELECT 1");
        assert_eq!(artifact.language.as_deref(), Some("sql"));
    }

    #[test]
    fn comment_without_space_still_names() {
        let (name, artifact) =
            resolve_name(&fragment(Some("sql"), "sql", "--load_all\nSELECT *\nFROM t")).unwrap();
        assert_eq!(name, "load_all");
        assert_eq!(artifact.code, "SELECT *\nFROM t");
    }

    #[test]
    fn self_naming_comment_beats_info_string() {
        let (name, _) =
            resolve_name(&fragment(Some("sql"), "sql from_info", "-- from_comment\nSELECT 1"))
                .unwrap();
        assert_eq!(name, "from_comment");
    }

    #[test]
    fn comment_only_fragment_keeps_empty_code() {
        let (name, artifact) = resolve_name(&fragment(Some("sql"), "sql", "-- q")).unwrap();
        assert_eq!(name, "q");
        assert_eq!(artifact.code, "");
    }

    #[test]
    fn info_string_names_other_languages() {
        let (name, artifact) =
            resolve_name(&fragment(Some("python"), "python foo", "print(1)")).unwrap();
        assert_eq!(name, "foo");
        assert_eq!(artifact.code, "print(1)");
    }

    #[test]
    fn sql_without_comment_falls_back_to_info_string() {
        let (name, artifact) =
            resolve_name(&fragment(Some("sql"), "sql load_customers", "SELECT 1")).unwrap();
        assert_eq!(name, "load_customers");
        assert_eq!(artifact.code, "SELECT 1");
    }

    #[test]
    fn comment_on_later_line_does_not_name() {
        let resolved = resolve_name(&fragment(Some("sql"), "sql", "SELECT 1\n-- q\n"));
        assert!(resolved.is_none());
    }

    #[test]
    fn python_comment_is_not_self_naming() {
        let resolved = resolve_name(&fragment(Some("python"), "python", "-- q\nprint(1)"));
        assert!(resolved.is_none());
    }

    #[test]
    fn empty_names_are_dropped() {
        assert!(resolve_name(&fragment(Some("python"), "python", "x")).is_none());
        assert!(resolve_name(&fragment(None, "", "x")).is_none());
        assert!(resolve_name(&fragment(Some("sh"), "sh   ", "ls")).is_none());
    }
}
