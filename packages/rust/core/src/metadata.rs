//! Metadata payload decoding.
//!
//! Each [`MetadataFormat`] has exactly one parser. Every payload decodes into
//! a `serde_json::Value` so the tree has a single value model whatever format
//! a section declared.

use serde_json::{Map, Number, Value};
use tracing::instrument;

use pipedoc_shared::{MetadataDecodeError, MetadataFormat, Section};

/// Decode `raw` as `format` on behalf of `section`.
#[instrument(skip(section, raw), fields(title = %section.title, depth = section.depth))]
pub fn decode_metadata(
    section: &Section,
    format: MetadataFormat,
    raw: &str,
) -> Result<Value, MetadataDecodeError> {
    decode_value(format, raw).map_err(|message| MetadataDecodeError {
        title: section.title.clone(),
        depth: section.depth,
        format,
        message,
    })
}

/// Decode `raw` with the parser for `format`.
pub fn decode_value(format: MetadataFormat, raw: &str) -> Result<Value, String> {
    match format {
        MetadataFormat::Yaml => serde_yaml::from_str(raw).map_err(|e| e.to_string()),
        MetadataFormat::Json => serde_json::from_str(raw).map_err(|e| e.to_string()),
        MetadataFormat::Toml => raw
            .parse::<toml::Table>()
            .map(|table| toml_to_json(toml::Value::Table(table)))
            .map_err(|e| e.to_string()),
    }
}

/// Convert a TOML value, rendering datetimes as their TOML text.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect::<Map<String, Value>>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn section(title: &str, depth: u8) -> Section {
        Section {
            row: 0,
            depth,
            title: title.into(),
            body: String::new(),
            lead: String::new(),
            parent_row: None,
        }
    }

    #[test]
    fn yaml_payload_uses_yaml_grammar() {
        let value = decode_value(MetadataFormat::Yaml, "x: 1\nitems:\n  - a\n  - b\n").unwrap();
        assert_eq!(value, json!({"x": 1, "items": ["a", "b"]}));
    }

    #[test]
    fn json_payload_uses_json_grammar() {
        let value = decode_value(MetadataFormat::Json, r#"{"x": 1, "ok": true}"#).unwrap();
        assert_eq!(value, json!({"x": 1, "ok": true}));
    }

    #[test]
    fn toml_payload_uses_toml_grammar() {
        // Not valid JSON: a JSON decoder on this path would fail.
        let value = decode_value(MetadataFormat::Toml, "x = 1\n[db]\nname = \"main\"\n").unwrap();
        assert_eq!(value, json!({"x": 1, "db": {"name": "main"}}));
    }

    #[test]
    fn json_is_not_decoded_as_toml() {
        assert!(decode_value(MetadataFormat::Toml, r#"{"x": 1}"#).is_err());
    }

    #[test]
    fn toml_datetimes_become_strings() {
        let value = decode_value(MetadataFormat::Toml, "since = 2024-01-15\n").unwrap();
        assert_eq!(value, json!({"since": "2024-01-15"}));
    }

    #[test]
    fn yaml_scalar_payload_is_kept() {
        assert_eq!(decode_value(MetadataFormat::Yaml, "42").unwrap(), json!(42));
    }

    #[test]
    fn failure_carries_section_title_and_depth() {
        let err = decode_metadata(&section("sales", 2), MetadataFormat::Json, "{not json")
            .unwrap_err();
        assert_eq!(err.title, "sales");
        assert_eq!(err.depth, 2);
        assert_eq!(err.format, MetadataFormat::Json);
        assert!(!err.message.is_empty());
    }

    fn keys(value: &Value) -> Vec<&str> {
        value
            .as_object()
            .expect("mapping payload")
            .keys()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn yaml_keys_keep_document_order() {
        let value = decode_value(MetadataFormat::Yaml, "zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        assert_eq!(keys(&value), vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"zeta":1,"alpha":2,"mid":3}"#
        );
    }

    #[test]
    fn json_keys_keep_document_order() {
        let value = decode_value(MetadataFormat::Json, r#"{"zeta": 1, "alpha": {"z": 1, "a": 2}}"#)
            .unwrap();
        assert_eq!(keys(&value), vec!["zeta", "alpha"]);
        assert_eq!(keys(&value["alpha"]), vec!["z", "a"]);
    }

    #[test]
    fn toml_keys_keep_document_order() {
        let value = decode_value(
            MetadataFormat::Toml,
            "zeta = 1\nalpha = 2\n[mid]\ny = 1\nb = 2\n",
        )
        .unwrap();
        assert_eq!(keys(&value), vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"zeta":1,"alpha":2,"mid":{"y":1,"b":2}}"#
        );
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        assert!(decode_value(MetadataFormat::Yaml, "key: [unclosed\n").is_err());
    }
}
