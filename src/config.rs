//! Building a `RuntimeValues` environment from a JSON file and from `NAME=VALUE` pairs.
//!
//! The JSON file holds one object. A member is either a plain string or an object naming
//! the kind of value:
//!
//! ```json
//! { "product": "writer", "version": { "version": "16.4.3528" }, "market": { "regex": "^en-" } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{XppError, XppResult};
use crate::runtime::{RuntimeValues, Value};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ValueEntry {
    Text(String),
    Version { version: String },
    Regex { regex: String },
}

impl ValueEntry {
    fn add_to(self, values: &mut RuntimeValues, name: &str) -> XppResult<()> {
        match self {
            ValueEntry::Text(text) => values.add_str(name, text),
            ValueEntry::Version { version } => values.add_version(name, &version),
            ValueEntry::Regex { regex } => {
                let value = Value::regex(&regex)
                    .map_err(|e| XppError::config(format!("invalid regular expression for '{}': {}", name, e)))?;
                values.add(name, value)
            }
        }
    }
}

/// Parses JSON text into runtime values.
pub fn values_from_json(content: &str) -> XppResult<RuntimeValues> {
    let entries: BTreeMap<String, ValueEntry> =
        serde_json::from_str(content).map_err(|e| XppError::config(format!("cannot parse values: {}", e)))?;

    let mut values = RuntimeValues::new();
    for (name, entry) in entries {
        entry.add_to(&mut values, &name)?;
    }
    Ok(values)
}

/// Reads runtime values from a JSON file.
pub fn values_from_json_file<P: AsRef<Path>>(path: P) -> XppResult<RuntimeValues> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| XppError::config(format!("cannot read {}: {}", path.display(), e)))?;

    let values = values_from_json(&content).map_err(|e| match e {
        XppError::Config(message) => XppError::config(format!("{}: {}", path.display(), message)),
        other => other,
    })?;
    debug!(path = %path.display(), count = values.len(), "loaded runtime values");
    Ok(values)
}

/// Splits a `NAME=VALUE` pair at the first '='.
pub fn parse_assignment(text: &str) -> XppResult<(String, String)> {
    match text.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_string(), value.to_string())),
        _ => Err(XppError::config(format!("expected NAME=VALUE, got '{}'", text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_values_from_json() {
        let values = values_from_json(
            r#"{ "product": "writer", "version": { "version": "16.4.3528" }, "market": { "regex": "^en-" } }"#,
        )
        .unwrap();

        assert_eq!(values.len(), 3);
        assert_eq!(values.get("product"), Some(&Value::Str("writer".to_string())));
        assert_eq!(values.get("version"), Some(&Value::Version("16.4.3528".parse().unwrap())));
        assert!(matches!(values.get("market"), Some(Value::Regex(r)) if r.is_match("EN-gb")));
    }

    #[test]
    fn test_invalid_json_values() {
        let cases = vec![
            "[]",
            "{ \"a\": 1 }",
            "{ \"a\": { \"version\": \"1\" } }",
            "{ \"a\": { \"regex\": \"(\" } }",
            "{ \"1a\": \"x\" }",
            "{ \"a\": { \"other\": \"x\" } }",
            "not json",
        ];

        for case in cases {
            let result = values_from_json(case);
            assert!(matches!(result, Err(XppError::Config(_))), "Expected failure for {:?}, got {:?}", case, result);
        }
    }

    #[test]
    fn test_values_from_json_file() {
        let path = std::env::temp_dir().join(format!("xpp-values-{}.json", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{ "product": "writer" }}"#).unwrap();
        drop(file);

        let values = values_from_json_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(values.get("product"), Some(&Value::Str("writer".to_string())));
        assert!(values_from_json_file(&path).is_err());
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("a=b").unwrap(), ("a".to_string(), "b".to_string()));
        assert_eq!(parse_assignment("a=b=c").unwrap(), ("a".to_string(), "b=c".to_string()));
        assert_eq!(parse_assignment("a=").unwrap(), ("a".to_string(), "".to_string()));
        for case in ["a", "=b", ""] {
            assert!(parse_assignment(case).is_err(), "Expected failure for {:?}", case);
        }
    }
}
