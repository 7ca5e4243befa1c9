//! Raw generator documents as uploaded by users
//!
//! A document is untrusted input. It is parsed here and handed to
//! [`crate::compiler`], which validates it and builds the samplers. Nothing in
//! this module outlives a compile.
//!
//! ```yaml
//! version: 1
//! generators:
//!   - name: colors
//!     type: unweighted
//!     entries: [red, blue]
//!   - name: loot
//!     type: weighted
//!     entries:
//!       - [gold, 0.75]
//!       - [sword, 0.25]
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::ParseError;

/// The only document version this crate understands.
pub const CURRENT_VERSION: i64 = 1;

fn default_version() -> i64 {
    CURRENT_VERSION
}

/// Top-level generator document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default = "default_version")]
    pub version: i64,
    #[serde(default)]
    pub generators: Vec<GeneratorSpec>,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            generators: Vec::new(),
        }
    }
}

impl ConfigDocument {
    pub fn new(generators: Vec<GeneratorSpec>) -> Self {
        Self {
            version: CURRENT_VERSION,
            generators,
        }
    }

    /// Parse YAML (or JSON) text.
    pub fn from_yaml_str(text: &str) -> Result<Self, ParseError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
        Ok(serde_yaml::from_slice(bytes)?)
    }

    pub fn to_yaml_string(&self) -> Result<String, ParseError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// One generator as declared in a document.
///
/// `kind` stays a plain string so that unknown kinds reach the compiler
/// instead of failing the parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSpec {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub entries: Vec<Value>,
}

impl GeneratorSpec {
    pub fn unweighted<S: Into<String>>(name: S, entries: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: GeneratorKind::Unweighted.as_str().to_string(),
            entries: entries
                .iter()
                .map(|e| Value::String((*e).to_string()))
                .collect(),
        }
    }

    pub fn weighted<S: Into<String>>(name: S, entries: &[(&str, f64)]) -> Self {
        Self {
            name: name.into(),
            kind: GeneratorKind::Weighted.as_str().to_string(),
            entries: entries
                .iter()
                .map(|(value, weight)| {
                    Value::Sequence(vec![
                        Value::String((*value).to_string()),
                        Value::Number((*weight).into()),
                    ])
                })
                .collect(),
        }
    }
}

/// Recognized generator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    Weighted,
    Unweighted,
}

impl GeneratorKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "weighted" => Some(GeneratorKind::Weighted),
            "unweighted" => Some(GeneratorKind::Unweighted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorKind::Weighted => "weighted",
            GeneratorKind::Unweighted => "unweighted",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw entry resolved against its generator's declared kind.
#[derive(Debug, Clone, PartialEq)]
pub enum EntrySpec {
    Unweighted(String),
    Weighted(String, f64),
}

impl EntrySpec {
    /// Resolve one raw entry. The error is a human-readable reason.
    pub fn resolve(kind: GeneratorKind, raw: &Value) -> Result<Self, String> {
        match kind {
            GeneratorKind::Unweighted => match raw {
                Value::String(s) => Ok(EntrySpec::Unweighted(s.clone())),
                other => Err(format!(
                    "expected a string, found {}",
                    describe(other)
                )),
            },
            GeneratorKind::Weighted => {
                let Value::Sequence(pair) = raw else {
                    return Err(format!(
                        "expected a [value, weight] pair, found {}",
                        describe(raw)
                    ));
                };
                match pair.as_slice() {
                    [Value::String(value), Value::Number(weight)] => {
                        // Every YAML number is representable as f64.
                        let weight = weight.as_f64().unwrap_or(f64::NAN);
                        Ok(EntrySpec::Weighted(value.clone(), weight))
                    }
                    [first, second] => Err(format!(
                        "expected a [string, number] pair, found [{}, {}]",
                        describe(first),
                        describe(second)
                    )),
                    items => Err(format!(
                        "expected a [value, weight] pair, found a list of {} items",
                        items.len()
                    )),
                }
            }
        }
    }

    pub fn value(&self) -> &str {
        match self {
            EntrySpec::Unweighted(value) | EntrySpec::Weighted(value, _) => value,
        }
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_document() {
        let doc = ConfigDocument::from_yaml_str(
            r#"
version: 1
generators:
  - name: colors
    type: unweighted
    entries: [red, blue]
  - name: loot
    type: weighted
    entries:
      - [gold, 0.75]
      - [sword, 1]
"#,
        )
        .unwrap();

        assert_eq!(doc.version, 1);
        assert_eq!(doc.generators.len(), 2);
        assert_eq!(doc.generators[0], GeneratorSpec::unweighted("colors", &["red", "blue"]));
        assert_eq!(doc.generators[1].kind, "weighted");
        assert_eq!(doc.generators[1].entries.len(), 2);
    }

    #[test]
    fn test_parse_defaults() {
        let doc = ConfigDocument::from_yaml_str("generators:\n  - name: x\n").unwrap();
        assert_eq!(doc.version, CURRENT_VERSION);
        assert_eq!(doc.generators[0].kind, "");
        assert!(doc.generators[0].entries.is_empty());
    }

    #[test]
    fn test_parse_bytes() {
        let bytes = b"generators:\n  - name: c\n    type: unweighted\n    entries: [a]\n";
        let doc = ConfigDocument::from_slice(bytes).unwrap();
        assert_eq!(doc.generators, vec![GeneratorSpec::unweighted("c", &["a"])]);
        assert!(ConfigDocument::from_slice(b"generators: [").is_err());
    }

    #[test]
    fn test_parse_json() {
        let doc = ConfigDocument::from_yaml_str(
            r#"{"version": 1, "generators": [{"name": "c", "type": "unweighted", "entries": ["a"]}]}"#,
        )
        .unwrap();
        assert_eq!(doc.generators[0].name, "c");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ConfigDocument::from_yaml_str("generators: [").is_err());
        assert!(ConfigDocument::from_yaml_str("generators: 5").is_err());
        assert!(ConfigDocument::from_yaml_str("version: one").is_err());
    }

    #[test]
    fn test_yaml_round_trip_keeps_type_key() {
        let doc = ConfigDocument::new(vec![GeneratorSpec::weighted("w", &[("a", 0.5)])]);
        let text = doc.to_yaml_string().unwrap();
        assert!(text.contains("type: weighted"));
        assert_eq!(ConfigDocument::from_yaml_str(&text).unwrap(), doc);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(GeneratorKind::parse("weighted"), Some(GeneratorKind::Weighted));
        assert_eq!(GeneratorKind::parse("unweighted"), Some(GeneratorKind::Unweighted));
        assert_eq!(GeneratorKind::parse("Weighted"), None);
        assert_eq!(GeneratorKind::parse(""), None);
    }

    #[test]
    fn test_resolve_entries() {
        let raw: Value = serde_yaml::from_str("[gold, 2.5]").unwrap();
        assert_eq!(
            EntrySpec::resolve(GeneratorKind::Weighted, &raw),
            Ok(EntrySpec::Weighted("gold".to_string(), 2.5))
        );

        let raw: Value = serde_yaml::from_str("red").unwrap();
        assert_eq!(
            EntrySpec::resolve(GeneratorKind::Unweighted, &raw),
            Ok(EntrySpec::Unweighted("red".to_string()))
        );
    }

    #[test]
    fn test_resolve_shape_mismatch() {
        let bare: Value = serde_yaml::from_str("red").unwrap();
        let err = EntrySpec::resolve(GeneratorKind::Weighted, &bare).unwrap_err();
        assert!(err.contains("found a string"), "{}", err);

        let pair: Value = serde_yaml::from_str("[red, 1]").unwrap();
        let err = EntrySpec::resolve(GeneratorKind::Unweighted, &pair).unwrap_err();
        assert!(err.contains("found a list"), "{}", err);

        let triple: Value = serde_yaml::from_str("[red, 1, 2]").unwrap();
        let err = EntrySpec::resolve(GeneratorKind::Weighted, &triple).unwrap_err();
        assert!(err.contains("3 items"), "{}", err);

        let swapped: Value = serde_yaml::from_str("[1, red]").unwrap();
        let err = EntrySpec::resolve(GeneratorKind::Weighted, &swapped).unwrap_err();
        assert!(err.contains("[a number, a string]"), "{}", err);
    }
}
