//! JSON and YAML document codec.
//!
//! Documents are handled as `serde_json::Value` regardless of their on-disk
//! format; YAML is converted to and from that model through `yaml-rust2`.

use std::path::Path;

use serde_json::{Map, Number, Value};
use yaml_rust2::yaml::Hash;
use yaml_rust2::{Yaml, YamlEmitter, YamlLoader};

use crate::application::{ApplicationError, ApplicationResult};

/// On-disk format of a document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> ApplicationResult<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            _ => Err(ApplicationError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Parses `content`; an empty YAML stream yields `Value::Null`.
    pub fn parse(&self, content: &str, path: &Path) -> ApplicationResult<Value> {
        let parse_error = |message: String| ApplicationError::DocumentParse {
            path: path.to_path_buf(),
            message,
        };
        match self {
            Self::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
            Self::Yaml => {
                let docs = YamlLoader::load_from_str(content).map_err(|e| parse_error(e.to_string()))?;
                Ok(docs.first().map_or(Value::Null, yaml_to_json))
            }
        }
    }

    pub fn emit(&self, value: &Value) -> ApplicationResult<String> {
        let emit_error = |message: String| ApplicationError::OperationFailed {
            context: "serialize document".to_string(),
            source: message.into(),
        };
        match self {
            Self::Json => {
                let mut out = serde_json::to_string_pretty(value).map_err(|e| emit_error(e.to_string()))?;
                out.push('\n');
                Ok(out)
            }
            Self::Yaml => {
                let mut out = String::new();
                YamlEmitter::new(&mut out)
                    .dump(&json_to_yaml(value))
                    .map_err(|e| emit_error(e.to_string()))?;
                out.push('\n');
                Ok(out)
            }
        }
    }
}

/// Parses a document whose top level maps root names to records.
///
/// An empty document counts as an empty mapping.
pub fn parse_top_level(path: &Path, content: &str) -> ApplicationResult<Map<String, Value>> {
    match DocumentFormat::from_path(path)?.parse(content, path)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(ApplicationError::DocumentParse {
            path: path.to_path_buf(),
            message: format!("top level must be a mapping, found {}", kind(&other)),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

pub fn yaml_to_json(yaml: &Yaml) -> Value {
    match yaml {
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Integer(i) => Value::Number((*i).into()),
        Yaml::Real(_) => yaml
            .as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number),
        Yaml::Boolean(b) => Value::Bool(*b),
        Yaml::Array(items) => Value::Array(items.iter().map(yaml_to_json).collect()),
        Yaml::Hash(hash) => Value::Object(
            hash.iter()
                .filter_map(|(k, v)| yaml_scalar_to_string(k).map(|k| (k, yaml_to_json(v))))
                .collect(),
        ),
        Yaml::Null | Yaml::Alias(_) | Yaml::BadValue => Value::Null,
    }
}

/// String form of a scalar, None for collections and null.
pub fn yaml_scalar_to_string(yaml: &Yaml) -> Option<String> {
    match yaml {
        Yaml::String(s) | Yaml::Real(s) => Some(s.clone()),
        Yaml::Integer(i) => Some(i.to_string()),
        Yaml::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn json_to_yaml(value: &Value) -> Yaml {
    match value {
        Value::Null => Yaml::Null,
        Value::Bool(b) => Yaml::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Yaml::Integer(i),
            None => Yaml::Real(n.to_string()),
        },
        Value::String(s) => Yaml::String(s.clone()),
        Value::Array(items) => Yaml::Array(items.iter().map(json_to_yaml).collect()),
        Value::Object(map) => {
            let mut hash = Hash::new();
            for (k, v) in map {
                hash.insert(Yaml::String(k.clone()), json_to_yaml(v));
            }
            Yaml::Hash(hash)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use std::path::PathBuf;

    #[rstest]
    #[case("tree.json", DocumentFormat::Json)]
    #[case("tree.yaml", DocumentFormat::Yaml)]
    #[case("tree.YML", DocumentFormat::Yaml)]
    fn given_known_extension_when_detecting_format_then_matches(
        #[case] file: &str,
        #[case] expected: DocumentFormat,
    ) {
        assert_eq!(DocumentFormat::from_path(Path::new(file)).unwrap(), expected);
    }

    #[test]
    fn given_unknown_extension_when_detecting_format_then_unsupported() {
        let result = DocumentFormat::from_path(Path::new("tree.toml"));

        assert!(matches!(result, Err(ApplicationError::UnsupportedFormat(_))));
    }

    #[test]
    fn given_yaml_mapping_when_parsing_then_keeps_key_order() {
        let content = "zeta:\n  name: z\nalpha:\n  name: a\n  tags: [x, 2]\n";

        let map = parse_top_level(Path::new("doc.yaml"), content).unwrap();

        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(map["alpha"], json!({"name": "a", "tags": ["x", 2]}));
    }

    #[test]
    fn given_invalid_json_when_parsing_then_document_parse_error() {
        let result = parse_top_level(Path::new("doc.json"), "{ \"root\": ");

        assert!(matches!(result, Err(ApplicationError::DocumentParse { .. })));
    }

    #[test]
    fn given_sequence_document_when_parsing_top_level_then_rejected() {
        let result = parse_top_level(Path::new("doc.yaml"), "- a\n- b\n");

        assert!(matches!(result, Err(ApplicationError::DocumentParse { .. })));
    }

    #[test]
    fn given_empty_yaml_when_parsing_top_level_then_empty_mapping() {
        let map = parse_top_level(&PathBuf::from("doc.yml"), "").unwrap();

        assert!(map.is_empty());
    }

    #[test]
    fn given_nested_value_when_emitting_yaml_then_parses_back_equal() {
        let value = json!({"root": {"name": "docs", "description": "a: b", "tags": [], "children": []}});

        let yaml = DocumentFormat::Yaml.emit(&value).unwrap();
        let parsed = DocumentFormat::Yaml.parse(&yaml, Path::new("doc.yaml")).unwrap();

        assert_eq!(parsed, value);
    }
}
