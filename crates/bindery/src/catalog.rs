//! Action catalogs loaded from YAML or JSON.
//!
//! A catalog declares actions as data instead of code:
//!
//! ```yaml
//! program: files
//! notation: switch
//! actions:
//!   - name: copy
//!     description: Copies a file
//!     parameters:
//!       - name: source
//!         type: string
//!         required: true
//!         description: file to copy
//!       - name: overwrite
//!         type: bool
//!         optional: { default: false, alt_names: [o] }
//! ```
//!
//! Parameter types use the spelling accepted by
//! [`ValueType::from_str`](crate::ValueType). Defaults are YAML/JSON scalars
//! (or lists of scalars) and go through the same validation as defaults
//! declared in code.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::action::{ActionDescriptor, Marker, ParameterDescriptor};
use crate::dispatch::Settings;
use crate::error::CatalogError;
use crate::notation::Notation;
use crate::types::ValueType;
use crate::value::Value;

/// A deserialized action catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub notation: Option<Notation>,
    #[serde(default)]
    pub actions: Vec<CatalogAction>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogAction {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<CatalogParameter>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: String,
    /// Adds a Required marker.
    #[serde(default)]
    pub required: bool,
    /// Adds an Optional marker.
    #[serde(default)]
    pub optional: Option<CatalogOptional>,
    #[serde(default)]
    pub description: String,
    /// Native default: optional without alternative names.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogOptional {
    #[serde(default)]
    pub default: serde_json::Value,
    #[serde(default)]
    pub alt_names: Vec<String>,
}

impl Catalog {
    pub fn from_yaml_str(source: &str) -> Result<Self, CatalogError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Reads a catalog file, choosing the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let read = || {
            fs::read_to_string(path).map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str(&read()?),
            Some("json") => Self::from_json_str(&read()?),
            _ => Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Program name and notation declared by the catalog, over `base`.
    pub fn apply_settings(&self, mut base: Settings) -> Settings {
        if let Some(program) = &self.program {
            base.program = Some(program.clone());
        }
        if let Some(notation) = self.notation {
            base.notation = notation;
        }
        base
    }

    /// Converts the catalog into descriptors, in declaration order.
    pub fn descriptors(&self) -> Result<Vec<ActionDescriptor>, CatalogError> {
        self.actions.iter().map(CatalogAction::descriptor).collect()
    }
}

impl CatalogAction {
    fn descriptor(&self) -> Result<ActionDescriptor, CatalogError> {
        let parameters = self
            .parameters
            .iter()
            .map(|p| p.descriptor(&self.name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ActionDescriptor::new(&self.name)
            .description(&self.description)
            .parameters(parameters))
    }
}

impl CatalogParameter {
    fn descriptor(&self, action: &str) -> Result<ParameterDescriptor, CatalogError> {
        let value_type: ValueType = match self.value_type.parse() {
            Ok(ty) => ty,
            Err(never) => match never {},
        };
        let to_value = |raw: &serde_json::Value| {
            default_value(raw, &value_type).ok_or_else(|| CatalogError::InvalidDefault {
                param: self.name.clone(),
                action: action.to_string(),
            })
        };

        let mut markers = Vec::new();
        if self.required {
            markers.push(Marker::Required {
                description: self.description.clone(),
            });
        }
        if let Some(optional) = &self.optional {
            markers.push(Marker::Optional {
                default: to_value(&optional.default)?,
                alt_names: optional.alt_names.clone(),
                description: self.description.clone(),
            });
        }
        if markers.is_empty() && !self.description.is_empty() && self.default.is_none() {
            markers.push(Marker::Required {
                description: self.description.clone(),
            });
        }

        let mut param = ParameterDescriptor::new(&self.name, value_type.clone());
        param.markers = markers;
        param.native_default = self.default.as_ref().map(to_value).transpose()?;
        Ok(param)
    }
}

/// Maps a YAML/JSON scalar onto a [`Value`], guided by the declared type.
///
/// Numbers become the declared numeric kind where it fits; strings naming an
/// enum variant or a single character become those. Anything else keeps its
/// natural kind and is left for the validator to judge.
fn default_value(raw: &serde_json::Value, ty: &ValueType) -> Option<Value> {
    use serde_json::Value as Json;

    let ty = match ty {
        ValueType::Nullable(inner) => inner.as_ref(),
        other => other,
    };
    Some(match raw {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match ty {
            ValueType::Long => n.as_i64().map_or_else(|| float(n), Value::Long),
            ValueType::Float => Value::Float(n.as_f64()?),
            ValueType::Decimal => Value::Decimal(n.as_f64()?),
            _ => match n.as_i64() {
                Some(i) => i32::try_from(i).map_or(Value::Long(i), Value::Int),
                None => float(n),
            },
        },
        Json::String(s) => match ty {
            ValueType::Enum(variants) if variants.contains(s) => Value::Enum(s.clone()),
            ValueType::Char if s.chars().count() == 1 => Value::Char(s.chars().next()?),
            _ => Value::Str(s.clone()),
        },
        Json::Array(items) => {
            let strings: Option<Vec<String>> =
                items.iter().map(|i| i.as_str().map(String::from)).collect();
            let ints: Option<Vec<i32>> = items
                .iter()
                .map(|i| i.as_i64().and_then(|n| i32::try_from(n).ok()))
                .collect();
            match (ty, strings, ints) {
                (ValueType::IntArray, _, Some(ints)) => Value::IntArray(ints),
                (_, Some(strings), _) => Value::StrArray(strings),
                (_, None, ints) => Value::IntArray(ints?),
            }
        }
        Json::Object(_) => return None,
    })
}

fn float(n: &serde_json::Number) -> Value {
    n.as_f64().map_or(Value::Null, Value::Float)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const YAML: &str = r#"
program: files
notation: positional
actions:
  - name: copy
    description: Copies a file
    parameters:
      - name: source
        type: string
        required: true
        description: file to copy
      - name: count
        type: int
      - name: overwrite
        type: bool
        optional: { default: false, alt_names: [o] }
      - name: when
        type: date
        optional: { default: "31-12-2008" }
"#;

    #[test]
    fn test_yaml_catalog_descriptors() {
        let catalog = Catalog::from_yaml_str(YAML).unwrap();
        assert_eq!(catalog.program.as_deref(), Some("files"));
        assert_eq!(catalog.notation, Some(Notation::Positional));

        let actions = catalog.descriptors().unwrap();
        let copy = &actions[0];
        assert_eq!(copy.description, "Copies a file");
        assert_eq!(
            copy.parameters[0].markers,
            vec![Marker::Required {
                description: "file to copy".into()
            }]
        );
        assert!(copy.parameters[1].markers.is_empty());
        assert_eq!(
            copy.parameters[2].markers,
            vec![Marker::Optional {
                default: Value::Bool(false),
                alt_names: vec!["o".into()],
                description: String::new(),
            }]
        );
        assert_eq!(copy.parameters[3].value_type, ValueType::Date);
    }

    #[test]
    fn test_json_catalog_with_native_default() {
        let catalog = Catalog::from_json_str(
            r#"{"actions":[{"name":"run","parameters":[
                {"name":"level","type":"long","default":3},
                {"name":"tags","type":"string[]","optional":{"default":["a","b"]}}
            ]}]}"#,
        )
        .unwrap();
        let actions = catalog.descriptors().unwrap();
        assert_eq!(actions[0].parameters[0].native_default, Some(Value::Long(3)));
        assert!(matches!(
            &actions[0].parameters[1].markers[0],
            Marker::Optional { default: Value::StrArray(items), .. } if items.len() == 2
        ));
    }

    #[test]
    fn test_defaults_follow_declared_type() {
        assert_eq!(
            default_value(&serde_json::json!(10), &ValueType::String),
            Some(Value::Int(10))
        );
        assert_eq!(
            default_value(&serde_json::json!(1.5), &ValueType::Decimal),
            Some(Value::Decimal(1.5))
        );
        assert_eq!(
            default_value(&serde_json::json!("Two"), &ValueType::enumeration(["One", "Two"])),
            Some(Value::variant("Two"))
        );
        assert_eq!(
            default_value(&serde_json::json!(null), &ValueType::nullable(ValueType::Int)),
            Some(Value::Null)
        );
        assert_eq!(
            default_value(&serde_json::json!(1234567890123i64), &ValueType::Int),
            Some(Value::Long(1234567890123))
        );
        assert_eq!(default_value(&serde_json::json!({"a": 1}), &ValueType::Int), None);
    }

    #[test]
    fn test_object_default_is_rejected() {
        let catalog = Catalog::from_yaml_str(
            "actions:\n  - name: run\n    parameters:\n      - { name: p, type: int, default: { a: 1 } }\n",
        )
        .unwrap();
        let err = catalog.descriptors().unwrap_err();
        assert!(matches!(err, CatalogError::InvalidDefault { ref param, .. } if param == "p"));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = Catalog::from_yaml_str("actions: []\nbogus: 1\n").unwrap_err();
        assert!(matches!(err, CatalogError::Yaml(_)));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = TempDir::new().unwrap();
        let yaml = dir.path().join("actions.yml");
        fs::write(&yaml, YAML).unwrap();
        assert_eq!(Catalog::load(&yaml).unwrap().actions.len(), 1);

        let json = dir.path().join("actions.json");
        fs::write(&json, r#"{"actions":[{"name":"a"},{"name":"b"}]}"#).unwrap();
        assert_eq!(Catalog::load(&json).unwrap().actions.len(), 2);

        let txt = dir.path().join("actions.txt");
        fs::write(&txt, "").unwrap();
        assert!(matches!(
            Catalog::load(&txt),
            Err(CatalogError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            Catalog::load(dir.path().join("missing.yaml")),
            Err(CatalogError::Io { .. })
        ));
    }

    #[test]
    fn test_apply_settings_overrides_base() {
        let catalog = Catalog::from_yaml_str(YAML).unwrap();
        let settings = catalog.apply_settings(Settings::default());
        assert_eq!(settings.program.as_deref(), Some("files"));
        assert_eq!(settings.notation, Notation::Positional);
    }
}
