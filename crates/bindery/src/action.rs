//! Action and parameter descriptors.
//!
//! Descriptors are plain data built by the host program, either in code:
//!
//! ```rust
//! use bindery::{ActionDescriptor, ParameterDescriptor, ValueType};
//!
//! let copy = ActionDescriptor::new("copy")
//!     .description("Copies a file")
//!     .parameter(ParameterDescriptor::new("source", ValueType::String).required())
//!     .parameter(
//!         ParameterDescriptor::new("overwrite", ValueType::Bool)
//!             .optional(false)
//!             .alt_names(["o"]),
//!     );
//! assert_eq!(copy.parameters.len(), 2);
//! ```
//!
//! or by loading a [`Catalog`](crate::Catalog).

use crate::types::ValueType;
use crate::value::Value;

/// Metadata attached to a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    /// The parameter must be supplied.
    Required { description: String },
    /// The parameter may be omitted, in which case `default` is bound.
    Optional {
        default: Value,
        alt_names: Vec<String>,
        description: String,
    },
}

impl Marker {
    pub fn description(&self) -> &str {
        match self {
            Marker::Required { description } | Marker::Optional { description, .. } => {
                description
            }
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Marker::Optional { .. })
    }
}

/// One declared parameter of an action.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub value_type: ValueType,
    /// Declared markers. A well-formed parameter carries at most one.
    pub markers: Vec<Marker>,
    /// Default declared without an Optional marker. Makes the parameter
    /// optional, with no alternative names.
    pub native_default: Option<Value>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            markers: Vec::new(),
            native_default: None,
        }
    }

    /// Adds a Required marker.
    pub fn required(self) -> Self {
        self.marker(Marker::Required {
            description: String::new(),
        })
    }

    /// Adds an Optional marker with the given default.
    pub fn optional(self, default: impl Into<Value>) -> Self {
        self.marker(Marker::Optional {
            default: default.into(),
            alt_names: Vec::new(),
            description: String::new(),
        })
    }

    /// Sets the alternative names of the last Optional marker.
    pub fn alt_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(Marker::Optional { alt_names, .. }) = self.markers.last_mut() {
            *alt_names = names.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Describes the parameter in usage output.
    ///
    /// Applies to the last marker; a parameter without markers gets a
    /// Required marker carrying the description.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        match self.markers.last_mut() {
            Some(Marker::Required { description } | Marker::Optional { description, .. }) => {
                *description = text;
                self
            }
            None => self.marker(Marker::Required { description: text }),
        }
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn native_default(mut self, default: impl Into<Value>) -> Self {
        self.native_default = Some(default.into());
        self
    }

    /// Description of the first marker, or an empty string.
    pub fn description_text(&self) -> &str {
        self.markers.first().map(Marker::description).unwrap_or("")
    }
}

/// One dispatchable unit of host behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDescriptor {
    /// Name matched case-insensitively against the first token.
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterDescriptor>,
}

impl ActionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn parameters<I>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = ParameterDescriptor>,
    {
        self.parameters.extend(parameters);
        self
    }

    /// Whether `token` names this action, ignoring case.
    pub fn is_named(&self, token: &str) -> bool {
        self.name.to_lowercase() == token.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_attaches_alt_names_to_optional_marker() {
        let p = ParameterDescriptor::new("oiParameter", ValueType::Int)
            .optional(0)
            .alt_names(["oi"])
            .description("count");
        assert_eq!(
            p.markers,
            vec![Marker::Optional {
                default: Value::Int(0),
                alt_names: vec!["oi".into()],
                description: "count".into(),
            }]
        );
        assert_eq!(p.description_text(), "count");
    }

    #[test]
    fn test_alt_names_without_optional_marker_is_ignored() {
        let p = ParameterDescriptor::new("p", ValueType::Int)
            .required()
            .alt_names(["x"]);
        assert_eq!(
            p.markers,
            vec![Marker::Required {
                description: String::new()
            }]
        );
    }

    #[test]
    fn test_description_without_marker_implies_required() {
        let p = ParameterDescriptor::new("p", ValueType::String).description("the p");
        assert_eq!(
            p.markers,
            vec![Marker::Required {
                description: "the p".into()
            }]
        );
    }

    #[test]
    fn test_markers_accumulate() {
        let p = ParameterDescriptor::new("p", ValueType::String)
            .required()
            .optional("x");
        assert_eq!(p.markers.len(), 2);
    }

    #[test]
    fn test_is_named_ignores_case() {
        let action = ActionDescriptor::new("Test2");
        assert!(action.is_named("test2"));
        assert!(action.is_named("TEST2"));
        assert!(!action.is_named("test"));
    }
}
