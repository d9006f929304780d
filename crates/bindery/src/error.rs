//! Error types for binding, setup and catalog loading.
//!
//! [`BindError`] is the single error surfaced to the end user: its `Display`
//! output is exactly the line the dispatcher writes through the messenger.
//! The remaining enums describe mistakes made by the host program while
//! wiring the dispatcher, and never reach the end user.

use std::io;
use std::path::PathBuf;

/// Result alias for binding operations.
pub type Result<T, E = BindError> = std::result::Result<T, E>;

/// The stage of a dispatch in which a [`BindError`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Structural problem with the declared actions.
    Metadata,
    /// Problem with the tokens supplied on the command line.
    Input,
}

/// A contract violation detected while validating actions or binding tokens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindError {
    #[error("Can not find any action marked with [Action] attribute in \"{host}\"")]
    NoActions { host: String },

    #[error("[Action] attribute applied once to the method \"{action}\" without parameters. In this case bindery should not be used")]
    ParameterlessSingleAction { action: String },

    #[error("Method name \"{action}\" is reserved. Please, choose another name")]
    ReservedName { action: String },

    #[error("More than one attribute is applied to the parameter \"{param}\" in the method \"{action}\"")]
    MultipleMarkers { param: String, action: String },

    #[error("It is not allowed to write a parameter with a Required attribute after a parameter with an Optional one. See method \"{action}\" parameter \"{param}\"")]
    RequiredAfterOptional { action: String, param: String },

    #[error("Default value for an optional parameter \"{param}\" in method \"{action}\" can not be assigned to the parameter")]
    UnassignableDefault { param: String, action: String },

    #[error("Found duplicated parameter name \"{name}\" in method \"{action}\". Please check alt names for optional parameters")]
    DuplicateName { name: String, action: String },

    #[error("Unknown subcommand \"{name}\"")]
    UnknownSubcommand { name: String },

    #[error("Error: Not all required parameters are set")]
    MissingRequired,

    /// An optional token that does not start with the switch marker.
    #[error("Unknown parameter {token}")]
    MalformedOptional { token: String },

    #[error("Parameter with name {name} passed two times")]
    DuplicateParameter { name: String },

    #[error("Unknown parameter name {token}")]
    UnknownParameterName { token: String },

    /// A positional `-name` with nothing after it.
    #[error("Missing value for parameter {token}")]
    MissingValue { token: String },

    #[error("Could not convert \"{raw}\" to {type_name}")]
    Conversion { raw: String, type_name: String },

    #[error("Could not convert {raw} to Date")]
    DateConversion { raw: String },

    #[error("Value \"{raw}\" is too big or too small")]
    OutOfRange { raw: String },

    #[error("Unknown type is used in your method: {name}")]
    UnknownType { name: String },
}

impl BindError {
    /// Returns whether the error concerns the declared actions or the tokens.
    pub fn phase(&self) -> Phase {
        match self {
            BindError::NoActions { .. }
            | BindError::ParameterlessSingleAction { .. }
            | BindError::ReservedName { .. }
            | BindError::MultipleMarkers { .. }
            | BindError::RequiredAfterOptional { .. }
            | BindError::UnassignableDefault { .. }
            | BindError::DuplicateName { .. } => Phase::Metadata,
            _ => Phase::Input,
        }
    }

    pub(crate) fn conversion(raw: &str, type_name: impl ToString) -> Self {
        Self::Conversion {
            raw: raw.to_string(),
            type_name: type_name.to_string(),
        }
    }

    pub(crate) fn out_of_range(raw: &str) -> Self {
        Self::OutOfRange {
            raw: raw.to_string(),
        }
    }
}

/// Failure to read a bound argument inside a handler.
#[derive(Debug, thiserror::Error)]
pub enum ArgumentError {
    #[error("action has no parameter named '{0}'")]
    UnknownArgument(String),

    #[error("parameter '{name}' holds a {found} value, which can not be read as {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Mistakes in the way the dispatcher was assembled.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("no handler registered for action '{0}'")]
    MissingHandler(String),

    #[error("handler registered for unknown action '{0}'")]
    UnknownAction(String),

    #[error("more than one handler registered for action '{0}'")]
    DuplicateHandler(String),

    #[error("action '{0}' is declared more than once")]
    DuplicateAction(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Failure to load an action catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported catalog format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("default of parameter '{param}' in action '{action}' is not a scalar or a list of scalars")]
    InvalidDefault { param: String, action: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_errors_report_metadata_phase() {
        let err = BindError::ReservedName {
            action: "help".into(),
        };
        assert_eq!(err.phase(), Phase::Metadata);

        let err = BindError::DuplicateName {
            name: "a".into(),
            action: "run".into(),
        };
        assert_eq!(err.phase(), Phase::Metadata);
    }

    #[test]
    fn test_input_errors_report_input_phase() {
        assert_eq!(BindError::MissingRequired.phase(), Phase::Input);
        assert_eq!(BindError::out_of_range("99999999999").phase(), Phase::Input);
    }

    #[test]
    fn test_messages_match_user_facing_text() {
        let err = BindError::MultipleMarkers {
            param: "p".into(),
            action: "Run".into(),
        };
        assert_eq!(
            err.to_string(),
            "More than one attribute is applied to the parameter \"p\" in the method \"Run\""
        );
        assert_eq!(
            BindError::conversion("abc", "int").to_string(),
            "Could not convert \"abc\" to int"
        );
        assert_eq!(
            BindError::DateConversion { raw: "1-2".into() }.to_string(),
            "Could not convert 1-2 to Date"
        );
    }
}
