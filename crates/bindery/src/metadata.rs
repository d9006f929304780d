//! Read-only queries over the declared actions.

use crate::action::{ActionDescriptor, Marker, ParameterDescriptor};
use crate::convert::convert;
use crate::error::Result;
use crate::value::Value;

/// Default and alternative names of an optional parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalInfo {
    pub default: Value,
    pub alt_names: Vec<String>,
}

/// Queries over one dispatch's action list.
#[derive(Debug, Clone, Copy)]
pub struct ActionMetadata<'a> {
    actions: &'a [ActionDescriptor],
}

impl<'a> ActionMetadata<'a> {
    pub fn new(actions: &'a [ActionDescriptor]) -> Self {
        Self { actions }
    }

    pub fn actions(&self) -> &'a [ActionDescriptor] {
        self.actions
    }

    pub fn is_multi_action(&self) -> bool {
        self.actions.len() > 1
    }

    pub fn first_action(&self) -> Option<&'a ActionDescriptor> {
        self.actions.first()
    }

    /// Finds the action named by `token`, ignoring case.
    pub fn lookup(&self, token: &str) -> Option<&'a ActionDescriptor> {
        self.actions.iter().find(|a| a.is_named(token))
    }

    /// Exactly one action and it needs no tokens.
    pub fn single_action_all_optional(&self) -> bool {
        match self.actions {
            [only] => self.required_count(only) == 0,
            _ => false,
        }
    }

    /// Required unless a native default exists or the first marker is Optional.
    pub fn is_required(&self, param: &ParameterDescriptor) -> bool {
        param.native_default.is_none()
            && matches!(param.markers.first(), None | Some(Marker::Required { .. }))
    }

    pub fn is_optional(&self, param: &ParameterDescriptor) -> bool {
        !self.is_required(param)
    }

    pub fn required_count(&self, action: &ActionDescriptor) -> usize {
        action
            .parameters
            .iter()
            .filter(|p| self.is_required(p))
            .count()
    }

    /// Optional data for `param`; `None` when the parameter is required.
    pub fn optional_info(&self, param: &ParameterDescriptor) -> Option<OptionalInfo> {
        if let Some(default) = &param.native_default {
            return Some(OptionalInfo {
                default: default.clone(),
                alt_names: Vec::new(),
            });
        }
        match param.markers.first() {
            Some(Marker::Optional {
                default, alt_names, ..
            }) => Some(OptionalInfo {
                default: default.clone(),
                alt_names: alt_names.clone(),
            }),
            _ => None,
        }
    }

    /// The typed value an optional parameter starts out with.
    ///
    /// A string default on a date parameter is converted to a date.
    pub fn seed_value(&self, param: &ParameterDescriptor) -> Result<Value> {
        let default = self
            .optional_info(param)
            .map(|info| info.default)
            .unwrap_or(Value::Null);
        match default {
            Value::Str(raw) if param.value_type.is_date() => convert(&raw, &param.value_type),
            other => Ok(other),
        }
    }
}
