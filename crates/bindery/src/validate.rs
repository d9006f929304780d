//! Structural validation of declared actions.
//!
//! Runs before any token is looked at. Checks execute in a fixed order and
//! the first violation wins:
//!
//! 1. at least one action is declared;
//! 2. a lone action has parameters;
//! 3. no action is named `help`;
//! 4. no parameter carries more than one marker;
//! 5. no required parameter follows an optional one;
//! 6. optional defaults are assignable to the parameter type;
//! 7. parameter names and alternative names are unique within an action.
//!
//! Checks 3 to 7 run action by action, in declaration order.

use std::collections::HashSet;

use crate::action::{ActionDescriptor, Marker};
use crate::convert::can_be_converted_to_date;
use crate::error::{BindError, Result};
use crate::metadata::ActionMetadata;
use crate::value::Value;

/// Name reserved for the help subcommand.
pub const RESERVED_ACTION_NAME: &str = "help";

pub struct MetadataValidator<'a> {
    host: &'a str,
    actions: &'a [ActionDescriptor],
    metadata: &'a ActionMetadata<'a>,
}

impl<'a> MetadataValidator<'a> {
    /// `host` names the program in the "no actions" diagnostic.
    pub fn new(
        host: &'a str,
        actions: &'a [ActionDescriptor],
        metadata: &'a ActionMetadata<'a>,
    ) -> Self {
        Self {
            host,
            actions,
            metadata,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.actions.is_empty() {
            return Err(BindError::NoActions {
                host: self.host.to_string(),
            });
        }
        if let [only] = self.actions {
            if only.parameters.is_empty() {
                return Err(BindError::ParameterlessSingleAction {
                    action: only.name.clone(),
                });
            }
        }
        for action in self.actions {
            self.check_action(action)?;
        }
        Ok(())
    }

    fn check_action(&self, action: &ActionDescriptor) -> Result<()> {
        check_reserved_name(action)?;
        check_marker_count(action)?;
        self.check_ordering(action)?;
        self.check_defaults(action)?;
        check_unique_names(action)
    }

    fn check_ordering(&self, action: &ActionDescriptor) -> Result<()> {
        let mut seen_optional = false;
        for param in &action.parameters {
            if self.metadata.is_optional(param) {
                seen_optional = true;
            } else if seen_optional {
                return Err(BindError::RequiredAfterOptional {
                    action: action.name.clone(),
                    param: param.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_defaults(&self, action: &ActionDescriptor) -> Result<()> {
        for param in &action.parameters {
            let Some(info) = self.metadata.optional_info(param) else {
                continue;
            };
            let ty = &param.value_type;
            let assignable = match &info.default {
                Value::Str(raw) if ty.is_date() => can_be_converted_to_date(raw),
                default => default.is_assignable_to(ty),
            };
            if !assignable {
                return Err(BindError::UnassignableDefault {
                    param: param.name.clone(),
                    action: action.name.clone(),
                });
            }
        }
        Ok(())
    }
}

fn check_reserved_name(action: &ActionDescriptor) -> Result<()> {
    if action.is_named(RESERVED_ACTION_NAME) {
        return Err(BindError::ReservedName {
            action: action.name.clone(),
        });
    }
    Ok(())
}

fn check_marker_count(action: &ActionDescriptor) -> Result<()> {
    match action.parameters.iter().find(|p| p.markers.len() > 1) {
        Some(param) => Err(BindError::MultipleMarkers {
            param: param.name.clone(),
            action: action.name.clone(),
        }),
        None => Ok(()),
    }
}

fn check_unique_names(action: &ActionDescriptor) -> Result<()> {
    let mut seen = HashSet::new();
    for param in &action.parameters {
        let alt_names: &[String] = match param.markers.first() {
            Some(Marker::Optional { alt_names, .. }) if param.native_default.is_none() => {
                alt_names.as_slice()
            }
            _ => &[],
        };
        for name in std::iter::once(&param.name).chain(alt_names) {
            if !seen.insert(name.to_lowercase()) {
                return Err(BindError::DuplicateName {
                    name: name.clone(),
                    action: action.name.clone(),
                });
            }
        }
    }
    Ok(())
}
