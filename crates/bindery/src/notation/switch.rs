//! `/name:value` notation: required values first, then named switches.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::{first_argument_index, resolve_action, NotationStrategy};
use crate::action::ActionDescriptor;
use crate::convert::convert;
use crate::error::{BindError, Result};
use crate::messenger::Messenger;
use crate::metadata::ActionMetadata;
use crate::types::ValueType;
use crate::usage::{write_action_usage, write_general_usage, UsageStyle};
use crate::value::Value;

/// Marks an optional token.
const SWITCH_MARKER: char = '/';
/// Negates a boolean switch: `/-verbose`.
const NEGATION_PREFIX: &str = "/-";
const VALUE_SEPARATOR: char = ':';

/// `tool req1 req2 /name:value /-flag /flag`
pub struct SwitchNotation<'a> {
    program: &'a str,
    tokens: &'a [String],
    metadata: &'a ActionMetadata<'a>,
}

impl<'a> SwitchNotation<'a> {
    pub fn new(program: &'a str, tokens: &'a [String], metadata: &'a ActionMetadata<'a>) -> Self {
        Self {
            program,
            tokens,
            metadata,
        }
    }

    /// Tokens after the required values.
    fn optional_tokens(&self, action: &ActionDescriptor) -> &'a [String] {
        let start = first_argument_index(self.metadata) + self.metadata.required_count(action);
        self.tokens.get(start..).unwrap_or(&[])
    }
}

/// Lowercased parameter name of an optional token.
fn parameter_name(token: &str) -> String {
    let name = if let Some(rest) = token.strip_prefix(NEGATION_PREFIX) {
        rest
    } else {
        let body = token.strip_prefix(SWITCH_MARKER).unwrap_or(token);
        body.split_once(VALUE_SEPARATOR)
            .map_or(body, |(name, _)| name)
    };
    name.to_lowercase()
}

/// Raw value carried by an optional token.
fn parameter_value(token: &str) -> &str {
    if token.starts_with(NEGATION_PREFIX) {
        "false"
    } else if let Some((_, value)) = token.split_once(VALUE_SEPARATOR) {
        value
    } else {
        "true"
    }
}

#[derive(Debug, Clone)]
struct Slot<'a> {
    position: usize,
    value_type: &'a ValueType,
}

/// Working state of one `build_arguments` call.
struct BindingContext<'a> {
    action: &'a ActionDescriptor,
    tokens: &'a [String],
    aliases: HashMap<String, Slot<'a>>,
    values: Vec<Value>,
}

impl<'a> BindingContext<'a> {
    fn new(action: &'a ActionDescriptor, tokens: &'a [String], metadata: &ActionMetadata<'_>) -> Self {
        let mut aliases = HashMap::new();
        for (position, param) in action.parameters.iter().enumerate() {
            let Some(info) = metadata.optional_info(param) else {
                continue;
            };
            let slot = Slot {
                position,
                value_type: &param.value_type,
            };
            for name in info.alt_names.iter().chain(std::iter::once(&param.name)) {
                aliases.insert(name.to_lowercase(), slot.clone());
            }
        }
        Self {
            action,
            tokens,
            aliases,
            values: Vec::with_capacity(action.parameters.len()),
        }
    }

    fn bind_required(&mut self, offset: usize, count: usize) -> Result<()> {
        let action = self.action;
        for param in &action.parameters[..count] {
            let raw = self
                .tokens
                .get(offset + self.values.len())
                .ok_or(BindError::MissingRequired)?;
            self.values.push(convert(raw, &param.value_type)?);
        }
        Ok(())
    }

    fn seed_optional(&mut self, metadata: &ActionMetadata<'_>, count: usize) -> Result<()> {
        let action = self.action;
        for param in &action.parameters[count..] {
            self.values.push(metadata.seed_value(param)?);
        }
        Ok(())
    }

    fn apply(&mut self, token: &str) -> Result<()> {
        let name = parameter_name(token);
        let slot = self
            .aliases
            .get(&name)
            .ok_or_else(|| BindError::UnknownParameterName {
                token: token.to_string(),
            })?;
        let value = convert(parameter_value(token), slot.value_type)?;
        trace!(parameter = %name, %value, "optional parameter bound");
        self.values[slot.position] = value;
        Ok(())
    }
}

impl NotationStrategy for SwitchNotation<'_> {
    fn current_action(&self) -> Option<&ActionDescriptor> {
        resolve_action(self.metadata, self.tokens)
    }

    fn validate_input(
        &self,
        action: &ActionDescriptor,
        messenger: &mut dyn Messenger,
    ) -> Result<()> {
        let needed = first_argument_index(self.metadata) + self.metadata.required_count(action);
        if self.tokens.len() < needed {
            self.render_action_usage(action, messenger);
            return Err(BindError::MissingRequired);
        }

        let optional = self.optional_tokens(action);
        let mut seen = HashSet::new();
        for token in optional {
            if !token.starts_with(SWITCH_MARKER) {
                return Err(BindError::MalformedOptional {
                    token: token.clone(),
                });
            }
            let name = parameter_name(token);
            if !seen.insert(name.clone()) {
                return Err(BindError::DuplicateParameter { name });
            }
        }

        let context = BindingContext::new(action, self.tokens, self.metadata);
        if let Some(token) = optional
            .iter()
            .find(|token| !context.aliases.contains_key(&parameter_name(token)))
        {
            return Err(BindError::UnknownParameterName {
                token: token.clone(),
            });
        }
        Ok(())
    }

    fn build_arguments(&self, action: &ActionDescriptor) -> Result<Vec<Value>> {
        let required = self.metadata.required_count(action);
        let mut context = BindingContext::new(action, self.tokens, self.metadata);
        context.bind_required(first_argument_index(self.metadata), required)?;
        context.seed_optional(self.metadata, required)?;
        for token in self.optional_tokens(action) {
            context.apply(token)?;
        }
        Ok(context.values)
    }

    fn render_action_usage(&self, action: &ActionDescriptor, messenger: &mut dyn Messenger) {
        write_action_usage(
            UsageStyle::Switch,
            self.program,
            self.metadata,
            action,
            messenger,
        );
    }

    fn render_general_usage(&self, messenger: &mut dyn Messenger) {
        write_general_usage(self.program, self.metadata, messenger);
    }

    fn metadata(&self) -> &ActionMetadata<'_> {
        self.metadata
    }
}
