//! `-name value` notation: optional pairs first, required values last.

use std::collections::HashMap;

use tracing::trace;

use super::{first_argument_index, resolve_action, NotationStrategy};
use crate::action::ActionDescriptor;
use crate::convert::convert;
use crate::error::{BindError, Result};
use crate::messenger::Messenger;
use crate::metadata::ActionMetadata;
use crate::usage::{write_action_usage, write_general_usage, UsageStyle};
use crate::value::Value;

const NAME_MARKER: char = '-';

/// `tool -name value -other value req1 req2`
///
/// The last tokens fill the required parameters; everything between the
/// action name and those is read as name/value pairs. Names are matched
/// against primary and alternative names ignoring case. Unknown names are
/// skipped and a repeated name keeps its last value.
pub struct PositionalNotation<'a> {
    program: &'a str,
    tokens: &'a [String],
    metadata: &'a ActionMetadata<'a>,
}

impl<'a> PositionalNotation<'a> {
    pub fn new(program: &'a str, tokens: &'a [String], metadata: &'a ActionMetadata<'a>) -> Self {
        Self {
            program,
            tokens,
            metadata,
        }
    }

    /// Splits the argument tokens into `(pairs, trailing required values)`.
    fn split(&self, action: &ActionDescriptor) -> Result<(&'a [String], &'a [String])> {
        let start = first_argument_index(self.metadata);
        let arguments = self.tokens.get(start..).unwrap_or(&[]);
        let required = self.metadata.required_count(action);
        if arguments.len() < required {
            return Err(BindError::MissingRequired);
        }
        Ok(arguments.split_at(arguments.len() - required))
    }
}

fn pairs(tokens: &[String]) -> Result<HashMap<String, &str>> {
    let mut named = HashMap::new();
    for chunk in tokens.chunks(2) {
        let [name, value] = chunk else {
            return Err(BindError::MissingValue {
                token: chunk[0].clone(),
            });
        };
        let key = name.strip_prefix(NAME_MARKER).unwrap_or(name).to_lowercase();
        named.insert(key, value.as_str());
    }
    Ok(named)
}

impl NotationStrategy for PositionalNotation<'_> {
    fn current_action(&self) -> Option<&ActionDescriptor> {
        resolve_action(self.metadata, self.tokens)
    }

    fn validate_input(&self, _action: &ActionDescriptor, _messenger: &mut dyn Messenger) -> Result<()> {
        Ok(())
    }

    fn build_arguments(&self, action: &ActionDescriptor) -> Result<Vec<Value>> {
        let (leading, trailing) = self.split(action)?;
        let named = pairs(leading)?;
        let mut values = Vec::with_capacity(action.parameters.len());
        let mut trailing = trailing.iter();

        for param in &action.parameters {
            let Some(info) = self.metadata.optional_info(param) else {
                let raw = trailing.next().ok_or(BindError::MissingRequired)?;
                values.push(convert(raw, &param.value_type)?);
                continue;
            };
            let supplied = std::iter::once(&param.name)
                .chain(&info.alt_names)
                .find_map(|name| named.get(&name.to_lowercase()));
            let value = match supplied {
                Some(raw) => convert(raw, &param.value_type)?,
                None => self.metadata.seed_value(param)?,
            };
            trace!(parameter = %param.name, %value, "positional parameter bound");
            values.push(value);
        }
        Ok(values)
    }

    fn render_action_usage(&self, action: &ActionDescriptor, messenger: &mut dyn Messenger) {
        write_action_usage(
            UsageStyle::Positional,
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
