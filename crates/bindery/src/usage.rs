//! Usage and help text.
//!
//! Both notations share the same layout: an optional description line, a
//! `usage:` line, then one detail block per parameter that has a description
//! or a default. They differ only in how optional parameters are spelled and
//! where they sit on the `usage:` line.

use crate::action::{ActionDescriptor, ParameterDescriptor};
use crate::messenger::Messenger;
use crate::metadata::ActionMetadata;
use crate::value::Value;

/// How parameters are spelled in usage output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UsageStyle {
    /// `[/name:kind]`, listed in declaration order.
    Switch,
    /// `[-name kind]`, listed before the trailing required values.
    Positional,
}

impl UsageStyle {
    fn display_name(self, metadata: &ActionMetadata<'_>, param: &ParameterDescriptor) -> String {
        let Some(info) = metadata.optional_info(param) else {
            return param.name.clone();
        };
        let ty = &param.value_type;
        match self {
            UsageStyle::Switch => {
                let name = info.alt_names.first().unwrap_or(&param.name);
                if ty.is_bool() {
                    format!("[/{name}]")
                } else {
                    format!("[/{name}:{}]", ty.value_kind())
                }
            }
            UsageStyle::Positional => format!("[-{} {}]", param.name, ty.value_kind()),
        }
    }
}

/// Writes the usage block of one action.
pub(crate) fn write_action_usage(
    style: UsageStyle,
    program: &str,
    metadata: &ActionMetadata<'_>,
    action: &ActionDescriptor,
    messenger: &mut dyn Messenger,
) {
    if !action.description.is_empty() {
        messenger.write(&action.description);
    }

    let names: Vec<String> = action
        .parameters
        .iter()
        .map(|p| style.display_name(metadata, p))
        .collect();

    let mut line = vec!["usage:".to_string(), program.to_string()];
    if metadata.is_multi_action() {
        line.push(action.name.to_lowercase());
    }
    match style {
        UsageStyle::Switch => line.extend(names.iter().cloned()),
        UsageStyle::Positional => {
            let (optional, required): (Vec<_>, Vec<_>) = action
                .parameters
                .iter()
                .zip(&names)
                .partition(|(p, _)| metadata.is_optional(p));
            line.extend(optional.into_iter().map(|(_, n)| n.clone()));
            line.extend(required.into_iter().map(|(_, n)| n.clone()));
        }
    }
    messenger.write(&line.join(" "));

    let width = names.iter().map(|n| n.chars().count()).max().unwrap_or(0);
    for (param, name) in action.parameters.iter().zip(&names) {
        let description = param.description_text();
        let default = metadata
            .optional_info(param)
            .map(|info| info.default)
            .filter(|d| !d.is_null());
        if description.is_empty() && default.is_none() {
            continue;
        }
        if description.is_empty() {
            messenger.write(&format!("    {name}"));
        } else {
            let pad = width - name.chars().count() + 2;
            messenger.write(&format!("    {name}{}{description}", " ".repeat(pad)));
        }
        if let Some(default) = default {
            messenger.write(&format!("        default value: {}", render_default(&default)));
        }
    }
}

/// Writes the subcommand overview of a multi-action program.
pub(crate) fn write_general_usage(
    program: &str,
    metadata: &ActionMetadata<'_>,
    messenger: &mut dyn Messenger,
) {
    messenger.write(&format!("usage: {program} <subcommand> [args]"));
    messenger.write(&format!(
        "Type '{program} help <subcommand>' for help on a specific subcommand."
    ));
    messenger.write("");
    messenger.write("Available subcommands:");
    for action in metadata.actions() {
        let line = format!("{} {}", action.name.to_lowercase(), action.description);
        messenger.write(line.trim_end());
    }
}

fn render_default(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("'{s}'"),
        other => other.to_string(),
    }
}
