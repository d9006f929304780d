//! Command-line syntaxes.
//!
//! A notation strategy knows how tokens are spelled: which one names the
//! action, how optional values are written and how to print usage. Two are
//! provided:
//!
//! - [`SwitchNotation`]: required values first, then `/name:value`,
//!   `/-name` (false) and `/name` (true). Tokens are validated strictly.
//! - [`PositionalNotation`]: `-name value` pairs, then the required values
//!   at the end. Unknown or repeated names are tolerated.

mod positional;
mod switch;

pub use positional::PositionalNotation;
pub use switch::SwitchNotation;

use serde::{Deserialize, Serialize};

use crate::action::ActionDescriptor;
use crate::error::Result;
use crate::messenger::Messenger;
use crate::metadata::ActionMetadata;
use crate::value::Value;

/// Parsing and usage rendering for one command-line syntax.
pub trait NotationStrategy {
    /// The action the tokens address: the single action, or the one named by
    /// the first token.
    fn current_action(&self) -> Option<&ActionDescriptor>;

    /// Checks the token layout for `action`, writing usage where useful.
    fn validate_input(&self, action: &ActionDescriptor, messenger: &mut dyn Messenger)
        -> Result<()>;

    /// Converts the tokens into one value per declared parameter, in order.
    fn build_arguments(&self, action: &ActionDescriptor) -> Result<Vec<Value>>;

    /// Usage of a single action.
    fn render_action_usage(&self, action: &ActionDescriptor, messenger: &mut dyn Messenger);

    /// Subcommand overview of a multi-action program.
    fn render_general_usage(&self, messenger: &mut dyn Messenger);

    /// General usage for several actions, the action's usage for one.
    fn render_usage(&self, messenger: &mut dyn Messenger) {
        let metadata = self.metadata();
        if metadata.is_multi_action() {
            self.render_general_usage(messenger);
        } else if let Some(action) = metadata.first_action() {
            self.render_action_usage(action, messenger);
        }
    }

    fn metadata(&self) -> &ActionMetadata<'_>;
}

/// Selects the command-line syntax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    /// `/name:value` switches.
    #[default]
    Switch,
    /// `-name value` pairs.
    Positional,
}

impl Notation {
    /// Builds the strategy for one dispatch.
    pub fn strategy<'a>(
        self,
        program: &'a str,
        tokens: &'a [String],
        metadata: &'a ActionMetadata<'a>,
    ) -> Box<dyn NotationStrategy + 'a> {
        match self {
            Notation::Switch => Box::new(SwitchNotation::new(program, tokens, metadata)),
            Notation::Positional => Box::new(PositionalNotation::new(program, tokens, metadata)),
        }
    }
}

/// Index of the first token after the action name.
fn first_argument_index(metadata: &ActionMetadata<'_>) -> usize {
    usize::from(metadata.is_multi_action())
}

/// Resolves the action shared by both notations.
fn resolve_action<'a>(
    metadata: &ActionMetadata<'a>,
    tokens: &[String],
) -> Option<&'a ActionDescriptor> {
    if metadata.is_multi_action() {
        tokens.first().and_then(|token| metadata.lookup(token))
    } else {
        metadata.first_action()
    }
}
