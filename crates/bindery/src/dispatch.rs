//! The dispatcher: from raw tokens to an invoked action.
//!
//! Each run goes through the same states:
//!
//! ```text
//! validate metadata -> help? -> resolve action -> validate input
//!     -> build arguments -> invoke handler
//! ```
//!
//! Any [`BindError`] along the way is written through the messenger, sets
//! the process exit code to [`GENERIC_ERROR_EXIT_CODE`] and ends the run
//! with [`RunResult::Failed`]. Nothing is invoked in that case. Errors
//! returned by a handler are not diagnostics and propagate to the caller
//! unchanged.
//!
//! ```rust
//! use bindery::{ActionDescriptor, BoundArgs, Dispatcher, ParameterDescriptor,
//!     RecordingMessenger, ValueType};
//!
//! let output = RecordingMessenger::new();
//! let mut dispatcher = Dispatcher::builder()
//!     .program("greeter")
//!     .messenger(output.clone())
//!     .action(
//!         ActionDescriptor::new("greet")
//!             .parameter(ParameterDescriptor::new("name", ValueType::String)),
//!         |args: &BoundArgs| -> anyhow::Result<()> {
//!             let name: String = args.get("name")?;
//!             assert_eq!(name, "ada");
//!             Ok(())
//!         },
//!     )
//!     .build()?;
//!
//! let result = dispatcher.run_with(["ada"])?;
//! assert!(result.is_invoked());
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::collections::{HashMap, HashSet};
use std::env;
use std::ffi::OsString;
use std::path::Path;

use tracing::debug;

use crate::action::ActionDescriptor;
use crate::catalog::Catalog;
use crate::error::{BindError, SetupError};
use crate::exit::{set_exit_code, GENERIC_ERROR_EXIT_CODE};
use crate::handler::{BoundArgs, FnHandler, Handler, IntoActionResult};
use crate::messenger::{ConsoleMessenger, Messenger};
use crate::metadata::ActionMetadata;
use crate::notation::Notation;
use crate::validate::MetadataValidator;

/// Tokens that request help.
pub const HELP_TOKENS: [&str; 4] = ["/?", "/help", "/h", "help"];

/// Program name used when none is configured and `argv[0]` is unusable.
const FALLBACK_PROGRAM: &str = "app";

/// Dispatcher configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Name shown in usage lines. Defaults to the file stem of `argv[0]`.
    pub program: Option<String>,
    pub notation: Notation,
}

impl Settings {
    fn program_name(&self) -> String {
        self.program.clone().unwrap_or_else(|| {
            program_from_arg0(env::args_os().next())
        })
    }
}

fn program_from_arg0(arg0: Option<OsString>) -> String {
    arg0.and_then(|arg0| {
        Path::new(&arg0)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
    })
    .filter(|s| !s.is_empty())
    .unwrap_or_else(|| FALLBACK_PROGRAM.to_string())
}

/// Arguments that are not valid UTF-8 are decoded lossily, so they reach
/// conversion and fail there like any other bad token.
fn process_tokens(args: impl IntoIterator<Item = OsString>) -> Vec<String> {
    args.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

/// Outcome of a dispatch that did not fail inside a handler.
#[derive(Debug)]
pub enum RunResult {
    /// The named action ran to completion.
    Invoked { action: String },
    /// Usage text was written; nothing ran.
    HelpShown,
    /// Binding failed; the diagnostic has been written and the exit code set.
    Failed(BindError),
}

impl RunResult {
    pub fn is_invoked(&self) -> bool {
        matches!(self, RunResult::Invoked { .. })
    }

    pub fn is_help(&self) -> bool {
        matches!(self, RunResult::HelpShown)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunResult::Failed(_))
    }

    /// Name of the invoked action.
    pub fn action(&self) -> Option<&str> {
        match self {
            RunResult::Invoked { action } => Some(action),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&BindError> {
        match self {
            RunResult::Failed(err) => Some(err),
            _ => None,
        }
    }
}

enum Resolution {
    Help,
    Invoke(BoundArgs),
}

/// Binds command-line tokens to declared actions and runs them.
pub struct Dispatcher {
    program: String,
    notation: Notation,
    actions: Vec<ActionDescriptor>,
    handlers: HashMap<String, Box<dyn Handler>>,
    messenger: Box<dyn Messenger>,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn actions(&self) -> &[ActionDescriptor] {
        &self.actions
    }

    /// Checks the declared actions without touching any tokens.
    pub fn validate(&self) -> Result<(), BindError> {
        let metadata = ActionMetadata::new(&self.actions);
        MetadataValidator::new(&self.program, &self.actions, &metadata).validate()
    }

    /// Dispatches the process arguments (without `argv[0]`).
    pub fn run(&mut self) -> anyhow::Result<RunResult> {
        self.run_with(process_tokens(env::args_os().skip(1)))
    }

    /// Dispatches an explicit token list.
    ///
    /// Returns `Err` only when the invoked handler fails; the error is the
    /// handler's own.
    pub fn run_with<I, S>(&mut self, tokens: I) -> anyhow::Result<RunResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        debug!(program = %self.program, ?tokens, "dispatching");

        match self.resolve(&tokens) {
            Ok(Resolution::Help) => {
                debug!("help shown");
                Ok(RunResult::HelpShown)
            }
            Ok(Resolution::Invoke(args)) => {
                let key = args.action().to_lowercase();
                let handler = self
                    .handlers
                    .get_mut(&key)
                    .ok_or_else(|| SetupError::MissingHandler(args.action().to_string()))?;
                debug!(action = args.action(), "invoking handler");
                handler.invoke(&args)?;
                Ok(RunResult::Invoked {
                    action: args.action().to_string(),
                })
            }
            Err(err) => {
                debug!(error = %err, phase = ?err.phase(), "dispatch failed");
                self.messenger.write(&err.to_string());
                set_exit_code(GENERIC_ERROR_EXIT_CODE);
                Ok(RunResult::Failed(err))
            }
        }
    }

    fn resolve(&mut self, tokens: &[String]) -> Result<Resolution, BindError> {
        let metadata = ActionMetadata::new(&self.actions);
        MetadataValidator::new(&self.program, &self.actions, &metadata).validate()?;

        let messenger = self.messenger.as_mut();
        let strategy = self.notation.strategy(&self.program, tokens, &metadata);

        if is_help_requested(tokens, &metadata) {
            if !metadata.is_multi_action() {
                strategy.render_usage(messenger);
                return Ok(Resolution::Help);
            }
            let [_, name] = tokens else {
                strategy.render_general_usage(messenger);
                return Ok(Resolution::Help);
            };
            return match metadata.lookup(name) {
                Some(action) => {
                    strategy.render_action_usage(action, messenger);
                    Ok(Resolution::Help)
                }
                None => {
                    strategy.render_general_usage(messenger);
                    Err(BindError::UnknownSubcommand { name: name.clone() })
                }
            };
        }

        let Some(action) = strategy.current_action() else {
            strategy.render_usage(messenger);
            return Err(BindError::UnknownSubcommand {
                name: tokens.first().cloned().unwrap_or_default(),
            });
        };
        debug!(action = %action.name, "action resolved");

        strategy.validate_input(action, messenger)?;
        let values = strategy.build_arguments(action)?;
        debug!(action = %action.name, count = values.len(), "arguments bound");

        let names = action.parameters.iter().map(|p| p.name.clone()).collect();
        Ok(Resolution::Invoke(BoundArgs::new(&action.name, names, values)))
    }
}

/// Help is requested by a help token, or by no tokens at all unless the
/// only action can run without any.
fn is_help_requested(tokens: &[String], metadata: &ActionMetadata<'_>) -> bool {
    match tokens.first() {
        None => !metadata.single_action_all_optional(),
        Some(first) => HELP_TOKENS.contains(&first.as_str()),
    }
}

/// Builder for [`Dispatcher`].
#[derive(Default)]
pub struct DispatcherBuilder {
    settings: Settings,
    actions: Vec<ActionDescriptor>,
    handlers: Vec<(String, Box<dyn Handler>)>,
    messenger: Option<Box<dyn Messenger>>,
    catalog_error: Option<SetupError>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program(mut self, name: impl Into<String>) -> Self {
        self.settings.program = Some(name.into());
        self
    }

    pub fn notation(mut self, notation: Notation) -> Self {
        self.settings.notation = notation;
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Where usage text and diagnostics go. Defaults to stdout.
    pub fn messenger(mut self, messenger: impl Messenger + 'static) -> Self {
        self.messenger = Some(Box::new(messenger));
        self
    }

    /// Declares an action with a closure body.
    pub fn action<F, R>(self, descriptor: ActionDescriptor, f: F) -> Self
    where
        F: FnMut(&BoundArgs) -> R + 'static,
        R: IntoActionResult + 'static,
    {
        self.action_handler(descriptor, FnHandler::new(f))
    }

    /// Declares an action with a [`Handler`] body.
    pub fn action_handler(
        mut self,
        descriptor: ActionDescriptor,
        handler: impl Handler + 'static,
    ) -> Self {
        let handler: Box<dyn Handler> = Box::new(handler);
        self.handlers.push((descriptor.name.clone(), handler));
        self.actions.push(descriptor);
        self
    }

    /// Declares the catalog's actions and applies its settings.
    ///
    /// Bodies are attached with [`handler`](Self::handler).
    pub fn catalog(mut self, catalog: &Catalog) -> Self {
        self.settings = catalog.apply_settings(self.settings);
        match catalog.descriptors() {
            Ok(descriptors) => self.actions.extend(descriptors),
            Err(err) => self.catalog_error = Some(err.into()),
        }
        self
    }

    /// Attaches a closure body to an action declared elsewhere.
    pub fn handler<F, R>(mut self, action: impl Into<String>, f: F) -> Self
    where
        F: FnMut(&BoundArgs) -> R + 'static,
        R: IntoActionResult + 'static,
    {
        let handler: Box<dyn Handler> = Box::new(FnHandler::new(f));
        self.handlers.push((action.into(), handler));
        self
    }

    /// Builds the dispatcher.
    ///
    /// # Errors
    ///
    /// - the catalog could not be converted into descriptors;
    /// - two actions share a name;
    /// - a handler names no declared action, or an action has two handlers;
    /// - an action has no handler.
    ///
    /// Structural problems with the actions themselves are reported when
    /// the dispatcher runs, like any other binding error.
    pub fn build(self) -> Result<Dispatcher, SetupError> {
        if let Some(err) = self.catalog_error {
            return Err(err);
        }

        let mut names = HashSet::new();
        for action in &self.actions {
            if !names.insert(action.name.to_lowercase()) {
                return Err(SetupError::DuplicateAction(action.name.clone()));
            }
        }

        let mut handlers = HashMap::new();
        for (name, handler) in self.handlers {
            let key = name.to_lowercase();
            if !names.contains(&key) {
                return Err(SetupError::UnknownAction(name));
            }
            if handlers.insert(key, handler).is_some() {
                return Err(SetupError::DuplicateHandler(name));
            }
        }
        if let Some(missing) = self
            .actions
            .iter()
            .find(|a| !handlers.contains_key(&a.name.to_lowercase()))
        {
            return Err(SetupError::MissingHandler(missing.name.clone()));
        }

        Ok(Dispatcher {
            program: self.settings.program_name(),
            notation: self.settings.notation,
            actions: self.actions,
            handlers,
            messenger: self
                .messenger
                .unwrap_or_else(|| Box::new(ConsoleMessenger)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ParameterDescriptor;
    use crate::messenger::RecordingMessenger;
    use crate::types::ValueType;
    use serial_test::serial;

    fn noop(_: &BoundArgs) {}

    #[cfg(unix)]
    fn non_utf8(bytes: &[u8]) -> OsString {
        use std::os::unix::ffi::OsStringExt;
        OsString::from_vec(bytes.to_vec())
    }

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn single(name: &str) -> ActionDescriptor {
        ActionDescriptor::new(name).parameter(ParameterDescriptor::new("p", ValueType::String))
    }

    #[test]
    fn test_help_detection() {
        let actions = vec![single("a"), single("b")];
        let metadata = ActionMetadata::new(&actions);
        assert!(is_help_requested(&[], &metadata));
        for token in HELP_TOKENS {
            assert!(is_help_requested(&tokens(&[token]), &metadata));
        }
        assert!(!is_help_requested(&tokens(&["a"]), &metadata));
        assert!(!is_help_requested(&tokens(&["HELP"]), &metadata));
    }

    #[test]
    fn test_no_tokens_runs_all_optional_single_action() {
        let actions = vec![ActionDescriptor::new("only")
            .parameter(ParameterDescriptor::new("x", ValueType::Int).optional(1))];
        let metadata = ActionMetadata::new(&actions);
        assert!(!is_help_requested(&[], &metadata));
    }

    #[test]
    fn test_build_rejects_missing_handler() {
        let catalog = Catalog::from_yaml_str("actions:\n  - name: run\n").unwrap();
        let err = Dispatcher::builder().catalog(&catalog).build().err().unwrap();
        assert!(matches!(err, SetupError::MissingHandler(name) if name == "run"));
    }

    #[test]
    fn test_build_rejects_handler_for_unknown_action() {
        let err = Dispatcher::builder()
            .action(single("a"), noop)
            .handler("b", noop)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SetupError::UnknownAction(name) if name == "b"));
    }

    #[test]
    fn test_build_rejects_duplicate_actions() {
        let err = Dispatcher::builder()
            .action(single("a"), noop)
            .action(single("A"), noop)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SetupError::DuplicateAction(_)));
    }

    #[test]
    fn test_build_rejects_second_handler() {
        let catalog = Catalog::from_yaml_str("actions:\n  - name: run\n").unwrap();
        let err = Dispatcher::builder()
            .catalog(&catalog)
            .handler("run", noop)
            .handler("RUN", noop)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SetupError::DuplicateHandler(_)));
    }

    #[test]
    fn test_catalog_settings_apply() {
        let catalog =
            Catalog::from_yaml_str("program: cat\nnotation: positional\nactions:\n  - name: run\n")
                .unwrap();
        let dispatcher = Dispatcher::builder()
            .catalog(&catalog)
            .handler("run", noop)
            .build()
            .unwrap();
        assert_eq!(dispatcher.program(), "cat");
        assert_eq!(dispatcher.notation, Notation::Positional);
    }

    #[test]
    fn test_validate_without_running() {
        let dispatcher = Dispatcher::builder()
            .program("host")
            .messenger(RecordingMessenger::new())
            .build()
            .unwrap();
        assert_eq!(
            dispatcher.validate(),
            Err(BindError::NoActions {
                host: "host".into()
            })
        );
    }

    #[test]
    fn test_program_name_defaults_to_something() {
        let settings = Settings::default();
        assert!(!settings.program_name().is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_non_utf8_arguments_are_decoded_lossily() {
        let tokens = process_tokens([OsString::from("greet"), non_utf8(b"a\xffb")]);
        assert_eq!(tokens, vec!["greet".to_string(), "a\u{FFFD}b".to_string()]);
    }

    #[test]
    #[cfg(unix)]
    #[serial(exit_code)]
    fn test_non_utf8_token_fails_through_conversion() {
        let output = RecordingMessenger::new();
        let mut dispatcher = Dispatcher::builder()
            .program("p")
            .messenger(output.clone())
            .action(
                ActionDescriptor::new("run")
                    .parameter(ParameterDescriptor::new("n", ValueType::Int)),
                noop,
            )
            .build()
            .unwrap();
        let result = dispatcher
            .run_with(process_tokens([non_utf8(b"\xff")]))
            .unwrap();
        assert!(result.is_failed());
        assert_eq!(output.lines(), vec!["Could not convert \"\u{FFFD}\" to int"]);
    }

    #[test]
    #[cfg(unix)]
    fn test_program_name_from_non_utf8_arg0() {
        assert_eq!(program_from_arg0(Some(non_utf8(b"/bin/to\xffol"))), "to\u{FFFD}ol");
        assert_eq!(program_from_arg0(Some(OsString::from("/usr/bin/tool.exe"))), "tool");
        assert_eq!(program_from_arg0(None), FALLBACK_PROGRAM);
    }
}
