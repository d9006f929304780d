//! Declarative binding of command-line tokens onto typed actions.
//!
//! `bindery` takes a set of *actions* (named bodies with an ordered, typed
//! parameter list), maps raw command-line tokens onto one of them and runs
//! it. Conversion, validation, multi-action dispatch and usage text come from
//! the declarations alone.
//!
//! # Features
//!
//! - **Typed parameters**: ints, decimals, bools, dates (`dd-mm-yyyy`), enums,
//!   nullable types and `+` separated lists
//! - **Required and optional parameters**: optional ones carry a default and
//!   alternative names
//! - **Two notations**: `/name:value` switches ([`SwitchNotation`]) and
//!   `-name value` pairs ([`PositionalNotation`])
//! - **Multi-action programs**: the first token names the action, `help
//!   <action>` prints its usage
//! - **Catalogs**: actions can be declared in YAML or JSON ([`Catalog`])
//!
//! # Example
//!
//! ```rust
//! use bindery::{ActionDescriptor, BoundArgs, Dispatcher, ParameterDescriptor,
//!     RecordingMessenger, ValueType};
//!
//! let output = RecordingMessenger::new();
//! let mut dispatcher = Dispatcher::builder()
//!     .program("tool")
//!     .messenger(output.clone())
//!     .action(
//!         ActionDescriptor::new("count")
//!             .parameter(ParameterDescriptor::new("word", ValueType::String))
//!             .parameter(
//!                 ParameterDescriptor::new("times", ValueType::Int)
//!                     .optional(1)
//!                     .alt_names(["t"]),
//!             ),
//!         |args: &BoundArgs| -> anyhow::Result<()> {
//!             let times: i32 = args.get("times")?;
//!             assert_eq!(times, 3);
//!             Ok(())
//!         },
//!     )
//!     .build()?;
//!
//! assert!(dispatcher.run_with(["hello", "/t:3"])?.is_invoked());
//!
//! // Binding problems are reported, not returned as errors.
//! let result = dispatcher.run_with(["hello", "/x:1"])?;
//! assert!(result.is_failed());
//! assert_eq!(output.lines().last().unwrap(), "Unknown parameter name /x:1");
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Errors and exit codes
//!
//! A failed binding writes exactly one diagnostic line (sometimes preceded by
//! usage) and records [`GENERIC_ERROR_EXIT_CODE`] in the process-wide
//! [`exit_code`]. Handler errors are returned from
//! [`Dispatcher::run_with`] as they were produced.

mod action;
mod catalog;
mod convert;
mod dispatch;
mod error;
mod exit;
mod handler;
mod messenger;
mod metadata;
mod notation;
mod types;
mod usage;
mod validate;
mod value;

pub use action::{ActionDescriptor, Marker, ParameterDescriptor};
pub use catalog::{Catalog, CatalogAction, CatalogOptional, CatalogParameter};
pub use convert::{can_be_converted_to_date, convert, ARRAY_SEPARATOR};
pub use dispatch::{Dispatcher, DispatcherBuilder, RunResult, Settings, HELP_TOKENS};
pub use error::{ArgumentError, BindError, CatalogError, Phase, Result, SetupError};
pub use exit::{exit_code, reset_exit_code, set_exit_code, GENERIC_ERROR_EXIT_CODE};
pub use handler::{BoundArgs, FnHandler, Handler, IntoActionResult};
pub use messenger::{ConsoleMessenger, Messenger, RecordingMessenger};
pub use metadata::{ActionMetadata, OptionalInfo};
pub use notation::{Notation, NotationStrategy, PositionalNotation, SwitchNotation};
pub use types::ValueType;
pub use validate::{MetadataValidator, RESERVED_ACTION_NAME};
pub use value::{FromValue, Value, DATE_FORMAT};
