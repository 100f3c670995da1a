//! Command-line interfaces synthesized from function signatures.
//!
//! Given a declared [`Signature`](programmify_core::Signature) and optional
//! default overrides, this crate derives an
//! [`ArgumentSchema`](programmify_core::ArgumentSchema), builds a `clap`
//! parser for it at runtime, and binds parsed values back onto the callable's
//! positional and keyword arguments.
//!
//! # Main entry points
//!
//! - [`build_schema`]: signature plus overrides to schema, with help text
//!   taken from `name (type): description` documentation lines.
//! - [`parse_and_bind`]: process arguments to [`RuntimeBindings`](programmify_core::RuntimeBindings).
//! - [`CommandLineAdapter`]: a callable composed with its generated command
//!   line, including `--quiet` and `--<level>` handling.
//!
//! # Example
//!
//! ```
//! use programmify_core::{Parameter, Signature, ValueType};
//! use programmify_synth::CommandLineAdapter;
//! use programmify_synth::streams::{OutputStreams, SharedBuffer};
//! use serde_json::json;
//!
//! let sig = Signature::new("greet")
//!     .with_doc("Greet someone.\nname (str): who to greet")
//!     .with_param(Parameter::positional("name").with_type(ValueType::String))
//!     .with_param(Parameter::keyword("shout").with_default(false));
//!
//! let out = SharedBuffer::default();
//! let mut adapter = CommandLineAdapter::builder(sig)
//!     .streams(OutputStreams::new(out.clone(), SharedBuffer::default()))
//!     .build_fn(|b, _| {
//!         let name = b.get_str("name").unwrap_or("world");
//!         let text = if b.get_bool("shout") == Some(true) {
//!             format!("HELLO {}", name.to_uppercase())
//!         } else {
//!             format!("hello {name}")
//!         };
//!         Ok(Some(json!(text)))
//!     })
//!     .unwrap();
//!
//! assert_eq!(adapter.run_code(["ada", "--shout"]), 0);
//! assert_eq!(out.contents(), "HELLO ADA\n");
//! ```

pub mod adapter;
pub mod bind;
pub mod config;
pub mod docs;
pub mod error;
pub mod logging;
pub mod output;
pub mod schema;
pub mod streams;

pub use adapter::{AdapterBuilder, Callable, CommandLineAdapter, RunOutcome};
pub use bind::{
    BindOptions, BindOutcome, CallArgs, CliControls, parse_and_bind, parse_and_bind_with,
    render_help,
};
pub use config::AdapterConfig;
pub use docs::DocBlock;
pub use error::{BoxError, Result, SynthError};
pub use logging::LogLevel;
pub use output::{OutputFormat, format_schema};
pub use schema::build_schema;
