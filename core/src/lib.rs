//! Core types for deriving command-line interfaces from function signatures.
//!
//! This crate defines the data model shared by the synthesizer and the
//! `programmify` binary:
//!
//! - [`Signature`] / [`Parameter`]: the declared parameter list of a
//!   callable, with annotations, defaults and a documentation block.
//! - [`ParameterSpec`] / [`ArgumentSchema`]: the command-line view of a
//!   signature: positional slots, switches, flags and variadic collectors.
//! - [`RuntimeBindings`]: parsed values ready to hand back to the callable.
//!
//! Validation ([`validate_signature`]) rejects parameter lists that cannot be
//! mapped onto a command line. Default overrides ([`Overrides`],
//! [`effective_default`]) let a caller replace declared defaults.
//!
//! # Example
//!
//! ```
//! use programmify_core::*;
//!
//! let sig = Signature::new("resize")
//!     .with_doc("Resize an image.\n\nwidth (int): target width")
//!     .with_param(Parameter::positional("path"))
//!     .with_param(Parameter::keyword("width").with_default(640));
//!
//! assert!(validate_signature(&sig).is_empty());
//! assert_eq!(sig.find("width").unwrap().default, Some(serde_json::json!(640)));
//! ```

mod overrides;
mod types;
mod validate;

pub use overrides::{Overrides, effective_default, merge_overrides, unknown_overrides};
pub use types::*;
pub use validate::{ValidationError, validate_signature};
