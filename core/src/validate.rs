//! Signature validation.
//!
//! Checks the structural rules a callable's parameter list must follow before
//! a command-line schema can be derived from it: valid and unique names, at
//! most one variadic of each kind, a receiver only in first position,
//! parameter kinds in calling-convention order, and no two parameters
//! competing for the same switch.
//!
//! # Examples
//!
//! ```
//! use programmify_core::*;
//!
//! let sig = Signature::new("copy")
//!     .with_param(Parameter::positional("src"))
//!     .with_param(Parameter::positional("dst"));
//! assert!(validate_signature(&sig).is_empty());
//!
//! let dup = Signature::new("copy")
//!     .with_param(Parameter::positional("src"))
//!     .with_param(Parameter::keyword("src"));
//! assert_eq!(
//!     validate_signature(&dup),
//!     vec![ValidationError::DuplicateParameter("src".into())]
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{ParamKind, Signature};

/// Names the generated command line claims for itself.
const RESERVED_NAMES: &[&str] = &["help"];

/// Signature validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Signature name is empty or whitespace-only.
    #[error("signature name cannot be empty")]
    EmptySignatureName,
    /// Parameter name is not an identifier.
    #[error("invalid parameter name: {0:?}")]
    InvalidParameterName(String),
    /// Parameter name is taken by the generated help switch.
    #[error("parameter name is reserved: {0}")]
    ReservedName(String),
    /// Two parameters share a name.
    #[error("duplicate parameter: {0}")]
    DuplicateParameter(String),
    /// More than one parameter collects remaining positional values.
    #[error("more than one variadic positional parameter: {0}")]
    MultipleVarPositional(String),
    /// More than one parameter collects remaining named values.
    #[error("more than one variadic keyword parameter: {0}")]
    MultipleVarKeyword(String),
    /// A receiver appears anywhere but first.
    #[error("receiver parameter must come first: {0}")]
    MisplacedReceiver(String),
    /// Parameter kinds are not in positional, variadic, keyword order.
    #[error("parameter {0} is declared out of order")]
    OutOfOrder(String),
    /// Two parameters map onto the same command-line switch.
    #[error("parameters {0} and {1} both map to switch --{2}")]
    SwitchCollision(String, String, String),
}

/// Validates a declared signature.
///
/// Returns every problem found; an empty vector means the signature can be
/// turned into a schema.
///
/// # Examples
///
/// ```
/// use programmify_core::*;
///
/// let sig = Signature::new("f")
///     .with_param(Parameter::var_positional("args"))
///     .with_param(Parameter::positional("late"));
/// assert_eq!(
///     validate_signature(&sig),
///     vec![ValidationError::OutOfOrder("late".into())]
/// );
/// ```
pub fn validate_signature(signature: &Signature) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if signature.name.trim().is_empty() {
        errors.push(ValidationError::EmptySignatureName);
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut var_positional: Option<&str> = None;
    let mut var_keyword: Option<&str> = None;
    let mut last_rank = 0u8;

    for (idx, param) in signature.params.iter().enumerate() {
        let name = param.name.as_str();

        if !is_identifier(name) {
            errors.push(ValidationError::InvalidParameterName(name.to_string()));
            continue;
        }
        if RESERVED_NAMES.contains(&name) {
            errors.push(ValidationError::ReservedName(name.to_string()));
            continue;
        }
        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateParameter(name.to_string()));
            continue;
        }

        match param.kind {
            ParamKind::Receiver if idx != 0 => {
                errors.push(ValidationError::MisplacedReceiver(name.to_string()));
                continue;
            }
            ParamKind::VarPositional if var_positional.is_some() => {
                errors.push(ValidationError::MultipleVarPositional(name.to_string()));
                continue;
            }
            ParamKind::VarKeyword if var_keyword.is_some() => {
                errors.push(ValidationError::MultipleVarKeyword(name.to_string()));
                continue;
            }
            ParamKind::VarPositional => var_positional = Some(name),
            ParamKind::VarKeyword => var_keyword = Some(name),
            _ => {}
        }

        let rank = kind_rank(param.kind);
        if rank < last_rank {
            errors.push(ValidationError::OutOfOrder(name.to_string()));
        } else {
            last_rank = rank;
        }
    }

    errors.extend(switch_collisions(signature));
    errors
}

/// Calling-convention order: receiver, positionals, `*args`, keywords, `**kwargs`.
fn kind_rank(kind: ParamKind) -> u8 {
    match kind {
        ParamKind::Receiver => 0,
        ParamKind::Positional => 1,
        ParamKind::VarPositional => 2,
        ParamKind::Keyword => 3,
        ParamKind::VarKeyword => 4,
    }
}

/// Checks dashed switch names plus the inverted `no-` form of booleans. The
/// effective flag default is unknown before overrides apply, so both forms
/// of every boolean are reserved.
fn switch_collisions(signature: &Signature) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut owners: Vec<(String, &str)> = Vec::new();

    for param in &signature.params {
        if matches!(
            param.kind,
            ParamKind::Receiver | ParamKind::VarPositional | ParamKind::VarKeyword
        ) {
            continue;
        }
        let dashed = param.name.replace('_', "-");
        let mut switches = vec![dashed.clone()];
        if param.annotation == Some(crate::ValueType::Bool)
            || matches!(param.default, Some(serde_json::Value::Bool(_)))
        {
            switches.push(format!("no-{dashed}"));
        }

        for switch in switches {
            if let Some((_, owner)) = owners.iter().find(|(s, _)| *s == switch) {
                if *owner != param.name {
                    errors.push(ValidationError::SwitchCollision(
                        owner.to_string(),
                        param.name.clone(),
                        switch.clone(),
                    ));
                }
                continue;
            }
            owners.push((switch, param.name.as_str()));
        }
    }

    errors
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
