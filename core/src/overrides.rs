//! Caller-supplied default overrides.
//!
//! A program wrapping a callable can replace the callable's own defaults
//! without touching its declaration, e.g. from a configuration file. The
//! value in effect for a parameter is its *effective default*.
//!
//! # Example
//!
//! ```
//! use programmify_core::*;
//! use serde_json::json;
//!
//! let sig = Signature::new("serve")
//!     .with_param(Parameter::keyword("port").with_default(8080));
//!
//! let mut overrides = Overrides::new();
//! overrides.insert("port".into(), json!(9000));
//!
//! let port = sig.find("port").unwrap();
//! assert_eq!(effective_default(port, &overrides), Some(&json!(9000)));
//! ```

use serde_json::{Map, Value};

use crate::{ParamKind, Parameter, Signature};

/// Parameter name to replacement default.
pub type Overrides = Map<String, Value>;

/// Override if present, else the declared default, else none.
pub fn effective_default<'a>(param: &'a Parameter, overrides: &'a Overrides) -> Option<&'a Value> {
    overrides.get(&param.name).or(param.default.as_ref())
}

/// Override keys that name no overridable parameter of `signature`.
///
/// Variadic parameters and the receiver cannot take a default.
pub fn unknown_overrides<'a>(signature: &Signature, overrides: &'a Overrides) -> Vec<&'a str> {
    overrides
        .keys()
        .filter(|key| {
            !signature.params.iter().any(|p| {
                p.name == **key && matches!(p.kind, ParamKind::Positional | ParamKind::Keyword)
            })
        })
        .map(String::as_str)
        .collect()
}

/// Layers `overlay` on top of `base`; overlay values win.
///
/// # Examples
///
/// ```
/// use programmify_core::{Overrides, merge_overrides};
/// use serde_json::json;
///
/// let mut file = Overrides::new();
/// file.insert("name".into(), json!("from-file"));
/// file.insert("size".into(), json!(32));
///
/// let mut code = Overrides::new();
/// code.insert("name".into(), json!("from-code"));
///
/// let merged = merge_overrides(&file, &code);
/// assert_eq!(merged["name"], json!("from-code"));
/// assert_eq!(merged["size"], json!(32));
/// ```
pub fn merge_overrides(base: &Overrides, overlay: &Overrides) -> Overrides {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
