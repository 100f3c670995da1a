//! Signature and schema type definitions.
//!
//! Two layers live here. A [`Signature`] is the declared shape of a callable:
//! its parameters in declaration order with optional annotations, defaults
//! and a documentation block. An [`ArgumentSchema`] is what a signature turns
//! into once defaults are resolved and every parameter has been classified
//! for the command line. [`RuntimeBindings`] carry parsed values back to the
//! callable.
//!
//! All types serialize with [`serde`] so signatures can be written by hand in
//! JSON or YAML and schemas can be printed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Value type of a parameter.
///
/// Drives how a command-line token is coerced into a [`Value`].
///
/// # Examples
///
/// ```
/// use programmify_core::ValueType;
/// use serde_json::json;
///
/// assert_eq!(ValueType::of(&json!(3)), Some(ValueType::Int));
/// assert_eq!(ValueType::of(&json!("x")), Some(ValueType::String));
/// assert_eq!(ValueType::of(&json!(null)), None);
/// assert_eq!(ValueType::Int.parse_token("42").unwrap(), json!(42));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Free text (the fallback type).
    #[default]
    String,
    /// Signed 64-bit integer.
    Int,
    /// Floating point number.
    Float,
    /// Boolean; parameters of this type become flags.
    Bool,
    /// List of strings, supplied comma-separated or by repeating the switch.
    List,
    /// JSON object.
    Map,
}

impl ValueType {
    /// Infers the type of a concrete value. `null` has no type.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(Self::Bool),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(Self::Int),
            Value::Number(_) => Some(Self::Float),
            Value::String(_) => Some(Self::String),
            Value::Array(_) => Some(Self::List),
            Value::Object(_) => Some(Self::Map),
        }
    }

    /// Lowercase name used in help output and serialized schemas.
    pub fn label(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::List => "list",
            Self::Map => "map",
        }
    }

    /// Placeholder shown for the value of a switch in usage text.
    pub fn value_name(self) -> &'static str {
        match self {
            Self::String => "TEXT",
            Self::Int | Self::Float => "NUMBER",
            Self::Bool => "BOOL",
            Self::List => "ITEM",
            Self::Map => "JSON",
        }
    }

    /// Coerces a single command-line token.
    ///
    /// `List` tokens yield one string item; the caller collects items into
    /// an array.
    pub fn parse_token(self, raw: &str) -> Result<Value, String> {
        match self {
            Self::String | Self::List => Ok(Value::String(raw.to_string())),
            Self::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| format!("invalid integer value: '{raw}'")),
            Self::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("invalid float value: '{raw}'")),
            Self::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
                "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
                _ => Err(format!("invalid boolean value: '{raw}'")),
            },
            Self::Map => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => Ok(Value::Object(map)),
                Ok(_) => Err(format!("expected a JSON object: '{raw}'")),
                Err(e) => Err(format!("invalid JSON object '{raw}': {e}")),
            },
        }
    }
}

/// How a declared parameter is passed to the callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Implicit instance-binding first parameter (e.g. `self`); never on the
    /// command line.
    Receiver,
    /// Accepted by position or by name.
    #[default]
    Positional,
    /// Accepted by name only.
    Keyword,
    /// Collects any remaining positional values.
    VarPositional,
    /// Collects any remaining named values.
    VarKeyword,
}

/// One declared parameter of a callable.
///
/// # Examples
///
/// ```
/// use programmify_core::{ParamKind, Parameter, ValueType};
/// use serde_json::json;
///
/// let count = Parameter::positional("count").with_type(ValueType::Int);
/// assert_eq!(count.kind, ParamKind::Positional);
/// assert!(count.default.is_none());
///
/// let name = Parameter::keyword("name").with_default(json!("world"));
/// assert_eq!(name.default, Some(json!("world")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Identifier, unique within the signature.
    pub name: String,
    #[serde(default)]
    pub kind: ParamKind,
    /// Explicit type annotation.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub annotation: Option<ValueType>,
    /// Declared default. `Some(Value::Null)` is a real default of `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Parameter {
    fn new(name: &str, kind: ParamKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            annotation: None,
            default: None,
        }
    }

    pub fn receiver(name: &str) -> Self {
        Self::new(name, ParamKind::Receiver)
    }

    pub fn positional(name: &str) -> Self {
        Self::new(name, ParamKind::Positional)
    }

    pub fn keyword(name: &str) -> Self {
        Self::new(name, ParamKind::Keyword)
    }

    pub fn var_positional(name: &str) -> Self {
        Self::new(name, ParamKind::VarPositional)
    }

    pub fn var_keyword(name: &str) -> Self {
        Self::new(name, ParamKind::VarKeyword)
    }

    /// Sets the type annotation.
    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.annotation = Some(value_type);
        self
    }

    /// Sets the declared default.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Declared signature of a callable.
///
/// This is the explicit replacement for runtime introspection: list the
/// parameters in declaration order and attach the documentation block whose
/// `name (type): description` lines provide per-parameter help.
///
/// # Examples
///
/// ```
/// use programmify_core::{Parameter, Signature, ValueType};
///
/// let sig = Signature::new("add")
///     .with_doc("Add two numbers.\n\na (int): first\nb (int): second")
///     .with_param(Parameter::positional("a").with_type(ValueType::Int))
///     .with_param(Parameter::positional("b").with_type(ValueType::Int));
///
/// assert_eq!(sig.params.len(), 2);
/// assert!(sig.find("b").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    /// Name of the callable; becomes the program name in usage text.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default)]
    pub params: Vec<Parameter>,
}

impl Signature {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.to_string());
        self
    }

    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Finds a declared parameter by name.
    pub fn find(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Returns `true` if the signature declares `name` (receiver excluded).
    pub fn declares(&self, name: &str) -> bool {
        self.params
            .iter()
            .any(|p| p.name == name && p.kind != ParamKind::Receiver)
    }
}

/// Command-line classification of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterKind {
    /// A positional slot that must be filled.
    PositionalRequired,
    /// Collects remaining positional values.
    PositionalVariadic,
    /// A named switch with a fallback value.
    KeywordOptional,
    /// Collects undeclared named switches.
    KeywordVariadic,
}

/// One command-line entry derived from a declared parameter.
///
/// # Examples
///
/// ```
/// use programmify_core::{ParameterKind, ParameterSpec, ValueType};
/// use serde_json::json;
///
/// let spec = ParameterSpec {
///     name: "show_cmd".into(),
///     kind: ParameterKind::KeywordOptional,
///     declared_type: ValueType::Bool,
///     default_value: Some(json!(true)),
///     help_text: "Show-Cmd".into(),
///     is_required: false,
///     is_flag: true,
///     accepts_positional: true,
/// };
/// assert_eq!(spec.switch_name(), "show-cmd");
/// assert_eq!(spec.long_switch().as_deref(), Some("no-show-cmd"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParameterKind,
    pub declared_type: ValueType,
    /// Effective default after overrides.
    pub default_value: Option<Value>,
    pub help_text: String,
    pub is_required: bool,
    pub is_flag: bool,
    /// The callable accepts this parameter by position.
    pub accepts_positional: bool,
}

impl ParameterSpec {
    /// Parameter name with underscores replaced by dashes.
    pub fn switch_name(&self) -> String {
        self.name.replace('_', "-")
    }

    /// Long switch (without leading dashes) for named entries.
    ///
    /// Flags defaulting to `true` get the inverted `no-` switch. Positional
    /// slots and the keyword variadic have no switch.
    pub fn long_switch(&self) -> Option<String> {
        match self.kind {
            ParameterKind::PositionalRequired
            | ParameterKind::PositionalVariadic
            | ParameterKind::KeywordVariadic => None,
            ParameterKind::KeywordOptional if self.is_flag && self.flag_default() => {
                Some(format!("no-{}", self.switch_name()))
            }
            ParameterKind::KeywordOptional => Some(self.switch_name()),
        }
    }

    /// Default of a flag parameter; anything but `true` counts as `false`.
    pub fn flag_default(&self) -> bool {
        matches!(self.default_value, Some(Value::Bool(true)))
    }
}

/// Ordered command-line schema of a callable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSchema {
    /// Program name shown in usage text.
    pub command: String,
    /// First line of the documentation block.
    pub description: Option<String>,
    pub parameters: Vec<ParameterSpec>,
}

impl ArgumentSchema {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            ..Default::default()
        }
    }

    pub fn find(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn positional_variadic(&self) -> Option<&ParameterSpec> {
        self.parameters
            .iter()
            .find(|p| p.kind == ParameterKind::PositionalVariadic)
    }

    pub fn keyword_variadic(&self) -> Option<&ParameterSpec> {
        self.parameters
            .iter()
            .find(|p| p.kind == ParameterKind::KeywordVariadic)
    }

    /// All long switches the schema declares, in schema order.
    pub fn switches(&self) -> Vec<String> {
        self.parameters
            .iter()
            .filter_map(ParameterSpec::long_switch)
            .collect()
    }
}

/// Arguments ready to be handed to the callable.
///
/// Holds the positional sequence and the keyword mapping produced by the
/// binder, plus the names of the positional-capable parameters so values can
/// be looked up by name wherever they ended up.
///
/// # Examples
///
/// ```
/// use programmify_core::RuntimeBindings;
/// use serde_json::{json, Map};
///
/// let mut keywords = Map::new();
/// keywords.insert("b".into(), json!("hello"));
/// let bindings = RuntimeBindings::new(
///     vec![json!(5), json!(6), json!(7)],
///     keywords,
///     vec!["a".into()],
/// );
///
/// assert_eq!(bindings.get_i64("a"), Some(5));
/// assert_eq!(bindings.get_str("b"), Some("hello"));
/// assert_eq!(bindings.rest(), &[json!(6), json!(7)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeBindings {
    pub positional: Vec<Value>,
    pub keywords: Map<String, Value>,
    /// Names of the parameters occupying the leading positional slots.
    #[serde(skip)]
    pub slots: Vec<String>,
}

impl RuntimeBindings {
    pub fn new(positional: Vec<Value>, keywords: Map<String, Value>, slots: Vec<String>) -> Self {
        Self {
            positional,
            keywords,
            slots,
        }
    }

    /// Looks a parameter up by name: keywords first, then its positional slot.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.keywords.get(name).or_else(|| {
            self.slots
                .iter()
                .position(|slot| slot == name)
                .and_then(|idx| self.positional.get(idx))
        })
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Positional values beyond the named slots (the variadic tail).
    pub fn rest(&self) -> &[Value] {
        let named = self.slots.len().min(self.positional.len());
        &self.positional[named..]
    }

    /// Bindings as a JSON object with `args` and `kwargs` members.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("args".into(), Value::Array(self.positional.clone()));
        out.insert("kwargs".into(), Value::Object(self.keywords.clone()));
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn spec(name: &str, kind: ParameterKind, is_flag: bool, default: Option<Value>) -> ParameterSpec {
        ParameterSpec {
            name: name.to_string(),
            kind,
            declared_type: if is_flag { ValueType::Bool } else { ValueType::String },
            default_value: default,
            help_text: String::new(),
            is_required: false,
            is_flag,
            accepts_positional: false,
        }
    }

    #[test]
    fn test_value_type_inference() {
        assert_eq!(ValueType::of(&json!(true)), Some(ValueType::Bool));
        assert_eq!(ValueType::of(&json!(1.5)), Some(ValueType::Float));
        assert_eq!(ValueType::of(&json!(["a"])), Some(ValueType::List));
        assert_eq!(ValueType::of(&json!({"k": 1})), Some(ValueType::Map));
    }

    #[test]
    fn test_parse_token_rejects_bad_numbers() {
        assert!(ValueType::Int.parse_token("five").is_err());
        assert!(ValueType::Float.parse_token("NaN").is_err());
        assert_eq!(ValueType::Float.parse_token("2.5").unwrap(), json!(2.5));
    }

    #[test]
    fn test_parse_token_map_requires_object() {
        assert_eq!(
            ValueType::Map.parse_token(r#"{"a": 1}"#).unwrap(),
            json!({"a": 1})
        );
        assert!(ValueType::Map.parse_token("[1, 2]").is_err());
    }

    #[test]
    fn test_long_switch_forms() {
        let opt = spec("dst_dir", ParameterKind::KeywordOptional, false, None);
        assert_eq!(opt.long_switch().as_deref(), Some("dst-dir"));

        let off = spec("cleanup", ParameterKind::KeywordOptional, true, Some(json!(false)));
        assert_eq!(off.long_switch().as_deref(), Some("cleanup"));

        let on = spec("cleanup", ParameterKind::KeywordOptional, true, Some(json!(true)));
        assert_eq!(on.long_switch().as_deref(), Some("no-cleanup"));

        let pos = spec("file", ParameterKind::PositionalRequired, false, None);
        assert_eq!(pos.long_switch(), None);
    }

    #[test]
    fn test_signature_deserializes_from_json() {
        let sig: Signature = serde_json::from_value(json!({
            "name": "build",
            "params": [
                {"name": "file", "type": "string"},
                {"name": "windowed", "kind": "keyword", "default": true},
                {"name": "rest", "kind": "var_positional"}
            ]
        }))
        .unwrap();

        assert_eq!(sig.params[0].kind, ParamKind::Positional);
        assert_eq!(sig.params[0].annotation, Some(ValueType::String));
        assert_eq!(sig.params[1].default, Some(json!(true)));
        assert_eq!(sig.params[2].kind, ParamKind::VarPositional);
    }

    #[test]
    fn test_bindings_lookup_prefers_keywords() {
        let mut keywords = Map::new();
        keywords.insert("a".into(), json!(9));
        let bindings = RuntimeBindings::new(vec![json!(1)], keywords, vec!["a".into()]);
        assert_eq!(bindings.get_i64("a"), Some(9));
        assert!(bindings.get("missing").is_none());
    }
}
