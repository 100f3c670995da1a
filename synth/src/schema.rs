//! Schema builder: declared signature to [`ArgumentSchema`].

use programmify_core::{
    ArgumentSchema, Overrides, ParamKind, ParameterKind, ParameterSpec, Signature, ValueType,
    effective_default, unknown_overrides,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::docs::{DocBlock, title_case};

/// Derives the command-line schema of `signature`.
///
/// Parameters are classified in declaration order, the receiver is skipped,
/// and every entry gets its effective default (override, else declared
/// default), effective type (annotation, else type of the effective default,
/// else string) and help text (documented description, else the title-cased
/// dashed name). Boolean parameters become flags and are never positionally
/// required.
///
/// # Examples
///
/// ```
/// use programmify_core::*;
/// use programmify_synth::build_schema;
///
/// let sig = Signature::new("f")
///     .with_doc("Do things.\na (int): first\nb (str): second")
///     .with_param(Parameter::positional("a").with_type(ValueType::Int))
///     .with_param(Parameter::positional("b").with_type(ValueType::String).with_default("x"));
///
/// let schema = build_schema(&sig, &Overrides::new());
/// assert_eq!(schema.description.as_deref(), Some("Do things."));
/// assert_eq!(schema.parameters[0].kind, ParameterKind::PositionalRequired);
/// assert_eq!(schema.parameters[0].help_text, "first");
/// assert_eq!(schema.parameters[1].kind, ParameterKind::KeywordOptional);
/// assert_eq!(schema.parameters[1].help_text, "second");
/// ```
pub fn build_schema(signature: &Signature, overrides: &Overrides) -> ArgumentSchema {
    let docs = DocBlock::parse(signature.doc.as_deref().unwrap_or_default());

    for key in unknown_overrides(signature, overrides) {
        warn!(command = %signature.name, parameter = key, "Ignoring default override for unknown parameter");
    }

    let mut schema = ArgumentSchema::new(&signature.name);
    schema.description = docs.summary.clone();

    for param in &signature.params {
        if param.kind == ParamKind::Receiver {
            continue;
        }

        let default = match param.kind {
            ParamKind::VarPositional | ParamKind::VarKeyword => None,
            _ => effective_default(param, overrides).cloned(),
        };
        let declared_type = param
            .annotation
            .or_else(|| default.as_ref().and_then(ValueType::of))
            .unwrap_or_default();
        let is_flag = declared_type == ValueType::Bool
            && matches!(param.kind, ParamKind::Positional | ParamKind::Keyword);

        let kind = match param.kind {
            ParamKind::VarPositional => ParameterKind::PositionalVariadic,
            ParamKind::VarKeyword => ParameterKind::KeywordVariadic,
            ParamKind::Positional if default.is_none() && !is_flag => {
                ParameterKind::PositionalRequired
            }
            _ => ParameterKind::KeywordOptional,
        };

        let default_value = match kind {
            ParameterKind::KeywordOptional if is_flag => {
                Some(Value::Bool(matches!(default, Some(Value::Bool(true)))))
            }
            ParameterKind::KeywordOptional => Some(default.unwrap_or(Value::Null)),
            _ => default,
        };

        let help_text = docs
            .description_for(&param.name)
            .map(String::from)
            .unwrap_or_else(|| title_case(&param.name.replace('_', "-")));

        schema.parameters.push(ParameterSpec {
            name: param.name.clone(),
            kind,
            declared_type,
            default_value,
            help_text,
            is_required: kind == ParameterKind::PositionalRequired,
            is_flag,
            accepts_positional: matches!(
                param.kind,
                ParamKind::Positional | ParamKind::VarPositional
            ),
        });
    }

    debug!(
        command = %schema.command,
        parameters = schema.parameters.len(),
        documented = docs.len(),
        "Built argument schema"
    );

    schema
}
