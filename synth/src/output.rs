//! Output formatting for argument schemas.

use programmify_core::{ArgumentSchema, ParameterKind, ParameterSpec};
use serde_json::Value;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Formats a schema in the requested output format.
pub fn format_schema(schema: &ArgumentSchema, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(schema)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(schema).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(schema_to_markdown(schema)),
        OutputFormat::Table => Ok(schema_to_table(schema)),
    }
}

/// How the entry appears on the command line, e.g. `--no-cleanup` or `NAME...`.
fn usage_label(spec: &ParameterSpec) -> String {
    match spec.kind {
        ParameterKind::PositionalRequired => spec.name.to_ascii_uppercase(),
        ParameterKind::PositionalVariadic => format!("[{}...]", spec.name.to_ascii_uppercase()),
        ParameterKind::KeywordVariadic => "--<key> <value>".to_string(),
        ParameterKind::KeywordOptional => {
            let switch = spec.long_switch().unwrap_or_else(|| spec.switch_name());
            if spec.is_flag {
                format!("--{switch}")
            } else {
                format!("--{switch} <{}>", spec.declared_type.value_name())
            }
        }
    }
}

fn default_label(spec: &ParameterSpec) -> String {
    match &spec.default_value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn schema_to_markdown(schema: &ArgumentSchema) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", schema.command));

    if let Some(ref desc) = schema.description {
        out.push_str(&format!("{desc}\n\n"));
    }

    let (positional, named): (Vec<&ParameterSpec>, Vec<&ParameterSpec>) =
        schema.parameters.iter().partition(|p| {
            matches!(
                p.kind,
                ParameterKind::PositionalRequired | ParameterKind::PositionalVariadic
            )
        });

    if !positional.is_empty() {
        out.push_str("## Arguments\n\n");
        out.push_str("| Argument | Type | Required | Description |\n");
        out.push_str("|----------|------|----------|-------------|\n");
        for spec in positional {
            let required = if spec.is_required { "yes" } else { "no" };
            out.push_str(&format!(
                "| `{}` | {} | {required} | {} |\n",
                usage_label(spec),
                spec.declared_type.label(),
                spec.help_text
            ));
        }
        out.push('\n');
    }

    if !named.is_empty() {
        out.push_str("## Options\n\n");
        out.push_str("| Option | Type | Default | Description |\n");
        out.push_str("|--------|------|---------|-------------|\n");
        for spec in named {
            out.push_str(&format!(
                "| `{}` | {} | {} | {} |\n",
                usage_label(spec),
                spec.declared_type.label(),
                default_label(spec),
                spec.help_text
            ));
        }
        out.push('\n');
    }

    out
}

fn schema_to_table(schema: &ArgumentSchema) -> String {
    let mut out = String::new();

    out.push_str(&format!("Command: {}\n", schema.command));
    if let Some(ref desc) = schema.description {
        out.push_str(&format!("  {desc}\n"));
    }

    if schema.parameters.is_empty() {
        return out;
    }

    let labels: Vec<String> = schema.parameters.iter().map(usage_label).collect();
    let width = labels.iter().map(String::len).max().unwrap_or(4);

    out.push_str("\nParameters:\n");
    for (spec, label) in schema.parameters.iter().zip(&labels) {
        let default = default_label(spec);
        if default.is_empty() {
            out.push_str(&format!("  {label:<width$}  {}\n", spec.help_text));
        } else {
            out.push_str(&format!(
                "  {label:<width$}  {} [default: {default}]\n",
                spec.help_text
            ));
        }
    }

    out
}
