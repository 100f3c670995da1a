//! Argument parser and binder.
//!
//! Turns an [`ArgumentSchema`] into a `clap` command at runtime, parses the
//! process arguments with it and rebuilds the callable's argument list:
//! positional values first, then a keyword mapping. `clap` owns validation,
//! usage text and error reporting; this module owns the mapping between
//! schema entries and `clap` arguments.

use std::collections::HashSet;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use programmify_core::{ArgumentSchema, ParameterKind, ParameterSpec, RuntimeBindings, ValueType};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::AdapterConfig;
use crate::logging::{LogLevel, select_level};

/// Id of the injected silencing switch.
pub const QUIET: &str = "quiet";

/// Id namespace for undeclared switches collected by a keyword variadic.
const EXTRA_PREFIX: &str = "extra:";

/// Binder settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindOptions {
    /// Inject `--quiet` and one switch per entry of `log_levels`.
    pub augment: bool,
    /// Severity switches, in selection priority order.
    pub log_levels: Vec<LogLevel>,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            augment: true,
            log_levels: LogLevel::ALL.to_vec(),
        }
    }
}

impl From<&AdapterConfig> for BindOptions {
    fn from(config: &AdapterConfig) -> Self {
        Self {
            augment: config.augment,
            log_levels: config.log_levels.clone(),
        }
    }
}

/// Arguments supplied by the calling code rather than the command line.
///
/// Positional values fill the leading slots, and keyword values replace
/// parsed ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.to_string(), value.into());
        self
    }
}

/// Command-line-only settings picked up by the injected switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliControls {
    /// Silence the callable's output streams for the call.
    pub quiet: bool,
    /// Verbosity to install before the call.
    pub log_level: Option<LogLevel>,
}

/// Result of parsing a command line.
#[derive(Debug, Clone, PartialEq)]
pub enum BindOutcome {
    /// Help was requested; the rendered usage text. The callable must not run.
    Help(String),
    /// Arguments are ready for the callable.
    Bound {
        bindings: RuntimeBindings,
        controls: CliControls,
    },
}

/// Parses `process_args` (without the program name) against `schema`.
///
/// # Errors
///
/// Returns the `clap` error for malformed command lines: missing or surplus
/// positionals, unknown switches, values that fail type coercion.
///
/// # Examples
///
/// ```
/// use programmify_core::*;
/// use programmify_synth::{BindOptions, BindOutcome, build_schema, parse_and_bind};
///
/// let sig = Signature::new("f")
///     .with_param(Parameter::positional("a").with_type(ValueType::Int))
///     .with_param(Parameter::positional("b").with_default("x"));
/// let schema = build_schema(&sig, &Overrides::new());
///
/// let outcome = parse_and_bind(&schema, ["5", "--b", "hello"], &BindOptions::default()).unwrap();
/// let BindOutcome::Bound { bindings, .. } = outcome else { panic!("expected bindings") };
/// assert_eq!(bindings.get_i64("a"), Some(5));
/// assert_eq!(bindings.get_str("b"), Some("hello"));
/// ```
pub fn parse_and_bind<I, T>(
    schema: &ArgumentSchema,
    process_args: I,
    options: &BindOptions,
) -> Result<BindOutcome, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    parse_and_bind_with(schema, process_args, options, &CallArgs::default())
}

/// Like [`parse_and_bind`], reconciling with arguments from the caller's code.
pub fn parse_and_bind_with<I, T>(
    schema: &ArgumentSchema,
    process_args: I,
    options: &BindOptions,
    call: &CallArgs,
) -> Result<BindOutcome, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let tokens: Vec<String> = process_args.into_iter().map(Into::into).collect();
    let injected = Injected::for_schema(schema, options);
    let (extras, tokens) = match schema.keyword_variadic() {
        Some(_) => undeclared_switches(tokens, &injected.known_switches(schema)),
        None => (Vec::new(), tokens),
    };

    let command = build_command(schema, &injected, &extras);
    let argv = std::iter::once(schema.command.clone()).chain(tokens);
    let matches = match command.try_get_matches_from(argv) {
        Ok(matches) => matches,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            return Ok(BindOutcome::Help(err.render().to_string()));
        }
        Err(err) => return Err(err),
    };

    let controls = CliControls {
        quiet: injected.quiet && matches.get_flag(QUIET),
        log_level: select_level(&injected.levels, |level| matches.get_flag(level.name())),
    };

    let (parsed, varargs) = collect_values(schema, &matches, &extras);
    let bindings = reconcile(schema, parsed, varargs, call);

    debug!(
        command = %schema.command,
        positional = bindings.positional.len(),
        keywords = bindings.keywords.len(),
        extras = extras.len(),
        "Bound command-line arguments"
    );

    Ok(BindOutcome::Bound { bindings, controls })
}

/// Renders the usage text of `schema` without parsing anything.
pub fn render_help(schema: &ArgumentSchema, options: &BindOptions) -> String {
    let injected = Injected::for_schema(schema, options);
    build_command(schema, &injected, &[])
        .render_help()
        .to_string()
}

/// Switches added on top of the schema.
struct Injected {
    quiet: bool,
    levels: Vec<LogLevel>,
}

impl Injected {
    fn for_schema(schema: &ArgumentSchema, options: &BindOptions) -> Self {
        if !options.augment {
            return Self {
                quiet: false,
                levels: Vec::new(),
            };
        }

        let taken: HashSet<String> = schema
            .parameters
            .iter()
            .map(|p| p.name.clone())
            .chain(schema.switches())
            .collect();

        let mut levels: Vec<LogLevel> = Vec::new();
        for level in &options.log_levels {
            if !taken.contains(level.name()) && !levels.contains(level) {
                levels.push(*level);
            }
        }

        Self {
            quiet: !taken.contains(QUIET),
            levels,
        }
    }

    fn known_switches(&self, schema: &ArgumentSchema) -> HashSet<String> {
        let mut known: HashSet<String> = schema.switches().into_iter().collect();
        known.insert("help".to_string());
        if self.quiet {
            known.insert(QUIET.to_string());
        }
        known.extend(self.levels.iter().map(|l| l.name().to_string()));
        known
    }
}

/// Switches on the command line that the schema does not declare, along
/// with the tokens to parse, where undeclared `-key` is spelled `--key`.
///
/// Scanning stops at `--`. `--key=value` and `-key=value` count as `key`.
fn undeclared_switches(tokens: Vec<String>, known: &HashSet<String>) -> (Vec<String>, Vec<String>) {
    let mut found: Vec<String> = Vec::new();
    let mut argv: Vec<String> = Vec::with_capacity(tokens.len());
    let mut rest = tokens.into_iter();

    for token in rest.by_ref() {
        if token == "--" {
            argv.push(token);
            break;
        }
        let Some((key, single_dash)) = switch_key(&token) else {
            argv.push(token);
            continue;
        };
        if known.contains(&key) {
            argv.push(token);
            continue;
        }
        if !found.contains(&key) {
            found.push(key);
        }
        argv.push(if single_dash { format!("-{token}") } else { token });
    }
    argv.extend(rest);

    (found, argv)
}

/// Key named by a switch token and whether it was written with one dash.
///
/// `-h` and negative numbers are not switch keys.
fn switch_key(token: &str) -> Option<(String, bool)> {
    let (body, single_dash) = match token.strip_prefix("--") {
        Some(body) => (body, false),
        None => (token.strip_prefix('-')?, true),
    };
    if single_dash && (body == "h" || is_negative_number(token)) {
        return None;
    }
    let key = body.split_once('=').map_or(body, |(key, _)| key);
    (!key.is_empty()).then(|| (key.to_string(), single_dash))
}

fn is_negative_number(token: &str) -> bool {
    token
        .strip_prefix('-')
        .and_then(|digits| digits.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
        && token.parse::<f64>().is_ok()
}

fn build_command(schema: &ArgumentSchema, injected: &Injected, extras: &[String]) -> Command {
    // A repeated switch keeps its last value.
    let mut command = Command::new(schema.command.clone())
        .disable_version_flag(true)
        .args_override_self(true);
    if let Some(description) = &schema.description {
        command = command.about(description.clone());
    }

    for spec in &schema.parameters {
        if let Some(arg) = arg_for(spec) {
            command = command.arg(arg);
        }
    }

    if let Some(collector) = schema.keyword_variadic() {
        for key in extras {
            command = command.arg(
                Arg::new(format!("{EXTRA_PREFIX}{key}"))
                    .long(key.clone())
                    .value_name("VALUE")
                    .action(ArgAction::Set)
                    .allow_negative_numbers(true)
                    .value_parser(token_parser(ValueType::String))
                    .help(format!("Goes to {}", collector.name)),
            );
        }
    }

    if injected.quiet {
        command = command.arg(
            Arg::new(QUIET)
                .long(QUIET)
                .action(ArgAction::SetTrue)
                .help("Suppress output"),
        );
    }
    for level in &injected.levels {
        command = command.arg(
            Arg::new(level.name())
                .long(level.name())
                .action(ArgAction::SetTrue)
                .help(format!(
                    "Set logging level to {}",
                    level.name().to_ascii_uppercase()
                )),
        );
    }

    command
}

fn token_parser(value_type: ValueType) -> impl Fn(&str) -> Result<Value, String> + Clone + Send + Sync + 'static {
    move |raw: &str| value_type.parse_token(raw)
}

fn arg_for(spec: &ParameterSpec) -> Option<Arg> {
    let name = spec.name.clone();
    let help = spec.help_text.clone();
    let parser = token_parser(spec.declared_type);

    let arg = match spec.kind {
        ParameterKind::KeywordVariadic => return None,
        ParameterKind::PositionalRequired => Arg::new(name)
            .value_name(spec.name.to_ascii_uppercase())
            .required(true)
            .action(ArgAction::Set)
            .allow_negative_numbers(true)
            .value_parser(parser)
            .help(help),
        ParameterKind::PositionalVariadic => Arg::new(name)
            .value_name(spec.name.to_ascii_uppercase())
            .num_args(0..)
            .action(ArgAction::Append)
            .allow_negative_numbers(true)
            .value_parser(parser)
            .help(help),
        ParameterKind::KeywordOptional if spec.is_flag => {
            let action = if spec.flag_default() {
                ArgAction::SetFalse
            } else {
                ArgAction::SetTrue
            };
            Arg::new(name)
                .long(spec.long_switch()?)
                .action(action)
                .help(help)
        }
        ParameterKind::KeywordOptional => {
            let arg = Arg::new(name)
                .long(spec.long_switch()?)
                .value_name(spec.declared_type.value_name())
                .allow_negative_numbers(true)
                .value_parser(parser)
                .help(help);
            if spec.declared_type == ValueType::List {
                arg.action(ArgAction::Append).value_delimiter(',')
            } else {
                arg.action(ArgAction::Set)
            }
        }
    };
    Some(arg)
}

/// Values keyed by parameter name, plus the positional variadic's values.
fn collect_values(
    schema: &ArgumentSchema,
    matches: &ArgMatches,
    extras: &[String],
) -> (Map<String, Value>, Vec<Value>) {
    let mut parsed = Map::new();
    let mut varargs = Vec::new();

    for spec in &schema.parameters {
        let name = spec.name.as_str();
        let fallback = || spec.default_value.clone().unwrap_or(Value::Null);
        match spec.kind {
            ParameterKind::KeywordVariadic => {}
            ParameterKind::PositionalVariadic => {
                varargs = matches
                    .get_many::<Value>(name)
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default();
            }
            ParameterKind::KeywordOptional if spec.is_flag => {
                parsed.insert(name.to_string(), Value::Bool(matches.get_flag(name)));
            }
            ParameterKind::KeywordOptional if spec.declared_type == ValueType::List => {
                let value = matches
                    .get_many::<Value>(name)
                    .map(|values| Value::Array(values.cloned().collect()))
                    .unwrap_or_else(fallback);
                parsed.insert(name.to_string(), value);
            }
            ParameterKind::PositionalRequired | ParameterKind::KeywordOptional => {
                let value = matches
                    .get_one::<Value>(name)
                    .cloned()
                    .unwrap_or_else(fallback);
                parsed.insert(name.to_string(), value);
            }
        }
    }

    for key in extras {
        let id = format!("{EXTRA_PREFIX}{key}");
        if let Some(value) = matches.get_one::<Value>(&id) {
            // Declared parameters win on collision.
            parsed
                .entry(key.replace('-', "_"))
                .or_insert_with(|| value.clone());
        }
    }

    (parsed, varargs)
}

/// Rebuilds the call: caller positionals fill the leading slots, remaining
/// leading positional-capable parameters move out of the keyword mapping,
/// the variadic tail follows.
fn reconcile(
    schema: &ArgumentSchema,
    mut parsed: Map<String, Value>,
    varargs: Vec<Value>,
    call: &CallArgs,
) -> RuntimeBindings {
    for (key, value) in &call.kwargs {
        parsed.insert(key.clone(), value.clone());
    }

    let mut positional = call.args.clone();
    let mut slots = Vec::new();
    let mut moved: HashSet<&str> = HashSet::new();

    let leading = schema
        .parameters
        .iter()
        .take_while(|p| p.accepts_positional && p.kind != ParameterKind::PositionalVariadic);
    for (idx, spec) in leading.enumerate() {
        if idx < call.args.len() {
            moved.insert(spec.name.as_str());
        } else if let Some(value) = parsed.get(&spec.name) {
            positional.push(value.clone());
            moved.insert(spec.name.as_str());
        } else {
            break;
        }
        slots.push(spec.name.clone());
    }
    positional.extend(varargs);

    let keywords: Map<String, Value> = parsed
        .into_iter()
        .filter(|(key, _)| !moved.contains(key.as_str()))
        .collect();

    RuntimeBindings::new(positional, keywords, slots)
}

#[cfg(test)]
mod tests {
    use programmify_core::{Overrides, Parameter, Signature};
    use serde_json::json;

    use super::*;
    use crate::build_schema;

    fn bind(sig: &Signature, args: &[&str]) -> (RuntimeBindings, CliControls) {
        let schema = build_schema(sig, &Overrides::new());
        match parse_and_bind(&schema, args.iter().copied(), &BindOptions::default()).unwrap() {
            BindOutcome::Bound { bindings, controls } => (bindings, controls),
            BindOutcome::Help(text) => panic!("unexpected help: {text}"),
        }
    }

    #[test]
    fn test_required_positionals_bind_without_keywords() {
        let sig = Signature::new("f")
            .with_param(Parameter::positional("a"))
            .with_param(Parameter::positional("b").with_type(ValueType::Int))
            .with_param(Parameter::positional("c"));
        let (bindings, controls) = bind(&sig, &["x", "2", "z"]);

        assert_eq!(bindings.positional, vec![json!("x"), json!(2), json!("z")]);
        assert!(bindings.keywords.is_empty());
        assert_eq!(controls, CliControls::default());
    }

    #[test]
    fn test_flag_directions() {
        let sig = Signature::new("f")
            .with_param(Parameter::keyword("verbose").with_default(false))
            .with_param(Parameter::keyword("cleanup").with_default(true));

        let (bindings, _) = bind(&sig, &[]);
        assert_eq!(bindings.get_bool("verbose"), Some(false));
        assert_eq!(bindings.get_bool("cleanup"), Some(true));

        let (bindings, _) = bind(&sig, &["--verbose", "--no-cleanup"]);
        assert_eq!(bindings.get_bool("verbose"), Some(true));
        assert_eq!(bindings.get_bool("cleanup"), Some(false));
    }

    #[test]
    fn test_only_inverted_switch_exists_for_true_flags() {
        let sig = Signature::new("f").with_param(Parameter::keyword("cleanup").with_default(true));
        let schema = build_schema(&sig, &Overrides::new());
        let err = parse_and_bind(&schema, ["--cleanup"], &BindOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_variadic_positional_folds_into_args() {
        let sig = Signature::new("sum")
            .with_param(Parameter::positional("label"))
            .with_param(Parameter::var_positional("numbers").with_type(ValueType::Int));
        let (bindings, _) = bind(&sig, &["total", "1", "2", "3"]);

        assert_eq!(
            bindings.positional,
            vec![json!("total"), json!(1), json!(2), json!(3)]
        );
        assert_eq!(bindings.rest(), &[json!(1), json!(2), json!(3)]);
        assert!(!bindings.keywords.contains_key("numbers"));

        let (bindings, _) = bind(&sig, &["total"]);
        assert!(bindings.rest().is_empty());
    }

    #[test]
    fn test_extra_switches_go_to_keyword_variadic() {
        let sig = Signature::new("f")
            .with_param(Parameter::keyword("name").with_default("n"))
            .with_param(Parameter::var_keyword("kwargs"));
        let (bindings, _) = bind(&sig, &["--extra-key", "value", "--other=1", "--name", "real"]);

        assert_eq!(bindings.keywords["extra_key"], json!("value"));
        assert_eq!(bindings.keywords["other"], json!("1"));
        assert_eq!(bindings.keywords["name"], json!("real"));
        assert!(!bindings.keywords.contains_key("kwargs"));
    }

    #[test]
    fn test_declared_switch_wins_over_extra_with_same_key() {
        let sig = Signature::new("f")
            .with_param(Parameter::keyword("dst_dir").with_default("out"))
            .with_param(Parameter::var_keyword("kwargs"));
        let (bindings, _) = bind(&sig, &["--dst_dir", "extra", "--dst-dir", "declared"]);

        assert_eq!(bindings.keywords["dst_dir"], json!("declared"));
    }

    #[test]
    fn test_unknown_switch_rejected_without_keyword_variadic() {
        let sig = Signature::new("f").with_param(Parameter::keyword("name").with_default("n"));
        let schema = build_schema(&sig, &Overrides::new());
        let err = parse_and_bind(&schema, ["--extra", "1"], &BindOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_type_coercion_failure_is_parse_error() {
        let sig = Signature::new("f").with_param(Parameter::positional("n").with_type(ValueType::Int));
        let schema = build_schema(&sig, &Overrides::new());
        let err = parse_and_bind(&schema, ["five"], &BindOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_missing_required_is_parse_error() {
        let sig = Signature::new("f").with_param(Parameter::positional("n"));
        let schema = build_schema(&sig, &Overrides::new());
        let err = parse_and_bind(&schema, Vec::<String>::new(), &BindOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_help_outcome_carries_usage() {
        let sig = Signature::new("greet")
            .with_doc("Say hello.\nname (str): who to greet")
            .with_param(Parameter::positional("name"));
        let schema = build_schema(&sig, &Overrides::new());
        let outcome = parse_and_bind(&schema, ["-h"], &BindOptions::default()).unwrap();

        let BindOutcome::Help(text) = outcome else {
            panic!("expected help");
        };
        assert!(text.contains("Say hello."));
        assert!(text.contains("who to greet"));
        assert!(text.contains("--quiet"));
        assert!(text.contains("--debug"));
    }

    #[test]
    fn test_injected_switches_are_stripped() {
        let sig = Signature::new("f").with_param(Parameter::keyword("name").with_default("n"));
        let (bindings, controls) = bind(&sig, &["--quiet", "--info", "--debug"]);

        assert!(controls.quiet);
        assert_eq!(controls.log_level, Some(LogLevel::Info));
        assert_eq!(bindings.keywords.len(), 1);
        assert!(!bindings.keywords.contains_key("quiet"));
        assert!(!bindings.keywords.contains_key("info"));
    }

    #[test]
    fn test_declared_quiet_is_not_injected() {
        let sig = Signature::new("f").with_param(Parameter::keyword("quiet").with_default(false));
        let (bindings, controls) = bind(&sig, &["--quiet"]);

        assert!(!controls.quiet);
        assert_eq!(bindings.get_bool("quiet"), Some(true));
    }

    #[test]
    fn test_augmentation_can_be_disabled() {
        let sig = Signature::new("f");
        let schema = build_schema(&sig, &Overrides::new());
        let options = BindOptions {
            augment: false,
            log_levels: LogLevel::ALL.to_vec(),
        };
        let err = parse_and_bind(&schema, ["--quiet"], &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_list_switch_accepts_commas_and_repeats() {
        let sig = Signature::new("f")
            .with_param(Parameter::keyword("imports").with_type(ValueType::List).with_default(Value::Null));
        let (bindings, _) = bind(&sig, &["--imports", "yaml,json", "--imports", "toml"]);
        assert_eq!(bindings.keywords["imports"], json!(["yaml", "json", "toml"]));

        let (bindings, _) = bind(&sig, &[]);
        assert_eq!(bindings.keywords["imports"], Value::Null);
    }

    #[test]
    fn test_caller_positionals_displace_keywords() {
        let sig = Signature::new("f")
            .with_param(Parameter::positional("a").with_default(1))
            .with_param(Parameter::positional("b").with_default(2))
            .with_param(Parameter::keyword("c").with_default(3));
        let schema = build_schema(&sig, &Overrides::new());
        let call = CallArgs::new().arg(10).kwarg("c", 30);

        let outcome = parse_and_bind_with(&schema, ["--a", "5", "--b", "6"], &BindOptions::default(), &call).unwrap();
        let BindOutcome::Bound { bindings, .. } = outcome else {
            panic!("expected bindings");
        };

        assert_eq!(bindings.positional, vec![json!(10), json!(6)]);
        assert!(!bindings.keywords.contains_key("a"));
        assert_eq!(bindings.keywords["c"], json!(30));
        assert_eq!(bindings.get_i64("a"), Some(10));
    }

    #[test]
    fn test_render_help_names_switches() {
        let sig = Signature::new("build")
            .with_param(Parameter::keyword("show_cmd").with_default(true))
            .with_param(Parameter::var_keyword("kwargs"));
        let schema = build_schema(&sig, &Overrides::new());
        let text = render_help(&schema, &BindOptions::default());

        assert!(text.contains("--no-show-cmd"));
        assert!(text.contains("Show-Cmd"));
        assert!(text.contains("Set logging level to WARNING"));
    }

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_undeclared_scan_stops_at_terminator() {
        let known: HashSet<String> = ["name".to_string()].into_iter().collect();
        let tokens = strings(&["--name", "x", "--new", "v", "-u", "--", "--after", "-w"]);

        let (found, argv) = undeclared_switches(tokens, &known);

        assert_eq!(found, strings(&["new", "u"]));
        assert_eq!(argv, strings(&["--name", "x", "--new", "v", "--u", "--", "--after", "-w"]));
    }

    #[test]
    fn test_switch_key_skips_help_and_negative_numbers() {
        assert_eq!(switch_key("-u=kg"), Some(("u".to_string(), true)));
        assert_eq!(switch_key("--unit"), Some(("unit".to_string(), false)));
        assert_eq!(switch_key("-h"), None);
        assert_eq!(switch_key("-2"), None);
        assert_eq!(switch_key("-1e3"), None);
        assert_eq!(switch_key("-"), None);
        assert_eq!(switch_key("value"), None);
        assert_eq!(switch_key("-2x"), Some(("2x".to_string(), true)));
    }

    #[test]
    fn test_negative_numbers_are_values() {
        let sig = Signature::new("sum")
            .with_param(Parameter::positional("label"))
            .with_param(Parameter::var_positional("numbers").with_type(ValueType::Int))
            .with_param(Parameter::keyword("times").with_type(ValueType::Int).with_default(1));

        let (bindings, _) = bind(&sig, &["total", "1", "-2", "--times", "-1"]);

        assert_eq!(bindings.positional, vec![json!("total"), json!(1), json!(-2)]);
        assert_eq!(bindings.keywords["times"], json!(-1));

        let sig = Signature::new("f").with_param(Parameter::positional("n").with_type(ValueType::Float));
        let (bindings, _) = bind(&sig, &["-2.5"]);
        assert_eq!(bindings.positional, vec![json!(-2.5)]);
    }

    #[test]
    fn test_repeated_switch_keeps_last_value() {
        let sig = Signature::new("f")
            .with_param(Parameter::keyword("greeting").with_default("Hello"))
            .with_param(Parameter::keyword("shout").with_default(false))
            .with_param(Parameter::var_keyword("kwargs"));

        let (bindings, controls) = bind(
            &sig,
            &["--greeting", "Hi", "--greeting", "Yo", "--shout", "--shout", "--unit", "kg", "--unit", "g", "--quiet", "--quiet"],
        );

        assert_eq!(bindings.keywords["greeting"], json!("Yo"));
        assert_eq!(bindings.get_bool("shout"), Some(true));
        assert_eq!(bindings.keywords["unit"], json!("g"));
        assert!(controls.quiet);
    }

    #[test]
    fn test_single_dash_extras_go_to_keyword_variadic() {
        let sig = Signature::new("sum")
            .with_param(Parameter::var_positional("numbers").with_type(ValueType::Int))
            .with_param(Parameter::var_keyword("details"));

        let (bindings, _) = bind(&sig, &["-2", "-u", "kg", "-note=dry", "--offset", "-3"]);

        assert_eq!(bindings.positional, vec![json!(-2)]);
        assert_eq!(bindings.keywords["u"], json!("kg"));
        assert_eq!(bindings.keywords["note"], json!("dry"));
        assert_eq!(bindings.keywords["offset"], json!("-3"));
        assert_eq!(bindings.keywords.len(), 3);

        let schema = build_schema(&sig, &Overrides::new());
        let outcome = parse_and_bind(&schema, ["-h"], &BindOptions::default()).unwrap();
        assert!(matches!(outcome, BindOutcome::Help(_)));
    }

    #[test]
    fn test_single_dash_rejected_without_keyword_variadic() {
        let sig = Signature::new("f").with_param(Parameter::keyword("unit").with_default("kg"));
        let schema = build_schema(&sig, &Overrides::new());
        let err = parse_and_bind(&schema, ["-u", "g"], &BindOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
