//! Command-line adapter: a callable composed with its generated CLI.

use std::process::ExitCode;

use programmify_core::{ArgumentSchema, Overrides, RuntimeBindings, Signature, validate_signature};
use serde_json::Value;
use tracing::{debug, info};

use crate::bind::{BindOptions, BindOutcome, CallArgs, parse_and_bind_with};
use crate::config::AdapterConfig;
use crate::error::{BoxError, Result, SynthError};
use crate::logging::{self, LogLevel};
use crate::schema::build_schema;
use crate::streams::OutputStreams;

/// Exit code of a failed invocation.
const FAILURE: i32 = 1;

/// A function exposed on the command line.
///
/// Receives the bound arguments and the output streams it should write to;
/// a non-null return value is printed after the call.
pub trait Callable {
    fn call(
        &self,
        bindings: &RuntimeBindings,
        streams: &mut OutputStreams,
    ) -> std::result::Result<Option<Value>, BoxError>;
}

impl<F> Callable for F
where
    F: Fn(&RuntimeBindings, &mut OutputStreams) -> std::result::Result<Option<Value>, BoxError>,
{
    fn call(
        &self,
        bindings: &RuntimeBindings,
        streams: &mut OutputStreams,
    ) -> std::result::Result<Option<Value>, BoxError> {
        self(bindings, streams)
    }
}

/// What a run ended with.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Usage text was printed; the callable did not run.
    Help,
    /// The command line was rejected; carries the exit code.
    UsageError(i32),
    /// The callable returned.
    Completed(Option<Value>),
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Help | Self::Completed(_) => 0,
            Self::UsageError(code) => *code,
        }
    }
}

type LogHook = Box<dyn FnMut(LogLevel)>;

/// Holds a callable's schema and the callable, and runs it from process
/// arguments.
///
/// # Examples
///
/// ```
/// use programmify_core::{Parameter, Signature, ValueType};
/// use programmify_synth::{CommandLineAdapter, RunOutcome};
/// use programmify_synth::streams::{OutputStreams, SharedBuffer};
/// use serde_json::json;
///
/// let sig = Signature::new("double")
///     .with_param(Parameter::positional("n").with_type(ValueType::Int));
/// let out = SharedBuffer::default();
///
/// let mut adapter = CommandLineAdapter::builder(sig)
///     .streams(OutputStreams::new(out.clone(), SharedBuffer::default()))
///     .build_fn(|bindings, _| Ok(Some(json!(bindings.get_i64("n").unwrap_or(0) * 2))))
///     .unwrap();
///
/// let outcome = adapter.try_run(["21"]).unwrap();
/// assert_eq!(outcome, RunOutcome::Completed(Some(json!(42))));
/// assert_eq!(out.contents(), "42\n");
/// ```
pub struct CommandLineAdapter {
    schema: ArgumentSchema,
    callable: Box<dyn Callable>,
    options: BindOptions,
    streams: OutputStreams,
    log_hook: LogHook,
}

impl CommandLineAdapter {
    pub fn builder(signature: Signature) -> AdapterBuilder {
        AdapterBuilder::new(signature)
    }

    pub fn schema(&self) -> &ArgumentSchema {
        &self.schema
    }

    pub fn options(&self) -> &BindOptions {
        &self.options
    }

    /// Runs with `process_args` (without the program name).
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::Invocation`] when the callable fails and
    /// [`SynthError::IoError`] when usage or the result cannot be written.
    pub fn try_run<I, T>(&mut self, process_args: I) -> Result<RunOutcome>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.try_run_with(process_args, &CallArgs::default())
    }

    /// Like [`try_run`](Self::try_run), with arguments supplied by the caller.
    pub fn try_run_with<I, T>(&mut self, process_args: I, call: &CallArgs) -> Result<RunOutcome>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let outcome = match parse_and_bind_with(&self.schema, process_args, &self.options, call) {
            Ok(outcome) => outcome,
            Err(err) => {
                write!(self.streams.err(), "{}", err.render())?;
                self.streams.flush()?;
                return Ok(RunOutcome::UsageError(err.exit_code()));
            }
        };

        let (bindings, controls) = match outcome {
            BindOutcome::Help(usage) => {
                write!(self.streams.out(), "{usage}")?;
                self.streams.flush()?;
                return Ok(RunOutcome::Help);
            }
            BindOutcome::Bound { bindings, controls } => (bindings, controls),
        };

        // Quiet covers log output too, including the level announcement.
        let log_silence = controls.quiet.then(logging::silence);

        if let Some(level) = controls.log_level {
            (self.log_hook)(level);
            info!(command = %self.schema.command, level = %level, "Log level selected");
        }

        debug!(command = %self.schema.command, quiet = controls.quiet, "Invoking callable");
        let result = if controls.quiet {
            let mut quiet = self.streams.silence()?;
            self.callable.call(&bindings, &mut quiet)
        } else {
            self.callable.call(&bindings, &mut self.streams)
        };
        drop(log_silence);

        let value = result.map_err(SynthError::Invocation)?;
        if let Some(rendered) = value.as_ref().and_then(render_value) {
            writeln!(self.streams.out(), "{rendered}")?;
        }
        self.streams.flush()?;

        Ok(RunOutcome::Completed(value))
    }

    /// Runs with `process_args` and maps the outcome to an exit code.
    ///
    /// Invocation failures are reported as `error: <message>` on the error
    /// stream with exit code 1.
    pub fn run<I, T>(&mut self, process_args: I) -> ExitCode
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        ExitCode::from(self.run_code(process_args) as u8)
    }

    /// Runs with the current process arguments.
    pub fn run_env(&mut self) -> ExitCode {
        self.run(std::env::args().skip(1))
    }

    /// Numeric form of [`run`](Self::run).
    pub fn run_code<I, T>(&mut self, process_args: I) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        match self.try_run(process_args) {
            Ok(outcome) => outcome.exit_code(),
            Err(err) => {
                let _ = writeln!(self.streams.err(), "error: {err}");
                let _ = self.streams.flush();
                FAILURE
            }
        }
    }
}

/// Strings print raw, other values as JSON; `null` prints nothing.
fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Builder for [`CommandLineAdapter`].
pub struct AdapterBuilder {
    signature: Signature,
    config: AdapterConfig,
    streams: Option<OutputStreams>,
    log_hook: Option<LogHook>,
}

impl AdapterBuilder {
    fn new(signature: Signature) -> Self {
        Self {
            signature,
            config: AdapterConfig::default(),
            streams: None,
            log_hook: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: AdapterConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds default overrides; later entries win.
    pub fn overrides(mut self, overrides: Overrides) -> Self {
        self.config.defaults = programmify_core::merge_overrides(&self.config.defaults, &overrides);
        self
    }

    pub fn augment(mut self, augment: bool) -> Self {
        self.config.augment = augment;
        self
    }

    pub fn log_levels(mut self, levels: Vec<LogLevel>) -> Self {
        self.config.log_levels = levels;
        self
    }

    pub fn streams(mut self, streams: OutputStreams) -> Self {
        self.streams = Some(streams);
        self
    }

    /// Receives the selected log level before the call. Defaults to
    /// [`logging::install`].
    pub fn log_hook(mut self, hook: impl FnMut(LogLevel) + 'static) -> Self {
        self.log_hook = Some(Box::new(hook));
        self
    }

    /// Validates the signature, builds the schema and wraps `callable`.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::InvalidSignature`] listing every problem found.
    pub fn build(self, callable: impl Callable + 'static) -> Result<CommandLineAdapter> {
        let errors = validate_signature(&self.signature);
        if !errors.is_empty() {
            return Err(SynthError::InvalidSignature {
                command: self.signature.name.clone(),
                errors,
            });
        }

        let mut schema = build_schema(&self.signature, &self.config.defaults);
        if let Some(command) = &self.config.command {
            schema.command = command.clone();
        }

        Ok(CommandLineAdapter {
            schema,
            callable: Box::new(callable),
            options: BindOptions::from(&self.config),
            streams: self.streams.unwrap_or_default(),
            log_hook: self.log_hook.unwrap_or_else(default_log_hook),
        })
    }

    /// [`build`](Self::build) for a closure, with its argument types inferred.
    pub fn build_fn<F>(self, callable: F) -> Result<CommandLineAdapter>
    where
        F: Fn(&RuntimeBindings, &mut OutputStreams) -> std::result::Result<Option<Value>, BoxError>
            + 'static,
    {
        self.build(callable)
    }
}

fn default_log_hook() -> LogHook {
    Box::new(logging::install)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&json!("plain")), Some("plain".to_string()));
        assert_eq!(render_value(&json!([1, 2])), Some("[1,2]".to_string()));
        assert_eq!(render_value(&Value::Null), None);
    }

    #[test]
    fn test_invalid_signature_is_rejected() {
        let sig = Signature::new("f")
            .with_param(programmify_core::Parameter::positional("a"))
            .with_param(programmify_core::Parameter::keyword("a"));
        let err = CommandLineAdapter::builder(sig)
            .build_fn(|_, _| Ok(None))
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "invalid signature for `f`: duplicate parameter: a"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(RunOutcome::Help.exit_code(), 0);
        assert_eq!(RunOutcome::Completed(None).exit_code(), 0);
        assert_eq!(RunOutcome::UsageError(2).exit_code(), 2);
    }
}
