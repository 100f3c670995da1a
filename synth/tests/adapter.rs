use std::cell::{Cell, RefCell};
use std::rc::Rc;

use programmify_core::{Overrides, Parameter, RuntimeBindings, Signature, ValueType};
use programmify_synth::logging::Gated;
use programmify_synth::streams::{OutputStreams, SharedBuffer};
use programmify_synth::{
    AdapterConfig, CallArgs, CommandLineAdapter, LogLevel, RunOutcome, SynthError, build_schema,
};
use serde_json::{Value, json};

/// Adapter wired to in-memory streams, recording every call and selected level.
struct Harness {
    adapter: CommandLineAdapter,
    out: SharedBuffer,
    err: SharedBuffer,
    calls: Rc<RefCell<Vec<RuntimeBindings>>>,
    levels: Rc<RefCell<Vec<LogLevel>>>,
}

impl Harness {
    fn new(signature: Signature) -> Self {
        Self::with_result(signature, |_| Ok(None))
    }

    fn with_result(
        signature: Signature,
        result: impl Fn(&RuntimeBindings) -> Result<Option<Value>, programmify_synth::BoxError> + 'static,
    ) -> Self {
        Self::configured(signature, AdapterConfig::default(), result)
    }

    fn configured(
        signature: Signature,
        config: AdapterConfig,
        result: impl Fn(&RuntimeBindings) -> Result<Option<Value>, programmify_synth::BoxError> + 'static,
    ) -> Self {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let levels = Rc::new(RefCell::new(Vec::new()));

        let recorded = Rc::clone(&calls);
        let seen_levels = Rc::clone(&levels);
        let adapter = CommandLineAdapter::builder(signature)
            .config(config)
            .streams(OutputStreams::new(out.clone(), err.clone()))
            .log_hook(move |level| seen_levels.borrow_mut().push(level))
            .build_fn(move |bindings, streams| {
                writeln!(streams.out(), "callable output")?;
                writeln!(streams.err(), "callable diagnostics")?;
                tracing::info!("Callable ran");
                recorded.borrow_mut().push(bindings.clone());
                result(bindings)
            })
            .expect("signature should be valid");

        Self {
            adapter,
            out,
            err,
            calls,
            levels,
        }
    }

    fn run(&mut self, args: &[&str]) -> RunOutcome {
        self.adapter
            .try_run(args.iter().copied())
            .expect("run should not fail")
    }

    fn last_call(&self) -> RuntimeBindings {
        self.calls
            .borrow()
            .last()
            .cloned()
            .expect("callable should have been invoked")
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

fn documented_signature() -> Signature {
    Signature::new("f")
        .with_doc("Example command.\na (int): first\nb (str): second")
        .with_param(Parameter::positional("a").with_type(ValueType::Int))
        .with_param(
            Parameter::positional("b")
                .with_type(ValueType::String)
                .with_default("x"),
        )
}

#[test]
fn test_required_positionals_bind_without_keywords() {
    let sig = Signature::new("copy")
        .with_param(Parameter::positional("src"))
        .with_param(Parameter::positional("dst"))
        .with_param(Parameter::positional("count").with_type(ValueType::Int));
    let mut harness = Harness::new(sig);

    let outcome = harness.run(&["a.txt", "b.txt", "3"]);

    assert_eq!(outcome, RunOutcome::Completed(None));
    let call = harness.last_call();
    assert_eq!(call.positional, vec![json!("a.txt"), json!("b.txt"), json!(3)]);
    assert!(call.keywords.is_empty());
}

#[test]
fn test_false_default_flag() {
    let sig = Signature::new("f").with_param(Parameter::keyword("verbose").with_default(false));
    let mut harness = Harness::new(sig);

    harness.run(&["--verbose"]);
    assert_eq!(harness.last_call().get_bool("verbose"), Some(true));

    harness.run(&[]);
    assert_eq!(harness.last_call().get_bool("verbose"), Some(false));
}

#[test]
fn test_true_default_flag() {
    let sig = Signature::new("f").with_param(Parameter::keyword("cleanup").with_default(true));
    let mut harness = Harness::new(sig);

    harness.run(&["--no-cleanup"]);
    assert_eq!(harness.last_call().get_bool("cleanup"), Some(false));

    harness.run(&[]);
    assert_eq!(harness.last_call().get_bool("cleanup"), Some(true));
}

#[test]
fn test_extra_switch_reaches_keyword_variadic() {
    let sig = Signature::new("f")
        .with_param(Parameter::positional("name"))
        .with_param(Parameter::var_keyword("kwargs"));
    let mut harness = Harness::new(sig);

    harness.run(&["bob", "--extra-key", "value"]);

    let call = harness.last_call();
    assert_eq!(call.positional, vec![json!("bob")]);
    assert_eq!(call.keywords.get("extra_key"), Some(&json!("value")));
    assert_eq!(call.keywords.len(), 1);
}

#[test]
fn test_help_does_not_invoke() {
    let mut harness = Harness::new(documented_signature());

    let outcome = harness.run(&["-h"]);

    assert_eq!(outcome, RunOutcome::Help);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(harness.call_count(), 0);
    let usage = harness.out.contents();
    assert!(usage.contains("Example command."));
    assert!(usage.contains("first"));
    assert!(usage.contains("second"));
}

#[test]
fn test_documented_round_trip() {
    let schema = build_schema(&documented_signature(), &Overrides::new());
    assert_eq!(schema.find("a").map(|p| p.help_text.as_str()), Some("first"));
    assert_eq!(schema.find("b").map(|p| p.help_text.as_str()), Some("second"));

    let mut harness = Harness::new(documented_signature());
    harness.run(&["5", "--b", "hello"]);

    let call = harness.last_call();
    assert_eq!(call.get_i64("a"), Some(5));
    assert_eq!(call.get_str("b"), Some("hello"));
}

#[test]
fn test_quiet_suppresses_output_but_prints_result() {
    let sig = Signature::new("f").with_param(Parameter::positional("n").with_type(ValueType::Int));
    let mut harness = Harness::with_result(sig, |b| Ok(Some(json!(b.get_i64("n").unwrap_or(0) + 1))));

    let outcome = harness.run(&["41", "--quiet"]);

    assert_eq!(outcome, RunOutcome::Completed(Some(json!(42))));
    assert_eq!(harness.out.contents(), "42\n");
    assert_eq!(harness.err.contents(), "");
    assert!(!harness.last_call().keywords.contains_key("quiet"));
}

/// Subscriber writing to `logs` the way the default log hook writes to stderr.
fn capture_logs(logs: &SharedBuffer) -> impl tracing::Subscriber + Send + Sync {
    let sink = logs.clone();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(Gated::new(move || sink.clone()))
        .finish()
}

#[test]
fn test_quiet_silences_log_output() {
    let logs = SharedBuffer::default();
    let mut harness = Harness::new(Signature::new("f"));

    tracing::subscriber::with_default(capture_logs(&logs), || {
        harness.run(&["--quiet", "--info"]);
    });

    assert_eq!(*harness.levels.borrow(), vec![LogLevel::Info]);
    assert_eq!(harness.call_count(), 1);
    assert_eq!(logs.contents(), "");
    assert_eq!(harness.err.contents(), "");
}

#[test]
fn test_log_output_visible_without_quiet() {
    let logs = SharedBuffer::default();
    let mut harness = Harness::new(Signature::new("f"));

    tracing::subscriber::with_default(capture_logs(&logs), || {
        harness.run(&["--info"]);
    });

    let captured = logs.contents();
    assert!(captured.contains("Log level selected"), "logs: {captured}");
    assert!(captured.contains("Callable ran"), "logs: {captured}");
}

#[test]
fn test_output_is_visible_without_quiet() {
    let sig = Signature::new("f");
    let mut harness = Harness::with_result(sig, |_| Ok(Some(json!("done"))));

    harness.run(&[]);

    assert_eq!(harness.out.contents(), "callable output\ndone\n");
    assert_eq!(harness.err.contents(), "callable diagnostics\n");
}

#[test]
fn test_streams_restored_after_failure() {
    let sig = Signature::new("f");
    let fail = Cell::new(true);
    let mut harness = Harness::with_result(sig, move |_| {
        if fail.replace(false) {
            Err("boom".into())
        } else {
            Ok(None)
        }
    });

    let err = harness.adapter.try_run(["--quiet"]).unwrap_err();
    assert!(matches!(err, SynthError::Invocation(_)));
    assert_eq!(err.to_string(), "boom");
    assert_eq!(harness.out.contents(), "");

    harness.run(&[]);
    assert_eq!(harness.out.contents(), "callable output\n");
}

#[test]
fn test_run_code_reports_failures() {
    let sig = Signature::new("f");
    let mut harness = Harness::with_result(sig, |_| Err("disk full".into()));

    assert_eq!(harness.adapter.run_code(Vec::<String>::new()), 1);
    assert!(harness.err.contents().ends_with("error: disk full\n"));
}

#[test]
fn test_usage_error_exits_two_without_invoking() {
    let sig = Signature::new("f").with_param(Parameter::positional("n").with_type(ValueType::Int));
    let mut harness = Harness::new(sig);

    let outcome = harness.run(&["not-a-number"]);

    assert_eq!(outcome, RunOutcome::UsageError(2));
    assert_eq!(harness.call_count(), 0);
    assert!(harness.err.contents().contains("not-a-number"));
}

#[test]
fn test_log_level_handed_to_hook_once() {
    let sig = Signature::new("f");
    let mut harness = Harness::new(sig);

    harness.run(&["--debug", "--warning"]);
    assert_eq!(*harness.levels.borrow(), vec![LogLevel::Warning]);

    harness.run(&[]);
    assert_eq!(harness.levels.borrow().len(), 1);
}

#[test]
fn test_configured_level_order_wins() {
    let config = AdapterConfig {
        log_levels: vec![LogLevel::Debug, LogLevel::Error],
        ..AdapterConfig::default()
    };
    let mut harness = Harness::configured(Signature::new("f"), config, |_| Ok(None));

    harness.run(&["--error", "--debug"]);
    assert_eq!(*harness.levels.borrow(), vec![LogLevel::Debug]);

    let outcome = harness.run(&["--info"]);
    assert_eq!(outcome, RunOutcome::UsageError(2));
}

#[test]
fn test_overrides_change_defaults() {
    let sig = Signature::new("build")
        .with_param(Parameter::keyword("mode").with_default("windowed"))
        .with_param(Parameter::keyword("cleanup").with_default(true));
    let mut config = AdapterConfig::default();
    config.defaults.insert("mode".into(), json!("console"));
    config.defaults.insert("cleanup".into(), json!(false));
    let mut harness = Harness::configured(sig, config, |_| Ok(None));

    harness.run(&[]);
    let call = harness.last_call();
    assert_eq!(call.get_str("mode"), Some("console"));
    assert_eq!(call.get_bool("cleanup"), Some(false));

    harness.run(&["--cleanup"]);
    assert_eq!(harness.last_call().get_bool("cleanup"), Some(true));
}

#[test]
fn test_caller_arguments_take_precedence() {
    let sig = Signature::new("f")
        .with_param(Parameter::positional("a").with_type(ValueType::Int).with_default(1))
        .with_param(Parameter::keyword("tag").with_default("cli"));
    let mut harness = Harness::new(sig);

    let call = CallArgs::new().arg(7).kwarg("tag", "code");
    harness
        .adapter
        .try_run_with(["--a", "3", "--tag", "flag"], &call)
        .unwrap();

    let bound = harness.last_call();
    assert_eq!(bound.positional, vec![json!(7)]);
    assert_eq!(bound.get_str("tag"), Some("code"));
}

#[test]
fn test_receiver_is_not_exposed() {
    let sig = Signature::new("Widget")
        .with_param(Parameter::receiver("self"))
        .with_param(Parameter::positional("size").with_type(ValueType::Int));
    let mut harness = Harness::new(sig);

    harness.run(&["3"]);
    assert_eq!(harness.last_call().positional, vec![json!(3)]);
    assert!(harness.adapter.schema().find("self").is_none());
}

#[test]
fn test_command_name_from_config() {
    let config = AdapterConfig {
        command: Some("widget-tool".into()),
        ..AdapterConfig::default()
    };
    let mut harness = Harness::configured(Signature::new("f"), config, |_| Ok(None));

    harness.run(&["--help"]);
    assert!(harness.out.contents().contains("widget-tool"));
}
