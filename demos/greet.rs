//! Greeting demo: positional argument, typed optional switch, flags and
//! `--quiet`.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p programmify-demos --bin greet -- ada --times 2 --shout
//! cargo run -p programmify-demos --bin greet -- ada --no-punctuate --info
//! cargo run -p programmify-demos --bin greet -- ada --quiet
//! cargo run -p programmify-demos --bin greet -- --help
//! ```

use std::process::ExitCode;

use programmify_core::{Parameter, Signature, ValueType};
use programmify_synth::CommandLineAdapter;
use serde_json::json;
use tracing::info;

const DOC: &str = "Greet someone a few times.

    Args:
        name (str): who to greet
        times (int): how many greetings to print
        shout (bool): print in capitals
        greeting (str): word to greet with
";

fn main() -> ExitCode {
    let signature = Signature::new("greet")
        .with_doc(DOC)
        .with_param(Parameter::positional("name").with_type(ValueType::String))
        .with_param(Parameter::positional("times").with_type(ValueType::Int).with_default(1))
        .with_param(Parameter::keyword("shout").with_default(false))
        .with_param(Parameter::keyword("punctuate").with_default(true))
        .with_param(Parameter::keyword("greeting").with_default("Hello"));

    let adapter = CommandLineAdapter::builder(signature).build_fn(|bindings, streams| {
        let name = bindings.get_str("name").unwrap_or("world");
        let times = bindings.get_i64("times").unwrap_or(1).max(0);
        let greeting = bindings.get_str("greeting").unwrap_or("Hello");
        let mark = if bindings.get_bool("punctuate") == Some(true) { "!" } else { "" };

        let mut line = format!("{greeting}, {name}{mark}");
        if bindings.get_bool("shout") == Some(true) {
            line = line.to_uppercase();
        }

        info!(name, times, "Greeting");
        for _ in 0..times {
            writeln!(streams.out(), "{line}")?;
        }
        Ok(Some(json!(times)))
    });

    match adapter {
        Ok(mut adapter) => adapter.run_env(),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
