//! Summing demo: variadic positionals and free-form extra switches.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p programmify-demos --bin sum -- total 1 2 3.5
//! cargo run -p programmify-demos --bin sum -- total 1 2 --unit kg --note "dry weight"
//! cargo run -p programmify-demos --bin sum -- total 1 -2 -u kg --precision 0
//! ```

use std::process::ExitCode;

use programmify_core::{Parameter, Signature, ValueType};
use programmify_synth::CommandLineAdapter;
use serde_json::{Value, json};

const DOC: &str = "Add numbers and report the total.
label (str): name of the total
numbers (float): values to add
";

fn main() -> ExitCode {
    let signature = Signature::new("sum")
        .with_doc(DOC)
        .with_param(Parameter::positional("label"))
        .with_param(Parameter::var_positional("numbers").with_type(ValueType::Float))
        .with_param(Parameter::keyword("precision").with_default(2))
        .with_param(Parameter::var_keyword("details"));

    let adapter = CommandLineAdapter::builder(signature).build_fn(|bindings, streams| {
        let label = bindings.get_str("label").unwrap_or("total");
        let precision = bindings.get_i64("precision").unwrap_or(2).clamp(0, 12) as usize;
        let total: f64 = bindings.rest().iter().filter_map(Value::as_f64).sum();

        writeln!(streams.out(), "{label}: {total:.precision$}")?;
        for (key, value) in &bindings.keywords {
            if key != "precision" {
                writeln!(streams.err(), "  {key} = {value}")?;
            }
        }
        Ok(Some(json!({ "label": label, "total": total, "count": bindings.rest().len() })))
    });

    match adapter {
        Ok(mut adapter) => adapter.run_env(),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
