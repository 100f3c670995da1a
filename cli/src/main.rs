use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use programmify_core::{Signature, validate_signature};
use programmify_detect::{DEFAULT_ICON_SIZE, SourceRules, detect_icon, detect_main_file, png_to_ico};
use programmify_synth::streams::OutputStreams;
use programmify_synth::{AdapterConfig, CommandLineAdapter, OutputFormat, build_schema, format_schema, logging};
use serde::Deserialize;
use tracing::debug;

/// Source language whose layout `detect-main` looks for.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Lang {
    Python,
    Rust,
}

impl From<Lang> for SourceRules {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::Python => SourceRules::python(),
            Lang::Rust => SourceRules::rust(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "programmify")]
#[command(about = "Turn function signatures into command-line programs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the command-line schema derived from a signature file.
    Schema(SchemaArgs),
    /// Parse arguments against a signature file and print the bound call.
    Run(RunArgs),
    /// Print the main source file of a project folder.
    DetectMain(DetectMainArgs),
    /// Print the icon of a project folder, converting a lone PNG if needed.
    DetectIcon(DetectIconArgs),
    /// Convert a PNG image to a single-size ICO icon.
    Png2ico(Png2IcoArgs),
}

#[derive(Debug, Args)]
struct SchemaArgs {
    /// Signature file (YAML or JSON).
    #[arg(long)]
    signature: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Signature file (YAML or JSON).
    #[arg(long)]
    signature: PathBuf,
    /// Arguments for the generated command line, after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct DetectMainArgs {
    /// Project folder.
    #[arg(long, default_value = ".")]
    dir: PathBuf,
    /// Source layout to look for.
    #[arg(long, default_value = "python")]
    lang: Lang,
}

#[derive(Debug, Args)]
struct DetectIconArgs {
    /// Project folder.
    #[arg(long, default_value = ".")]
    dir: PathBuf,
    /// Icon used when the folder has none.
    #[arg(long, default_value = "favicon.ico")]
    fallback: PathBuf,
    /// Edge length for a converted PNG.
    #[arg(long, default_value_t = DEFAULT_ICON_SIZE)]
    size: u32,
}

#[derive(Debug, Args)]
struct Png2IcoArgs {
    /// Path to the .png file.
    png: PathBuf,
    /// Path to the .ico file (default: next to the PNG).
    #[arg(long)]
    ico_path: Option<PathBuf>,
    /// Icon size.
    #[arg(long, default_value_t = DEFAULT_ICON_SIZE)]
    size: u32,
}

/// Contents of a signature file.
#[derive(Debug, Deserialize)]
struct SignatureFile {
    signature: Signature,
    #[serde(default)]
    config: AdapterConfig,
}

fn main() {
    let cli = Cli::parse();

    // `run` installs its own subscriber from the generated `--<level>` switches.
    if !matches!(cli.command, Command::Run(_)) {
        logging::init_from_env("warn");
    }

    let result = match cli.command {
        Command::Schema(args) => run_schema(args),
        Command::Run(args) => run_run(args),
        Command::DetectMain(args) => run_detect_main(args),
        Command::DetectIcon(args) => run_detect_icon(args),
        Command::Png2ico(args) => run_png2ico(args),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn load_signature_file(path: &Path) -> Result<SignatureFile, String> {
    let file = fs::File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let parsed: SignatureFile = serde_yaml::from_reader(BufReader::new(file))
        .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
    debug!(
        path = %path.display(),
        command = %parsed.signature.name,
        params = parsed.signature.params.len(),
        "Loaded signature file"
    );
    Ok(parsed)
}

fn run_schema(args: SchemaArgs) -> Result<i32, String> {
    let loaded = load_signature_file(&args.signature)?;

    let errors = validate_signature(&loaded.signature);
    if !errors.is_empty() {
        let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(format!("invalid signature: {}", joined.join("; ")));
    }

    let mut schema = build_schema(&loaded.signature, &loaded.config.defaults);
    if let Some(command) = loaded.config.command {
        schema.command = command;
    }
    println!("{}", format_schema(&schema, args.format)?);
    Ok(0)
}

fn run_run(args: RunArgs) -> Result<i32, String> {
    let loaded = load_signature_file(&args.signature)?;

    let mut adapter = CommandLineAdapter::builder(loaded.signature)
        .config(loaded.config)
        .streams(OutputStreams::stdio())
        .build_fn(|bindings, _| Ok(Some(bindings.to_value())))
        .map_err(|e| e.to_string())?;

    Ok(adapter.run_code(args.args))
}

fn run_detect_main(args: DetectMainArgs) -> Result<i32, String> {
    let main = detect_main_file(&args.dir, &args.lang.into()).map_err(|e| e.to_string())?;
    println!("{}", main.display());
    Ok(0)
}

fn run_detect_icon(args: DetectIconArgs) -> Result<i32, String> {
    let icon = detect_icon(&args.dir, &args.fallback, args.size).map_err(|e| e.to_string())?;
    println!("{}", icon.display());
    Ok(0)
}

fn run_png2ico(args: Png2IcoArgs) -> Result<i32, String> {
    let ico = png_to_ico(&args.png, args.ico_path.as_deref(), args.size).map_err(|e| e.to_string())?;
    println!("Wrote {0}x{0} icon to {1}", args.size, ico.display());
    Ok(0)
}
