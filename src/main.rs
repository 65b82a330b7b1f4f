//! Convert OpenTelemetry span batches (JSON Lines) to a Chrome trace.
//!
//! # Usage
//!
//! ```bash
//! # Convert a file, write to stdout
//! otel2chrome spans.jsonl > trace.json
//!
//! # Read from stdin, pretty-print to a file
//! cat spans.jsonl | otel2chrome --pretty -o trace.json
//!
//! # Show where time goes, with debug logging
//! RUST_LOG=debug otel2chrome spans.jsonl --stats > trace.json
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use color_print::cformat;
use otel2chrome::config::Config;
use otel2chrome::trace;

#[derive(Parser, Debug)]
#[command(name = "otel2chrome")]
#[command(about = "Convert OpenTelemetry span batches to Chrome Trace Event Format", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON Lines file of OTLP/JSON batches (`-` or omitted for stdin)
    input: Option<PathBuf>,

    /// Write the trace to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,

    /// Print a per-span-name time summary to stderr
    #[arg(long)]
    stats: bool,

    /// Configuration file (defaults to ./otel2chrome.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            Config::discover(&cwd)?.unwrap_or_default()
        }
    };
    log::debug!("Loaded config: {config:?}");
    Ok(config)
}

fn open_input(input: Option<&PathBuf>) -> anyhow::Result<Box<dyn BufRead>> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => {
            if io::stdin().is_terminal() {
                anyhow::bail!("No input: pass a file or pipe JSON Lines batches on stdin");
            }
            Ok(Box::new(io::stdin().lock()))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let pretty = cli.pretty || config.output.pretty;
    let output = cli.output.clone().or(config.output.path);

    let reader = open_input(cli.input.as_ref())?;
    let spans = trace::parse_batches(reader).context("Failed to read span batches")?;
    log::info!("Read {} spans", spans.len());

    if cli.stats {
        let analysis = trace::analyze(&spans);
        anstream::eprintln!("{}", trace::render(&analysis));
    }

    let converted = trace::convert(&spans).context("Failed to convert spans")?;
    let json = converted.to_json(pretty)?;
    log::info!(
        "Converted to {} events and {} stack frames",
        converted.trace_events.len(),
        converted.stack_frames.len()
    );

    match output {
        Some(path) => {
            std::fs::write(&path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}").context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        anstream::eprintln!("{}", cformat!("<red>✗</> <red>{err}</>"));
        for cause in err.chain().skip(1) {
            anstream::eprintln!("{}", cformat!("  <dim>caused by: {cause}</>"));
        }
        process::exit(1);
    }
}
