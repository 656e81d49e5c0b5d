//! cadenza: run a composition program.
//!
//! Integers and booleans are printed to stdout. Printed music is drawn as a
//! piano roll and optionally exported as JSON or WAV.

use std::path::PathBuf;

use clap::Parser;

use cadenza::config::{default_config_path, load_config};
use cadenza::render::{JsonExport, PianoRoll, WavExport};
use cadenza::ConsoleSink;

#[derive(Debug, Parser)]
#[command(name = "cadenza", version, about = "Run a music composition program")]
struct Cli {
    /// Program source file.
    file: PathBuf,

    /// Configuration file (default: ~/.cadenza/config.yaml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Export printed sequences as JSON to PATH, or `-` for stdout.
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Synthesize printed sequences to WAV at PATH.
    #[arg(long, value_name = "PATH")]
    wav: Option<PathBuf>,

    /// Do not draw piano rolls.
    #[arg(long)]
    no_roll: bool,

    /// Debug logging on stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("CADENZA_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load config {}: {e}", config_path.display());
            std::process::exit(1);
        }
    };

    let source = match std::fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("failed to read {}: {e}", cli.file.display());
            std::process::exit(1);
        }
    };

    let mut sink = ConsoleSink::new(std::io::stdout());
    if !cli.no_roll {
        sink = sink.with_renderer(Box::new(PianoRoll::new(
            std::io::stdout(),
            config.render.columns_per_beat,
        )));
    }
    if let Some(path) = &cli.json {
        let export = if path.as_os_str() == "-" {
            JsonExport::stdout()
        } else {
            JsonExport::to_files(path)
        };
        sink = sink.with_renderer(Box::new(export));
    }
    if let Some(path) = &cli.wav {
        sink = sink.with_renderer(Box::new(WavExport::new(path, config.render.synth_settings())));
    }

    tracing::debug!(file = %cli.file.display(), "running");
    if let Err(e) = cadenza::run(&source, &mut sink, &config) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
