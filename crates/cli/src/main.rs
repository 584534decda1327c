//! Memory hierarchy trace-replay CLI.
//!
//! This binary drives the memory system with a recorded reference stream. It performs:
//! 1. **Configuration:** Load a JSON config (or defaults) and apply command-line overrides.
//! 2. **Replay:** Feed every trace record to the memory system, advancing the cycle counter by each delay.
//! 3. **Reporting:** Print the statistics of every component to stdout.
//!
//! Diagnostics go to stderr through `tracing` (filter with `RUST_LOG`), so the
//! report on stdout stays byte-exact.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use memsim_core::common::TraceError;
use memsim_core::config::{Config, SimMode};
use memsim_core::memsys::MemorySystem;
use memsim_core::trace::TraceReader;

#[derive(Parser, Debug)]
#[command(
    name = "memsim",
    author,
    version,
    about = "Cache and DRAM hierarchy timing model",
    long_about = "Replay a memory reference trace through an L1/L2/DRAM hierarchy and print per-component statistics.\n\nTrace lines are `<kind> <addr> [core]` with kind I/L/S.\n\nExamples:\n  memsim --trace refs.txt\n  memsim --config cfg.json --trace refs.txt --mode B\n  memsim --trace mix.txt --mode DEF --cores 2"
)]
struct Cli {
    /// JSON configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Trace file to replay (`-` for stdin).
    #[arg(short, long)]
    trace: PathBuf,

    /// Override the simulation mode (A, B, C or DEF).
    #[arg(short, long, value_parser = parse_mode)]
    mode: Option<SimMode>,

    /// Override the number of cores.
    #[arg(long)]
    cores: Option<usize>,
}

fn parse_mode(text: &str) -> Result<SimMode, String> {
    serde_json::from_value(serde_json::Value::String(text.to_owned()))
        .map_err(|_| format!("unknown mode `{text}` (expected A, B, C or DEF)"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("{e}");
        process::exit(1);
    }
}

/// Builds the memory system, replays the trace and prints the report.
fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if let Some(mode) = cli.mode {
        config.general.mode = mode;
    }
    if let Some(cores) = cli.cores {
        config.general.num_cores = cores;
    }

    let mut memsys = MemorySystem::new(&config)?;
    info!(mode = config.general.mode.name(), cores = config.general.num_cores, "replaying trace");

    let reader: Box<dyn io::BufRead> = if cli.trace.as_os_str() == "-" {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(File::open(&cli.trace)?))
    };

    let mut cycle = 0u64;
    let mut skipped = 0u64;
    for record in TraceReader::new(reader) {
        let record = match record {
            Ok(record) => record,
            Err(TraceError::Io(e)) => return Err(e.into()),
            Err(e) => {
                warn!("skipping trace record: {e}");
                skipped += 1;
                continue;
            }
        };
        let delay = memsys.access(record.addr, record.kind, record.core, cycle)?;
        cycle += delay.max(1);
    }
    info!(cycle, skipped, "trace replay finished");

    memsys.print_stats()?;
    Ok(())
}
