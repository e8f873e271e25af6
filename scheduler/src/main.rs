//! CPU scheduling simulator.
//!
//! Runs one of four policies over a built-in workload and prints the average
//! per-process metrics. Simulated time is computed, never slept.
//!
//! ```bash
//! scheduling-simulator rr 2 3
//! scheduling-simulator mlfq 4 --interactive
//! ```

use clap::Parser;
use scheduling_simulator::scheduler::{
    render_table, scenarios, Algorithm, DisplayTerminal, ProcessRunner, RunConfig, SimError,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scheduling-simulator")]
#[command(version, about, long_about = None)]
struct Args {
    /// Scheduling policy, lowercase: fifo, sjf, rr or mlfq
    algorithm: String,

    /// Workload to simulate: 1, 2, 3 or 4
    scenario: String,

    /// Number of runs to average; values below 1 mean a single run
    #[arg(default_value_t = RunConfig::DEFAULT_REPEAT, allow_negative_numbers = true)]
    repeat: i32,

    /// Browse the results and the CPU timeline in a terminal view
    #[arg(short, long)]
    interactive: bool,
}

fn main() -> ExitCode {
    // Logs go to stderr so the table on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,scheduling_simulator=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SimError> {
    let algorithm: Algorithm = args.algorithm.parse()?;
    let processes = scenarios::scenario(&args.scenario)?;
    let config = RunConfig::new(algorithm, &args.scenario, args.repeat);

    let report = ProcessRunner::new(config).run(&processes)?;
    print!(
        "{}",
        render_table(report.config.algorithm, &report.config.scenario, &report.averages)
    );

    if args.interactive {
        DisplayTerminal::new()?.show(&report)?;
    }
    Ok(())
}
