use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use timer_lib::{
    Console, DEFAULT_HISTORY_FILE, HistoryError, HistoryStore, PipeFileStore, Scheduler,
    SessionEnd, TimerConfig, spawn_input_reader, write_json_report, write_report,
};
use tokio::io::BufReader;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Queue named countdown timers and run them one after another.
///
/// Without flags, reads commands from standard input:
///   add <name> [-h N] [-m N] [-s N]   queue a countdown
///   exit                              quit immediately
///
/// Examples:
///   timer                   # interactive session
///   timer --history         # list every task that has been started
///   timer --history --json  # same, as JSON lines
#[derive(Debug, Parser)]
#[command(name = "timer")]
#[command(version)]
#[command(about = "Queue named countdown timers and run them one after another")]
struct Cli {
    /// Print the task history and exit.
    #[arg(long)]
    history: bool,

    /// Print the history as JSON lines (with --history).
    #[arg(long, requires = "history")]
    json: bool,

    /// History log to append to and read from.
    #[arg(
        long,
        value_name = "PATH",
        env = "TIMER_HISTORY_FILE",
        default_value = DEFAULT_HISTORY_FILE
    )]
    history_file: PathBuf,

    /// Increase log verbosity on stderr (-v, -vv, -vvv).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Error)]
enum TimerError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = TimerConfig::default().with_history_file(cli.history_file);
    debug!(?config, "loaded configuration");

    if cli.history {
        if let Err(err) = show_history(&config, cli.json) {
            println!("Error showing history: {err}");
        }
        return ExitCode::SUCCESS;
    }

    match run_interactive(config) {
        Ok(end) => {
            info!(?end, "timer exiting");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing on stderr, keeping stdout for the timer display.
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,timer_lib=info".to_string(),
            2 => "info,timer_lib=debug".to_string(),
            _ => "debug,timer_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(verbose >= 2)
        .compact()
        .init();
}

/// Prints every history record to stdout.
fn show_history(config: &TimerConfig, json: bool) -> Result<(), TimerError> {
    let store = PipeFileStore::new(config.history_file.clone());
    let records = store.load_all()?;

    let mut out = io::stdout().lock();
    if json {
        write_json_report(&mut out, records.as_deref())?;
    } else {
        write_report(&mut out, records.as_deref()).map_err(TimerError::Output)?;
    }
    out.flush().map_err(TimerError::Output)
}

/// Runs the interactive session on stdin until `exit` or end of input.
fn run_interactive(config: TimerConfig) -> Result<SessionEnd, TimerError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(TimerError::Runtime)?;

    let end = runtime.block_on(async {
        let console = Console::stdout();
        let commands = spawn_input_reader(BufReader::new(tokio::io::stdin()), console.clone());

        Scheduler::new(PipeFileStore::new(config.history_file), console)
            .with_poll_interval(config.poll_interval)
            .run(commands)
            .await
    });

    // The stdin reader may still be parked in a blocking read and a timer
    // may still be counting down. Neither may hold up exit.
    runtime.shutdown_background();

    Ok(end)
}
