//! Line-oriented host for a huddle session.
//!
//! # Responsibility
//! - Open a durable profile and run one session over stdin commands.
//! - Keep debounced writes firing while stdin is idle and flush them on exit.

mod host;

use clap::Parser;
use host::{run_loop, spawn_line_reader, Host};
use huddle_core::{
    default_log_level, init_logging, load_config, DirectorySink, RosterSession, SessionConfig,
    SqliteStore,
};
use log::info;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

const IDLE_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Parser)]
#[command(name = "huddle", version, about = "Morning huddle roster and notes")]
struct Args {
    /// Profile database path.
    #[arg(long, default_value = "huddle.sqlite3")]
    db: PathBuf,
    /// JSON session config file; without one every change is saved immediately.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory receiving exported documents.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,
    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let config = match args.config.as_ref() {
        Some(path) => load_config(path).map_err(|err| err.to_string())?,
        None => SessionConfig::write_through(),
    };
    let store = SqliteStore::open(&args.db).map_err(|err| err.to_string())?;
    let session = RosterSession::open(store, config);
    let mut host = Host::new(session, DirectorySink::new(&args.out_dir));
    info!(
        "event=cli_start module=cli status=ok members={}",
        host.session().members().len()
    );

    // StdinLock is not Send; the reader thread owns its own buffered handle.
    let lines = spawn_line_reader(BufReader::new(io::stdin()));
    let mut stdout = io::stdout();
    let result = run_loop(&mut host, &lines, IDLE_POLL, &mut stdout);

    host.finish();
    info!("event=cli_exit module=cli status=ok");
    result.map_err(|err| format!("terminal I/O failed: {err}"))
}
