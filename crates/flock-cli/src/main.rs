//! Flock command line binary.
//!
//! # Usage
//!
//! ```bash
//! # Run a script file
//! flock --name Twitter script.flock
//!
//! # Read commands from stdin, with debug logging on stderr
//! echo "signup alice pass1" | flock --log-level debug
//! ```

use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use flock_cli::{CliError, Session, network_config};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Flock social network
#[derive(Parser, Debug)]
#[command(name = "flock")]
#[command(about = "Run a Flock social network script")]
#[command(version)]
struct Args {
    /// Script to run (stdin if omitted)
    script: Option<PathBuf>,

    /// Network name
    #[arg(short, long, default_value = "Flock")]
    name: String,

    /// Shortest accepted credential
    #[arg(long, default_value = "4")]
    min_credential_len: usize,

    /// Longest accepted credential
    #[arg(long, default_value = "8")]
    max_credential_len: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "flock failed");
            ExitCode::from(err.exit_code())
        },
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = network_config(&args.name, args.min_credential_len, args.max_credential_len)?;
    let mut session = Session::new(config, io::stdout().lock());

    let stats = match &args.script {
        Some(path) => {
            tracing::info!(path = %path.display(), "running script");
            session.run(BufReader::new(File::open(path)?))?
        },
        None => session.run(io::stdin().lock())?,
    };

    tracing::debug!(?stats, "done");
    Ok(())
}
