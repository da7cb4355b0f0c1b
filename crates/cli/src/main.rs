mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use isoenv_lib::config::{Overrides, Settings, Value, dest};

use crate::cmd::CreateArgs;
use crate::output::OutputFormat;

/// isoenv - Isolated interpreter environments
#[derive(Parser)]
#[command(name = "isoenv")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Increase verbosity (repeatable)
  #[arg(short, long, global = true, action = ArgAction::Count)]
  verbose: u8,

  /// Decrease verbosity (repeatable)
  #[arg(short, long, global = true, action = ArgAction::Count)]
  quiet: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Create an environment
  Create(CreateArgs),

  /// Make an existing environment relocatable
  Relocate {
    /// Root of the environment
    dest: PathBuf,
  },

  /// Show platform and merged configuration
  Info {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      output::print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let merger = cmd::load_merger()?;

  let mut overrides = match &cli.command {
    Commands::Create(args) => args.overrides(),
    _ => Overrides::new(),
  };
  if cli.verbose > 0 {
    overrides.set(dest::VERBOSE, Value::Count(cli.verbose.into()));
  }
  if cli.quiet > 0 {
    overrides.set(dest::QUIET, Value::Count(cli.quiet.into()));
  }

  let snapshot = merger.merge(&overrides);
  let settings = Settings::from_snapshot(&snapshot);
  init_tracing(settings.verbosity);

  match cli.command {
    Commands::Create(args) => cmd::cmd_create(&args.dest, &settings),
    Commands::Relocate { dest } => cmd::cmd_relocate(&dest),
    Commands::Info { format } => cmd::cmd_info(&merger, &snapshot, format),
  }
}

/// Install the log subscriber. `RUST_LOG` takes precedence over verbosity.
fn init_tracing(verbosity: i32) {
  let level = match verbosity {
    i32::MIN..=-2 => "error",
    -1 => "warn",
    0 => "info",
    1 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
