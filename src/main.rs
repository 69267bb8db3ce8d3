use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use pytest_digest::cmd;
use std::path::PathBuf;
use std::process;

/// pytest transcript digester
///
/// pytest-digest turns raw pytest console logs from CI runs into three
/// deduplicated tables (per-test status, timing, failure details) that
/// accumulate across runs.
#[derive(Parser)]
#[command(name = "pytest-digest", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract tables from pytest logs and merge them into the store
    Ingest {
        /// Log files; the name `<test>.<region>.<run id>.log` supplies the run id
        #[arg(value_name = "LOG", required = true)]
        logs: Vec<PathBuf>,

        /// Directory holding the tables (default: store-dir from config, or bin)
        #[arg(short, long, value_name = "DIR")]
        store: Option<PathBuf>,

        /// Output as JSON (for CI integration)
        #[arg(long)]
        json: bool,

        /// Merge and report without writing any table
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Summarize the stored tables
    Summary {
        /// Directory holding the tables (default: store-dir from config, or bin)
        #[arg(short, long, value_name = "DIR")]
        store: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the jobs of a saved `gh run view` output
    Jobs {
        /// Text file holding the run view
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match &cli.command {
        Some(Commands::Ingest {
            logs,
            store,
            json,
            dry_run,
        }) => cmd::cmd_ingest(logs, store.as_deref(), *json, *dry_run),
        Some(Commands::Summary { store, json }) => cmd::cmd_summary(store.as_deref(), *json),
        Some(Commands::Jobs { file, json }) => cmd::cmd_jobs(file, *json),
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(*shell, &mut Cli::command());
            Ok(())
        }
        None => {
            // No subcommand provided, show help
            let _ = Cli::command().print_help();
            Ok(())
        }
    };

    if let Err(e) = result {
        use pytest_digest::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}
