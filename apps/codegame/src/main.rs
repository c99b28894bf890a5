#![warn(clippy::pedantic)]

//! # CodeGame CLI (codegame)
//!
//! The `codegame` command creates, updates, runs and builds CodeGame game
//! clients and servers. Language-specific work is delegated to separately
//! released language modules, which the CLI installs on demand in a version
//! compatible with the project.
//!
//! ## Subcommands
//!
//! - `new client` - Create a client for an existing game server
//! - `new server` - Create a game server
//! - `update` - Update the project's library to match its game server
//! - `run` - Run the project
//! - `build` - Build the project
//! - `change-url` - Switch a client to another server of the same game
//! - `info` - Display the metadata of a game server
//! - `version` - Display version information
//!
//! ## Examples
//!
//! Create a Go client:
//! ```bash
//! codegame new client tictactoe --url games.example.com --lang go
//! ```
//!
//! Run it against another server:
//! ```bash
//! codegame run --override-url localhost:8080
//! ```

mod commands;
mod errors;
mod modules;
mod project;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{build, change_url, info, new, run, update, version};
use errors::CodegameError;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "CODEGAME_LOG";

/// CodeGame command line interface.
#[derive(Parser)]
#[command(
    name = "codegame",
    author,
    version,
    about = "The official CodeGame CLI",
    long_about = "The 'codegame' command creates and manages CodeGame game clients and servers. \
    Language-specific work is done by language modules that are installed automatically.",
    after_help = "\
ENVIRONMENT VARIABLES:
    CODEGAME_HOME               Data directory (default: <data dir>/codegame)
    CODEGAME_LOG                Log filter, e.g. 'debug' (default: warn)
    CODEGAME_GITHUB_API         GitHub API URL (default: https://api.github.com)
    CODEGAME_GITHUB_RAW         Raw file URL (default: https://raw.githubusercontent.com)
    CODEGAME_GITHUB_DOWNLOAD    Release download URL (default: https://github.com)"
)]
pub struct Cli {
    /// Print debug logs to stderr.
    #[clap(long, global = true, action = clap::ArgAction::SetTrue)]
    pub verbose: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the codegame CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new project.
    ///
    /// Creates the project directory and `.codegame.json`, then lets the
    /// language module fill in the template.
    New(new::NewArgs),

    /// Update the project to the library version compatible with its game server.
    Update(update::UpdateArgs),

    /// Run the project.
    ///
    /// Arguments after the options are passed to the program.
    Run(run::RunArgs),

    /// Build the project.
    Build(build::BuildArgs),

    /// Permanently switch a client project to another server of the same game.
    ///
    /// Updates the project for the new server and keeps the old URL if that
    /// fails.
    #[command(alias = "changeUrl")]
    ChangeUrl(change_url::ChangeUrlArgs),

    /// Display information about a game server.
    Info(info::InfoArgs),

    /// Display version information.
    Version,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let exit_code = handle_error(&e);
        std::process::exit(exit_code);
    }
}

/// Handles an error and returns the appropriate exit code.
///
/// For `ProcessExitCode` errors, returns the embedded exit code without
/// printing an error message (the module already printed its output).
/// For all other errors, prints the error and returns exit code 1.
fn handle_error(e: &anyhow::Error) -> i32 {
    if let Some(CodegameError::ProcessExitCode { code }) = e.downcast_ref::<CodegameError>() {
        return *code;
    }
    eprintln!("Error: {e:?}");
    1
}

/// Installs the stderr log subscriber.
///
/// `--verbose` wins over `CODEGAME_LOG`; without either only warnings are
/// shown.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("codegame=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::New(args) => new::execute(&args).await,
        Commands::Update(args) => update::execute(&args).await,
        Commands::Run(args) => run::execute(&args).await,
        Commands::Build(args) => build::execute(&args).await,
        Commands::ChangeUrl(args) => change_url::execute(&args).await,
        Commands::Info(args) => info::execute(&args).await,
        Commands::Version => version::execute(),
    }
}
