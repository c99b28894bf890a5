//! New project command for the codegame CLI.
//!
//! Creates a game client for an existing game server, or a new game server.
//!
//! ## Usage
//!
//! ```bash
//! codegame new client tictactoe --url games.example.com --lang go
//! codegame new server chess --lang go
//! ```
//!
//! ## Client Creation Pipeline
//!
//! 1. **Probe** - Read `/info` and `/events` from the game server
//! 2. **Resolve** - Find the client library version for the server's
//!    CodeGame version
//! 3. **Create** - Create the project directory and `.codegame.json`
//! 4. **Template** - Run the language module's `new client`
//! 5. **Wrappers** - Generate event wrappers with `cg-gen-events` (CGE 0.3+)

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::{family_for, generate_wrappers, wrappers_supported};
use crate::modules::data::{NewClientData, NewServerData};
use crate::modules::library::library_version;
use crate::modules::{Environment, LATEST, ManifestFetcher, ModuleRequest, ModuleRunner, ProjectKind};
use crate::project::{CodeGameFile, create_project_dir};
use crate::server::GameServer;

/// Arguments for the `new` command.
#[derive(Args)]
pub struct NewArgs {
    /// Kind of project to create.
    #[command(subcommand)]
    pub kind: NewKind,
}

/// Project kinds `new` can create.
#[derive(Subcommand)]
pub enum NewKind {
    /// Create a client for an existing game server.
    Client(NewClientArgs),
    /// Create a game server.
    Server(NewServerArgs),
}

/// Arguments for `new client`.
#[derive(Args)]
pub struct NewClientArgs {
    /// Name of the project directory.
    pub name: String,

    /// URL of the game server.
    #[clap(short, long)]
    pub url: String,

    /// Project language (go, js, ts).
    #[clap(short, long)]
    pub lang: String,

    /// Parent directory for the project (defaults to current directory).
    #[clap(long, default_value = ".")]
    pub path: PathBuf,
}

/// Arguments for `new server`.
#[derive(Args)]
pub struct NewServerArgs {
    /// Name of the game and of the project directory.
    pub name: String,

    /// Project language (go, js, ts).
    #[clap(short, long)]
    pub lang: String,

    /// Server library version to use.
    #[clap(long, default_value = LATEST)]
    pub library_version: String,

    /// Parent directory for the project (defaults to current directory).
    #[clap(long, default_value = ".")]
    pub path: PathBuf,
}

/// Executes the `new` command.
///
/// # Errors
///
/// Returns an error if:
/// - The language is not supported
/// - The game server cannot be reached (clients)
/// - The project directory is invalid or already exists
/// - The language module fails
pub async fn execute(args: &NewArgs) -> Result<()> {
    match &args.kind {
        NewKind::Client(args) => new_client(args).await,
        NewKind::Server(args) => new_server(args).await,
    }
}

async fn new_client(args: &NewClientArgs) -> Result<()> {
    let family = family_for(&args.lang)?;
    let env = Environment::detect()?;

    let server = GameServer::connect(&env.client, &args.url).await?;
    let cge_version = server
        .cge_version()
        .await
        .context("Failed to determine the CGE version of the game server")?;
    let library_version =
        library_version(&ManifestFetcher::new(&env), family, &server.info.cg_version).await;

    let project_path = create_project_dir(&args.name, &args.path)?;
    CodeGameFile::new(
        &server.info.name,
        ProjectKind::Client,
        &args.lang,
        Some(server.url.clone()),
    )
    .write(&project_path)?;

    let payload = NewClientData {
        lang: args.lang.clone(),
        name: server.info.name.clone(),
        url: server.url.clone(),
        library_version: library_version.clone(),
        generate_wrappers: wrappers_supported(&cge_version),
    };
    let extra_args = language_flags(&args.lang);

    ModuleRunner::new(env.clone())
        .invoke(&ModuleRequest {
            family,
            kind: ProjectKind::Client,
            library_version: &library_version,
            verb: &["new", "client"],
            args: &extra_args,
            payload: &payload,
            working_dir: Some(&project_path),
        })
        .await?;

    generate_wrappers(&env, &server, &cge_version, &args.lang, &project_path).await;

    println!("Successfully created project in '{}'.", project_path.display());
    Ok(())
}

async fn new_server(args: &NewServerArgs) -> Result<()> {
    let family = family_for(&args.lang)?;
    let env = Environment::detect()?;

    let project_path = create_project_dir(&args.name, &args.path)?;
    CodeGameFile::new(&args.name, ProjectKind::Server, &args.lang, None).write(&project_path)?;

    let payload = NewServerData {
        lang: args.lang.clone(),
        library_version: args.library_version.clone(),
    };
    let extra_args = language_flags(&args.lang);

    ModuleRunner::new(env)
        .invoke(&ModuleRequest {
            family,
            kind: ProjectKind::Server,
            library_version: &args.library_version,
            verb: &["new", "server"],
            args: &extra_args,
            payload: &payload,
            working_dir: Some(&project_path),
        })
        .await?;

    println!("Successfully created project in '{}'.", project_path.display());
    Ok(())
}

/// Extra module arguments selecting a language variant.
fn language_flags(lang: &str) -> Vec<String> {
    if lang == "ts" {
        vec!["--typescript".to_string()]
    } else {
        Vec::new()
    }
}
