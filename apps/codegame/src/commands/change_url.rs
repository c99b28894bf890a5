//! Change URL command for the codegame CLI.
//!
//! Points a client project at another server running the same game and
//! updates the project for that server. If the update fails, the previous
//! URL is written back.

use anyhow::{Result, bail};
use clap::Args;

use super::current_project;
use super::update::{self, UpdateArgs};
use crate::errors::CodegameError;
use crate::modules::environment::http_client;
use crate::modules::{ProjectKind, print_warning};
use crate::server::GameServer;

/// Arguments for the change-url command.
#[derive(Args)]
pub struct ChangeUrlArgs {
    /// URL of the new game server.
    pub url: String,
}

/// Executes the change-url command.
///
/// # Errors
///
/// Returns an error if:
/// - The current directory is not inside a client project
/// - No game server answers at the URL, or it runs a different game
/// - The update for the new server fails
pub async fn execute(args: &ChangeUrlArgs) -> Result<()> {
    let (root, mut project) = current_project()?;
    if project.kind != ProjectKind::Client {
        return Err(CodegameError::invalid_arguments("the project is not a client").into());
    }

    let server = GameServer::connect(&http_client()?, &args.url.to_lowercase()).await?;
    if server.info.name != project.game {
        bail!(
            "The URL points to a different game ('{}' instead of '{}').",
            server.info.name,
            project.game
        );
    }

    let previous = project.url.replace(server.url.clone());
    project.write(&root)?;
    tracing::debug!(url = %server.url, ?previous, "changed game URL");

    if let Err(e) = update::execute(&UpdateArgs::default()).await {
        project.url = previous;
        if let Err(restore) = project.write(&root) {
            print_warning(&format!("Failed to restore the previous URL: {restore}"));
        }
        return Err(e);
    }

    println!("Game URL changed to '{}'.", server.url);
    Ok(())
}
