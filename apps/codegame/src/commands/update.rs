//! Update command for the codegame CLI.
//!
//! Brings the project's library dependency in line with its game server:
//! clients switch to the library version matching the server's CodeGame
//! version and get fresh event wrappers, servers update to the newest
//! library.

use anyhow::{Context, Result};
use clap::Args;

use super::{current_project, family_for, generate_wrappers};
use crate::errors::CodegameError;
use crate::modules::data::UpdateData;
use crate::modules::library::library_version;
use crate::modules::{Environment, LATEST, ManifestFetcher, ModuleRequest, ModuleRunner, ProjectKind};
use crate::server::GameServer;

/// Arguments for the update command.
#[derive(Args, Default)]
pub struct UpdateArgs {
    /// Arguments passed to the language module.
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Executes the update command.
///
/// # Errors
///
/// Returns an error if:
/// - The current directory is not inside a project
/// - The project language is not supported
/// - The game server of a client project cannot be reached
/// - The language module fails
pub async fn execute(args: &UpdateArgs) -> Result<()> {
    let (root, project) = current_project()?;
    let family = family_for(&project.lang)?;
    let env = Environment::detect()?;

    match project.kind {
        ProjectKind::Client => {
            let url = project.url.as_deref().ok_or_else(|| {
                CodegameError::invalid_arguments("the project has no game server URL")
            })?;
            let server = GameServer::connect(&env.client, url).await?;
            let cge_version = server
                .cge_version()
                .await
                .context("Failed to determine the CGE version of the game server")?;
            let library_version =
                library_version(&ManifestFetcher::new(&env), family, &server.info.cg_version)
                    .await;

            let payload = UpdateData {
                lang: project.lang.clone(),
                library_version: library_version.clone(),
            };
            ModuleRunner::new(env.clone())
                .invoke(&ModuleRequest {
                    family,
                    kind: ProjectKind::Client,
                    library_version: &library_version,
                    verb: &["update"],
                    args: &args.args,
                    payload: &payload,
                    working_dir: Some(&root),
                })
                .await?;

            generate_wrappers(&env, &server, &cge_version, &project.lang, &root).await;
        }
        ProjectKind::Server => {
            let payload = UpdateData {
                lang: project.lang.clone(),
                library_version: LATEST.to_string(),
            };
            ModuleRunner::new(env)
                .invoke(&ModuleRequest {
                    family,
                    kind: ProjectKind::Server,
                    library_version: LATEST,
                    verb: &["update"],
                    args: &args.args,
                    payload: &payload,
                    working_dir: Some(&root),
                })
                .await?;
        }
    }

    println!("Successfully updated project.");
    Ok(())
}
