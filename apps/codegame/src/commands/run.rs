//! Run command for the codegame CLI.
//!
//! Runs the project in the current directory through its language module.
//! Any arguments after the options are passed to the program.
//!
//! ```bash
//! codegame run                                  # Uses the URL in .codegame.json
//! codegame run --override-url localhost:8080    # Different server for this run
//! codegame run -- --my-flag value               # Arguments for the program
//! ```

use anyhow::Result;
use clap::Args;

use super::{current_project, family_for};
use crate::modules::data::RunData;
use crate::modules::{Environment, LATEST, ModuleRequest, ModuleRunner};
use crate::server::normalize_url;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Override the game URL in .codegame.json for this run.
    #[clap(short = 'u', long)]
    pub override_url: Option<String>,

    /// Arguments to pass to the program.
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Executes the run command.
///
/// ## Exit Codes
///
/// - Returns `Ok(())` if the program exits successfully
/// - Returns `Err(CodegameError::ProcessExitCode)` if it exits with a
///   non-zero code
///
/// # Errors
///
/// Returns an error if the current directory is not inside a project, the
/// language is unsupported or the module cannot be installed.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let (root, project) = current_project()?;
    let family = family_for(&project.lang)?;

    let url = args
        .override_url
        .as_deref()
        .map(normalize_url)
        .or_else(|| project.url.clone());
    let payload = RunData {
        lang: project.lang.clone(),
        url,
        args: args.args.clone(),
    };

    ModuleRunner::new(Environment::detect()?)
        .invoke(&ModuleRequest {
            family,
            kind: project.kind,
            library_version: LATEST,
            verb: &["run"],
            args: &args.args,
            payload: &payload,
            working_dir: Some(&root),
        })
        .await
}
