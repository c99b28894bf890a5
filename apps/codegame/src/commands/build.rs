//! Build command for the codegame CLI.
//!
//! Builds the project in the current directory through its language module.

use anyhow::Result;
use clap::Args;

use super::{current_project, family_for};
use crate::modules::data::BuildData;
use crate::modules::{Environment, LATEST, ModuleRequest, ModuleRunner};

/// Arguments for the build command.
#[derive(Args)]
pub struct BuildArgs {
    /// Output file or directory.
    #[clap(short, long)]
    pub output: Option<String>,

    /// Arguments passed to the language module.
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Executes the build command.
///
/// # Errors
///
/// Returns an error if the current directory is not inside a project, the
/// language is unsupported, the module cannot be installed or the build
/// fails.
pub async fn execute(args: &BuildArgs) -> Result<()> {
    let (root, project) = current_project()?;
    let family = family_for(&project.lang)?;

    let payload = BuildData {
        lang: project.lang.clone(),
        output: args.output.clone(),
    };

    ModuleRunner::new(Environment::detect()?)
        .invoke(&ModuleRequest {
            family,
            kind: project.kind,
            library_version: LATEST,
            verb: &["build"],
            args: &args.args,
            payload: &payload,
            working_dir: Some(&root),
        })
        .await
}
