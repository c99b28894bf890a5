//! Resolving, installing and running language modules.
//!
//! ## Invocation Pipeline
//!
//! 1. **Resolve** - Map the library version to a module version using the
//!    module's `versions.json` (or take the newest release for `latest`)
//! 2. **Locate** - Find the release tag for that version
//! 3. **Install** - Download the module unless it is already installed
//! 4. **Configure** - Write the payload to a temporary JSON file
//! 5. **Execute** - Run the module with `CONFIG_FILE` pointing at that file
//!
//! The module inherits stdin, stdout and stderr. A non-zero exit code is
//! reported as [`CodegameError::ProcessExitCode`] and becomes the exit code of
//! the CLI.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use serde::Serialize;

use super::compat::{TargetVersion, compatible_version};
use super::environment::Environment;
use super::install::{Artifact, Installer};
use super::manifest::{ManifestFetcher, ProjectKind};
use super::print_warning;
use super::tags::{ReleaseTag, TagLocator};
use crate::errors::CodegameError;

/// Library version meaning "whatever the newest module supports".
pub const LATEST: &str = "latest";

/// Environment variable holding the payload path.
pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";

/// Progress of one invocation, traced at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InvocationState {
    ResolvingVersion,
    LocatingTag,
    Installing,
    ConfiguringPayload,
    Executing,
    Succeeded,
    Failed,
}

impl fmt::Display for InvocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ResolvingVersion => "resolving-version",
            Self::LocatingTag => "locating-tag",
            Self::Installing => "installing",
            Self::ConfiguringPayload => "configuring-payload",
            Self::Executing => "executing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

fn enter(state: InvocationState) {
    tracing::debug!(%state, "module invocation");
}

/// One call of a language module.
#[derive(Debug, Clone)]
pub struct ModuleRequest<'a, T> {
    /// Module family, e.g. `go` or `js`.
    pub family: &'a str,
    /// Which section of the module manifest applies.
    pub kind: ProjectKind,
    /// Library version the module has to support, or [`LATEST`].
    pub library_version: &'a str,
    /// Leading arguments, e.g. `["new", "client"]`.
    pub verb: &'a [&'a str],
    /// Arguments appended after the verb.
    pub args: &'a [String],
    /// Serialised into `CONFIG_FILE`.
    pub payload: &'a T,
    /// Working directory of the module; inherited when `None`.
    pub working_dir: Option<&'a Path>,
}

/// Runs language modules, installing them first when necessary.
#[derive(Debug, Clone)]
pub struct ModuleRunner {
    env: Environment,
    tags: TagLocator,
    manifests: ManifestFetcher,
    installer: Installer,
}

impl ModuleRunner {
    /// Creates a runner for `env`.
    #[must_use]
    pub fn new(env: Environment) -> Self {
        Self {
            tags: TagLocator::new(&env),
            manifests: ManifestFetcher::new(&env),
            installer: Installer::new(&env),
            env,
        }
    }

    /// Resolves, installs and runs the module described by `request`.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing step. A module that exits with a
    /// non-zero code yields [`CodegameError::ProcessExitCode`].
    pub async fn invoke<T: Serialize>(&self, request: &ModuleRequest<'_, T>) -> Result<()> {
        let result = self.run_pipeline(request).await;
        enter(if result.is_ok() {
            InvocationState::Succeeded
        } else {
            InvocationState::Failed
        });
        result
    }

    async fn run_pipeline<T: Serialize>(&self, request: &ModuleRequest<'_, T>) -> Result<()> {
        let artifact = Artifact::module(&self.env.paths, request.family);
        let tag = self
            .module_tag(&artifact, request.kind, request.library_version)
            .await?;

        enter(InvocationState::Installing);
        let executable = self
            .installer
            .ensure_installed(&artifact, tag.version())
            .await?;

        enter(InvocationState::ConfiguringPayload);
        let config = write_payload(request.payload)?;

        enter(InvocationState::Executing);
        let args = request
            .verb
            .iter()
            .map(|s| (*s).to_string())
            .chain(request.args.iter().cloned())
            .collect::<Vec<_>>();
        run_executable(
            &executable,
            &args,
            &[(CONFIG_FILE_ENV, config.path())],
            request.working_dir,
        )
    }

    /// Finds the module release supporting `library_version`.
    async fn module_tag(
        &self,
        artifact: &Artifact,
        kind: ProjectKind,
        library_version: &str,
    ) -> Result<ReleaseTag> {
        enter(InvocationState::ResolvingVersion);
        let target = if library_version == LATEST {
            TargetVersion::UseLatestRelease
        } else {
            let manifest = self
                .manifests
                .fetch_or_empty(&artifact.repository, print_warning)
                .await;
            compatible_version(manifest.section(kind), library_version, print_warning)
        };
        tracing::debug!(?target, module = %artifact.repository, "module version");

        enter(InvocationState::LocatingTag);
        match target {
            TargetVersion::Resolved(version) => {
                self.tags.resolve_tag(&artifact.repository, &version).await
            }
            TargetVersion::UseLatestRelease => self.tags.latest_tag(&artifact.repository).await,
        }
    }
}

/// Writes `payload` to a temporary JSON file that is deleted when dropped.
fn write_payload<T: Serialize>(payload: &T) -> Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("codegame-config-")
        .suffix(".json")
        .tempfile()
        .context("Failed to create config file")?;
    serde_json::to_writer(&mut file, payload).context("Failed to serialize module config")?;
    file.flush().context("Failed to write config file")?;
    Ok(file)
}

/// Runs `executable` with inherited stdio and waits for it.
///
/// # Errors
///
/// Returns [`CodegameError::SubprocessLaunchFailed`] if the file is missing,
/// not executable or cannot be spawned, and
/// [`CodegameError::ProcessExitCode`] for a non-zero exit.
pub fn run_executable(
    executable: &Path,
    args: &[String],
    envs: &[(&str, &Path)],
    working_dir: Option<&Path>,
) -> Result<()> {
    let launch_failed = |message: String| CodegameError::SubprocessLaunchFailed {
        path: executable.to_path_buf(),
        message,
    };

    let resolved: PathBuf = which::which(executable).map_err(|e| launch_failed(e.to_string()))?;

    let mut command = Command::new(&resolved);
    command
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    for (key, value) in envs {
        command.env(key, value);
    }
    if let Some(dir) = working_dir {
        command.current_dir(dir);
    }

    tracing::debug!(executable = %resolved.display(), ?args, "spawning");
    let status = command
        .status()
        .map_err(|e| launch_failed(e.to_string()))?;

    if !status.success() {
        let code = status.code().unwrap_or(1);
        return Err(CodegameError::process_exit_code(code).into());
    }

    Ok(())
}
