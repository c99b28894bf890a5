//! Installation of versioned executables from GitHub releases.
//!
//! Each executable family (a language module, `cg-gen-events`) lives in its
//! own directory. Installed files carry their version in the name, e.g.
//! `codegame-go_0-6-2`. Only one patch release per `major.minor` is kept:
//! installing `0.6.3` removes `0.6.2`, while `0.5.x` and `0.7.x` stay.
//!
//! Installation is not guarded against concurrent CLI invocations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::archive::extract_entry;
use super::download::download_file;
use super::environment::{Endpoints, Environment, Repository};
use super::paths::CodegamePaths;
use super::platform::Platform;
use super::version::SemanticVersion;

/// An executable family published as release archives of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Repository publishing the releases.
    pub repository: Repository,
    /// Executable base name inside the archive, without extension.
    pub executable: String,
    /// Directory holding the installed versions.
    pub install_dir: PathBuf,
}

impl Artifact {
    /// The module for a language family (`codegame-cli-go` / `codegame-go`).
    #[must_use]
    pub fn module(paths: &CodegamePaths, family: &str) -> Self {
        Self {
            repository: Repository::codegame(format!("codegame-cli-{family}")),
            executable: format!("codegame-{family}"),
            install_dir: paths.modules_dir(family),
        }
    }

    /// The `cg-gen-events` wrapper generator.
    #[must_use]
    pub fn gen_events(paths: &CodegamePaths) -> Self {
        Self {
            repository: Repository::codegame("cg-gen-events"),
            executable: "cg-gen-events".to_string(),
            install_dir: paths.gen_events_dir(),
        }
    }
}

/// File name of `executable` at `version`, e.g. `codegame-go_0-6-2`.
#[must_use]
pub fn installed_file_name(executable: &str, version: &str, platform: Platform) -> String {
    format!(
        "{executable}_{}{}",
        version.replace('.', "-"),
        platform.executable_extension()
    )
}

/// Selects the files in `existing` that installing `version` supersedes.
///
/// A file is superseded when it belongs to `executable` and has the same
/// `major.minor` as `version`. Versions that do not name a minor supersede
/// nothing.
#[must_use]
pub fn candidates_to_prune(existing: &[String], executable: &str, version: &str) -> Vec<String> {
    let mut components = version.splitn(3, '.');
    let (Some(major), Some(minor)) = (components.next(), components.next()) else {
        return Vec::new();
    };
    let Ok(parsed) = SemanticVersion::parse_prefix(&format!("{major}.{minor}")) else {
        return Vec::new();
    };

    let family_prefix = format!("{executable}_{}", parsed.minor_prefix());
    existing
        .iter()
        .filter(|name| match name.strip_prefix(&family_prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('-') || rest.starts_with('.'),
            None => false,
        })
        .cloned()
        .collect()
}

/// Deletes the files of `install_dir` that `version` supersedes.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed or a file cannot be
/// removed.
pub fn prune_superseded(install_dir: &Path, executable: &str, version: &str) -> Result<()> {
    let existing = CodegamePaths::installed_files(install_dir)?;
    for name in candidates_to_prune(&existing, executable, version) {
        let path = install_dir.join(&name);
        tracing::debug!(path = %path.display(), "removing superseded version");
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Downloads and installs artifact versions on demand.
#[derive(Debug, Clone)]
pub struct Installer {
    client: reqwest::Client,
    endpoints: Endpoints,
    platform: Platform,
}

impl Installer {
    /// Creates an installer for the environment's platform.
    #[must_use]
    pub fn new(env: &Environment) -> Self {
        Self {
            client: env.client.clone(),
            endpoints: env.endpoints.clone(),
            platform: env.platform,
        }
    }

    /// Returns the path of `artifact` at `version`, installing it if needed.
    ///
    /// An existing file is reused as is. Otherwise the release archive of
    /// tag `v<version>` is downloaded and the executable is extracted next to
    /// the final path. Superseded versions of the same minor are removed just
    /// before it is moved into place, so a failed install leaves them intact.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::CodegameError::DownloadFailed`],
    /// [`crate::errors::CodegameError::ExtractionFailed`] or
    /// [`crate::errors::CodegameError::EntryNotFound`] for the respective
    /// step, or an I/O error.
    pub async fn ensure_installed(&self, artifact: &Artifact, version: &str) -> Result<PathBuf> {
        let file_name = installed_file_name(&artifact.executable, version, self.platform);
        let final_path = artifact.install_dir.join(&file_name);

        if final_path.is_file() {
            tracing::debug!(path = %final_path.display(), "already installed");
            return Ok(final_path);
        }

        std::fs::create_dir_all(&artifact.install_dir).with_context(|| {
            format!(
                "Failed to create directory: {}",
                artifact.install_dir.display()
            )
        })?;

        let asset = self.platform.asset_name(&artifact.repository.name);
        let url = self
            .endpoints
            .release_asset_url(&artifact.repository, &format!("v{version}"), &asset);

        eprintln!("Installing {} v{version}...", artifact.executable);

        let download_dir = tempfile::Builder::new()
            .prefix(".download-")
            .tempdir_in(&artifact.install_dir)
            .context("Failed to create download directory")?;
        let archive_path = download_dir.path().join(&asset);
        download_file(&self.client, &url, &archive_path).await?;

        let entry_name = format!(
            "{}{}",
            artifact.executable,
            self.platform.executable_extension()
        );
        let staging = tempfile::NamedTempFile::new_in(&artifact.install_dir)
            .context("Failed to create staging file")?
            .into_temp_path();
        extract_entry(
            &archive_path,
            self.platform.archive_format(),
            &entry_name,
            &staging,
        )?;

        // Superseded files go only once the replacement is complete.
        prune_superseded(&artifact.install_dir, &artifact.executable, version)?;
        staging
            .persist(&final_path)
            .with_context(|| format!("Failed to move executable to {}", final_path.display()))?;

        tracing::debug!(path = %final_path.display(), "installed");
        Ok(final_path)
    }
}
