//! Event wrapper generation with `cg-gen-events`.
//!
//! The generator is versioned like the CGE language: a game server speaking
//! CGE `0.4` needs a `v0.4.x` release of `cg-gen-events`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::environment::Environment;
use super::install::{Artifact, Installer};
use super::invoke::run_executable;
use super::tags::TagLocator;

/// Languages `cg-gen-events` produces wrappers for.
pub const SUPPORTED_LANGUAGES: [&str; 2] = ["go", "ts"];

/// Returns whether wrappers are generated for projects in `lang`.
#[must_use]
pub fn supports_language(lang: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&lang)
}

/// Directory the generated files go to, relative to the project root.
///
/// Go wrappers form their own package named after the game with `-` and `_`
/// removed; everything else is written into the root.
#[must_use]
pub fn events_output_dir(lang: &str, game_name: &str) -> PathBuf {
    if lang == "go" {
        PathBuf::from(game_name.replace(['-', '_'], ""))
    } else {
        PathBuf::from(".")
    }
}

/// Installs and runs `cg-gen-events`.
#[derive(Debug, Clone)]
pub struct EventsGenerator {
    artifact: Artifact,
    tags: TagLocator,
    installer: Installer,
}

impl EventsGenerator {
    /// Creates a generator for `env`.
    #[must_use]
    pub fn new(env: &Environment) -> Self {
        Self {
            artifact: Artifact::gen_events(&env.paths),
            tags: TagLocator::new(env),
            installer: Installer::new(env),
        }
    }

    /// Generates `lang` wrappers for the game at `url` into `output`.
    ///
    /// `output` is interpreted relative to `working_dir` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if no release matches `cge_version`, installation
    /// fails or the generator exits unsuccessfully.
    pub async fn generate(
        &self,
        cge_version: &str,
        url: &str,
        lang: &str,
        output: &Path,
        working_dir: Option<&Path>,
    ) -> Result<()> {
        let tag = self
            .tags
            .resolve_tag(&self.artifact.repository, cge_version)
            .await?;
        let executable = self
            .installer
            .ensure_installed(&self.artifact, tag.version())
            .await?;

        let args = vec![
            url.to_string(),
            "--languages".to_string(),
            lang.to_string(),
            "--output".to_string(),
            output.display().to_string(),
        ];
        run_executable(&executable, &args, &[], working_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_output_strips_separators() {
        assert_eq!(
            events_output_dir("go", "tic-tac_toe"),
            PathBuf::from("tictactoe")
        );
    }

    #[test]
    fn other_languages_use_project_root() {
        assert_eq!(events_output_dir("ts", "tic-tac-toe"), PathBuf::from("."));
    }

    #[test]
    fn only_go_and_ts_are_supported() {
        assert!(supports_language("go"));
        assert!(supports_language("ts"));
        assert!(!supports_language("js"));
    }
}
