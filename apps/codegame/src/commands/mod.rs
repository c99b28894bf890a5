//! Command modules for the codegame CLI.
//!
//! ## Project Commands
//!
//! - [`new`] - Create a new game client or server
//! - [`update`] - Update the project to the library compatible with its server
//! - [`run`] - Run the project
//! - [`build`] - Build the project
//! - [`change_url`] - Switch a client to another server of the same game
//!
//! ## Information Commands
//!
//! - [`info`] - Display the metadata of a game server
//! - [`version`] - Display version information
//!
//! Project commands delegate the language-specific work to the module of
//! the project's language; see [`crate::modules`].

pub mod build;
pub mod change_url;
pub mod info;
pub mod new;
pub mod run;
pub mod update;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::errors::CodegameError;
use crate::modules::gen_events::{EventsGenerator, events_output_dir, supports_language};
use crate::modules::{Environment, SemanticVersion, module_family, print_warning};
use crate::project::{CodeGameFile, find_project_root};
use crate::server::GameServer;

/// Returns the module family for `lang` or a descriptive error.
fn family_for(lang: &str) -> Result<&'static str> {
    module_family(lang).ok_or_else(|| {
        CodegameError::invalid_arguments(format!(
            "unsupported language '{lang}' (supported: go, js, ts)"
        ))
        .into()
    })
}

/// Locates and loads the project containing the current directory.
fn current_project() -> Result<(PathBuf, CodeGameFile)> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let root = find_project_root(&cwd)?;
    let file = CodeGameFile::load(&root)?;
    Ok((root, file))
}

/// Whether servers speaking `cge_version` support generated event wrappers.
fn wrappers_supported(cge_version: &str) -> bool {
    SemanticVersion::parse(cge_version).is_ok_and(|v| v.at_least(0, 3))
}

/// Regenerates event wrappers for a client project, if its language has them.
///
/// A failure is reported as a warning; the project itself is usable without
/// wrappers.
async fn generate_wrappers(
    env: &Environment,
    server: &GameServer,
    cge_version: &str,
    lang: &str,
    project_root: &Path,
) {
    if !supports_language(lang) || !wrappers_supported(cge_version) {
        return;
    }

    let output = events_output_dir(lang, &server.info.name);
    let result = EventsGenerator::new(env)
        .generate(
            cge_version,
            &server.base_url,
            lang,
            &output,
            Some(project_root),
        )
        .await;

    if let Err(e) = result {
        print_warning(&format!("Failed to generate event definitions: {e}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_for_rejects_unknown_language() {
        assert_eq!(family_for("ts").unwrap(), "js");
        let err = family_for("cobol").unwrap_err();
        assert!(err.to_string().contains("unsupported language 'cobol'"));
    }

    #[test]
    fn wrappers_start_with_cge_0_3() {
        assert!(!wrappers_supported("0.2"));
        assert!(wrappers_supported("0.3"));
        assert!(wrappers_supported("1.0"));
        assert!(!wrappers_supported("garbage"));
    }
}
