//! Language modules and the helper programs they depend on.
//!
//! Language-specific work (templates, builds, running) is done by separately
//! released executables. This module finds the release compatible with a
//! project, installs it under the data directory and runs it.
//!
//! ## Components
//!
//! - [`version`] - Lenient `major.minor.patch` parsing and ordering
//! - [`compat`] - Picks a compatible target version from a manifest
//! - [`manifest`] - Fetches `versions.json` from a repository
//! - [`tags`] - Finds release tags through the GitHub API
//! - [`install`] - Downloads, extracts and prunes installed versions
//! - [`invoke`] - Runs a module with its `CONFIG_FILE` payload
//! - [`library`] - Client library version for a CodeGame version
//! - [`gen_events`] - Installs and runs `cg-gen-events`

pub mod archive;
pub mod compat;
pub mod data;
pub mod download;
pub mod environment;
pub mod gen_events;
pub mod install;
pub mod invoke;
pub mod library;
pub mod manifest;
pub mod paths;
pub mod platform;
pub mod tags;
pub mod version;

pub use environment::Environment;
pub use invoke::{LATEST, ModuleRequest, ModuleRunner};
pub use manifest::{ManifestFetcher, ProjectKind};
pub use version::SemanticVersion;

/// Prints a non-fatal warning to stderr.
pub fn print_warning(message: &str) {
    eprintln!("Warning: {message}");
}

/// Maps a project language to the module family implementing it.
///
/// TypeScript projects are handled by the JavaScript module.
#[must_use]
pub fn module_family(lang: &str) -> Option<&'static str> {
    match lang {
        "go" => Some("go"),
        "js" | "ts" => Some("js"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typescript_uses_javascript_module() {
        assert_eq!(module_family("go"), Some("go"));
        assert_eq!(module_family("js"), Some("js"));
        assert_eq!(module_family("ts"), Some("js"));
        assert_eq!(module_family("cobol"), None);
    }
}
