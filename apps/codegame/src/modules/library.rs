//! Client library versions.
//!
//! Each client library publishes a flat `versions.json` mapping CodeGame
//! protocol versions to the library version that speaks them. The result is
//! handed to the language module, which in turn picks a module release
//! supporting that library version.

use super::compat::{TargetVersion, compatible_version};
use super::environment::Repository;
use super::invoke::LATEST;
use super::manifest::{ManifestFetcher, ProjectKind};
use super::print_warning;

/// Repository of the client library for a module family.
#[must_use]
pub fn client_library(family: &str) -> Option<Repository> {
    match family {
        "go" => Some(Repository::codegame("go-client")),
        "js" => Some(Repository::codegame("javascript-client")),
        _ => None,
    }
}

/// Returns the library version compatible with `cg_version`, or [`LATEST`].
///
/// Unknown families and unreachable manifests also yield [`LATEST`]; the
/// latter with a warning.
pub async fn library_version(fetcher: &ManifestFetcher, family: &str, cg_version: &str) -> String {
    let Some(repository) = client_library(family) else {
        return LATEST.to_string();
    };

    let manifest = fetcher.fetch_or_empty(&repository, print_warning).await;
    match compatible_version(
        manifest.section(ProjectKind::Client),
        cg_version,
        print_warning,
    ) {
        TargetVersion::Resolved(version) => version,
        TargetVersion::UseLatestRelease => LATEST.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::environment::{Endpoints, Environment};
    use crate::modules::paths::CodegamePaths;
    use crate::modules::platform::{Arch, Os, Platform};

    async fn fetcher(server: &mockito::Server) -> ManifestFetcher {
        let env = Environment::new(
            CodegamePaths::with_root(std::env::temp_dir().join("codegame_library_test")),
            Endpoints::single_host(&server.url()),
            Platform::new(Os::Linux, Arch::Amd64),
        )
        .unwrap();
        ManifestFetcher::new(&env)
    }

    #[test]
    fn library_repositories() {
        assert_eq!(client_library("go").unwrap().name, "go-client");
        assert_eq!(client_library("js").unwrap().name, "javascript-client");
        assert!(client_library("rust").is_none());
    }

    #[tokio::test]
    async fn resolves_through_flat_manifest() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/code-game-project/go-client/main/versions.json")
            .with_status(200)
            .with_body(r#"{"0.6":"0.8","0.7":"0.9"}"#)
            .create_async()
            .await;

        let fetcher = fetcher(&server).await;
        assert_eq!(library_version(&fetcher, "go", "0.7").await, "0.9");
    }

    #[tokio::test]
    async fn unreachable_manifest_means_latest() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let fetcher = fetcher(&server).await;
        assert_eq!(library_version(&fetcher, "js", "0.7").await, LATEST);
    }
}
