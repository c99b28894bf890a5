//! `versions.json` compatibility manifests.
//!
//! Every module and client library repository carries a `versions.json` on its
//! default branch. Module repositories split it by project kind:
//!
//! ```json
//! { "client": { "0.6": "0.3" }, "server": { "0.6": "0.2" } }
//! ```
//!
//! Client library repositories use a single flat map from CodeGame version to
//! library version. Both shapes are accepted everywhere.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::environment::{Endpoints, Environment, Repository};
use crate::errors::CodegameError;

/// Branches searched for `versions.json`, in order.
const MANIFEST_BRANCHES: [&str; 2] = ["main", "master"];

/// Whether a project is a game client or a game server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// A game client.
    Client,
    /// A game server.
    Server,
}

impl ProjectKind {
    /// Lowercase name, as used in manifests and module arguments.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectKind {
    type Err = CodegameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "server" => Ok(Self::Server),
            other => Err(CodegameError::InvalidProjectType {
                kind: other.to_string(),
            }),
        }
    }
}

/// Separate maps for client and server projects. A missing section is empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitVersions {
    /// Versions used by client projects.
    #[serde(default)]
    pub client: HashMap<String, String>,
    /// Versions used by server projects.
    #[serde(default)]
    pub server: HashMap<String, String>,
}

/// A decoded `versions.json`.
///
/// An object with only `client` and/or `server` keys is split. Any other key
/// makes it flat.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum VersionsManifest {
    /// One map per project kind.
    Split(SplitVersions),
    /// One map for everything.
    Flat(HashMap<String, String>),
}

impl VersionsManifest {
    /// A manifest without entries. Resolving against it always yields the
    /// latest release.
    #[must_use]
    pub fn empty() -> Self {
        Self::Flat(HashMap::new())
    }

    /// Returns the map relevant for `kind`. Flat manifests apply to both kinds.
    #[must_use]
    pub fn section(&self, kind: ProjectKind) -> &HashMap<String, String> {
        match (self, kind) {
            (Self::Split(split), ProjectKind::Client) => &split.client,
            (Self::Split(split), ProjectKind::Server) => &split.server,
            (Self::Flat(map), _) => map,
        }
    }
}

/// Downloads `versions.json` manifests. Nothing is cached.
#[derive(Debug, Clone)]
pub struct ManifestFetcher {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl ManifestFetcher {
    /// Creates a fetcher using the environment's client and endpoints.
    #[must_use]
    pub fn new(env: &Environment) -> Self {
        Self {
            client: env.client.clone(),
            endpoints: env.endpoints.clone(),
        }
    }

    /// Fetches the manifest of `repository`, trying `main` and then `master`.
    ///
    /// # Errors
    ///
    /// Returns [`CodegameError::ManifestUnavailable`] if neither branch serves
    /// the file or the file is not a valid manifest.
    pub async fn fetch(&self, repository: &Repository) -> Result<VersionsManifest> {
        let mut last_error = String::new();

        for branch in MANIFEST_BRANCHES {
            let url = self.endpoints.manifest_url(repository, branch);
            tracing::debug!(%url, "fetching versions manifest");

            let response = match self.client.get(&url).send().await {
                Ok(response) => response,
                Err(e) => {
                    last_error = e.to_string();
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                last_error = format!("HTTP {status} from {url}");
                continue;
            }

            let body = response.bytes().await.map_err(|e| {
                CodegameError::manifest_unavailable(repository.to_string(), e.to_string())
            })?;
            let manifest = serde_json::from_slice(&body).map_err(|e| {
                CodegameError::manifest_unavailable(
                    repository.to_string(),
                    format!("invalid versions.json: {e}"),
                )
            })?;
            return Ok(manifest);
        }

        Err(CodegameError::manifest_unavailable(repository.to_string(), last_error).into())
    }

    /// Fetches the manifest, degrading to [`VersionsManifest::empty`] on failure.
    ///
    /// The failure is reported through `warn`.
    pub async fn fetch_or_empty<F>(&self, repository: &Repository, mut warn: F) -> VersionsManifest
    where
        F: FnMut(&str),
    {
        match self.fetch(repository).await {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::debug!(error = %e, "manifest fetch failed");
                warn(&format!(
                    "Couldn't fetch version metadata of {repository}. Using latest version."
                ));
                VersionsManifest::empty()
            }
        }
    }
}
