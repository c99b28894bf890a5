//! Remote endpoints and the explicit environment handed to every component.
//!
//! Modules, manifests and helper programs are all published on GitHub. The
//! three hosts involved (REST API, raw file host, release downloads) can each
//! be overridden through an environment variable, which is how tests and
//! mirrors point the CLI somewhere else.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};

use super::paths::CodegamePaths;
use super::platform::Platform;

/// Overrides the GitHub REST API base URL.
pub const GITHUB_API_ENV: &str = "CODEGAME_GITHUB_API";

/// Overrides the raw file host base URL.
pub const GITHUB_RAW_ENV: &str = "CODEGAME_GITHUB_RAW";

/// Overrides the release download base URL.
pub const GITHUB_DOWNLOAD_ENV: &str = "CODEGAME_GITHUB_DOWNLOAD";

const DEFAULT_GITHUB_API: &str = "https://api.github.com";
const DEFAULT_GITHUB_RAW: &str = "https://raw.githubusercontent.com";
const DEFAULT_GITHUB_DOWNLOAD: &str = "https://github.com";

/// Organisation publishing every module and helper program.
pub const CODEGAME_OWNER: &str = "code-game-project";

/// User-Agent header for HTTP requests.
const USER_AGENT: &str = concat!("codegame-cli/", env!("CARGO_PKG_VERSION"));

/// Request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// A GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    /// Owning user or organisation.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl Repository {
    /// Creates a repository reference.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// A repository of the CodeGame organisation.
    #[must_use]
    pub fn codegame(name: impl Into<String>) -> Self {
        Self::new(CODEGAME_OWNER, name)
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Base URLs of the remote hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// GitHub REST API, used for tag listings.
    pub api: String,
    /// Raw file host, used for `versions.json`.
    pub raw: String,
    /// Release asset host.
    pub download: String,
}

impl Endpoints {
    /// Reads the endpoints from the environment, falling back to GitHub.
    ///
    /// Empty or whitespace-only values are treated as unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api: env_or(GITHUB_API_ENV, DEFAULT_GITHUB_API),
            raw: env_or(GITHUB_RAW_ENV, DEFAULT_GITHUB_RAW),
            download: env_or(GITHUB_DOWNLOAD_ENV, DEFAULT_GITHUB_DOWNLOAD),
        }
    }

    /// Points every host at one base URL. Used by tests against a mock server.
    #[must_use]
    pub fn single_host(base: &str) -> Self {
        let base = normalize_base(base);
        Self {
            api: base.clone(),
            raw: base.clone(),
            download: base,
        }
    }

    /// URL listing every tag of `repository`.
    #[must_use]
    pub fn tags_url(&self, repository: &Repository) -> String {
        format!(
            "{}/repos/{}/{}/tags",
            self.api, repository.owner, repository.name
        )
    }

    /// URL of `versions.json` on the given branch of `repository`.
    #[must_use]
    pub fn manifest_url(&self, repository: &Repository, branch: &str) -> String {
        format!(
            "{}/{}/{}/{branch}/versions.json",
            self.raw, repository.owner, repository.name
        )
    }

    /// URL of a release asset.
    #[must_use]
    pub fn release_asset_url(&self, repository: &Repository, tag: &str, asset: &str) -> String {
        format!(
            "{}/{}/{}/releases/download/{tag}/{asset}",
            self.download, repository.owner, repository.name
        )
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api: DEFAULT_GITHUB_API.to_string(),
            raw: DEFAULT_GITHUB_RAW.to_string(),
            download: DEFAULT_GITHUB_DOWNLOAD.to_string(),
        }
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map_or_else(|| default.to_string(), |s| normalize_base(&s))
}

fn normalize_base(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}

/// Everything the module subsystem needs to know about its surroundings.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Local install locations.
    pub paths: CodegamePaths,
    /// Remote hosts.
    pub endpoints: Endpoints,
    /// Host platform, selecting archive format and executable suffix.
    pub platform: Platform,
    /// Shared HTTP client.
    pub client: reqwest::Client,
}

impl Environment {
    /// Builds the environment from process state (env vars, data dir, host).
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined, the
    /// platform is unsupported, or the HTTP client cannot be created.
    pub fn detect() -> Result<Self> {
        let paths = CodegamePaths::new()?;
        let platform = Platform::detect()?;
        Self::new(paths, Endpoints::from_env(), platform)
    }

    /// Builds an environment from explicit parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(paths: CodegamePaths, endpoints: Endpoints, platform: Platform) -> Result<Self> {
        let client = http_client()?;
        Ok(Self {
            paths,
            endpoints,
            platform,
            client,
        })
    }
}

/// Creates the HTTP client used for every request.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to create HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn repository_displays_owner_and_name() {
        let repo = Repository::codegame("codegame-cli-go");
        assert_eq!(repo.to_string(), "code-game-project/codegame-cli-go");
    }

    #[test]
    fn default_endpoints_point_at_github() {
        let endpoints = Endpoints::default();
        let repo = Repository::codegame("go-client");
        assert_eq!(
            endpoints.tags_url(&repo),
            "https://api.github.com/repos/code-game-project/go-client/tags"
        );
        assert_eq!(
            endpoints.manifest_url(&repo, "main"),
            "https://raw.githubusercontent.com/code-game-project/go-client/main/versions.json"
        );
        assert_eq!(
            endpoints.release_asset_url(&repo, "v0.9.1", "go-client-linux-amd64.tar.gz"),
            "https://github.com/code-game-project/go-client/releases/download/v0.9.1/go-client-linux-amd64.tar.gz"
        );
    }

    #[test]
    fn single_host_trims_trailing_slash() {
        let endpoints = Endpoints::single_host("http://127.0.0.1:1234/");
        assert_eq!(endpoints.api, "http://127.0.0.1:1234");
        assert_eq!(endpoints.raw, "http://127.0.0.1:1234");
        assert_eq!(endpoints.download, "http://127.0.0.1:1234");
    }

    #[test]
    #[serial_test::serial]
    fn from_env_uses_overrides() {
        // SAFETY: serialised test; variables are removed again below.
        unsafe {
            env::set_var(GITHUB_API_ENV, " http://mirror.local/api/ ");
            env::set_var(GITHUB_RAW_ENV, "   ");
            env::remove_var(GITHUB_DOWNLOAD_ENV);
        }
        let endpoints = Endpoints::from_env();
        // SAFETY: Cleanup - restoring previous state
        unsafe {
            env::remove_var(GITHUB_API_ENV);
            env::remove_var(GITHUB_RAW_ENV);
        }

        assert_eq!(endpoints.api, "http://mirror.local/api");
        assert_eq!(endpoints.raw, DEFAULT_GITHUB_RAW);
        assert_eq!(endpoints.download, DEFAULT_GITHUB_DOWNLOAD);
    }
}
