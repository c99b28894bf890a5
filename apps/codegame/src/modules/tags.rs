//! Release tag lookup through the GitHub tags API.
//!
//! Tags are listed newest first by the API. A request for version `0.6`
//! therefore selects the most recent `v0.6.x` tag.

use anyhow::Result;
use serde::Deserialize;

use super::environment::{Endpoints, Environment, Repository};
use crate::errors::CodegameError;

/// A git tag of a published release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseTag {
    /// Tag name, conventionally `v<version>`.
    pub name: String,
}

impl ReleaseTag {
    /// The tag name without its leading `v`.
    #[must_use]
    pub fn version(&self) -> &str {
        self.name.strip_prefix('v').unwrap_or(&self.name)
    }
}

/// Finds release tags of repositories.
#[derive(Debug, Clone)]
pub struct TagLocator {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl TagLocator {
    /// Creates a locator using the environment's client and endpoints.
    #[must_use]
    pub fn new(env: &Environment) -> Self {
        Self {
            client: env.client.clone(),
            endpoints: env.endpoints.clone(),
        }
    }

    /// Returns the first tag whose name starts with `v<version>`.
    ///
    /// `version` is a prefix: `0.6` selects the newest `v0.6.x` tag.
    ///
    /// # Errors
    ///
    /// Returns [`CodegameError::RepositoryUnreachable`] or
    /// [`CodegameError::TagDecodeError`] if the listing cannot be fetched,
    /// and [`CodegameError::TagNotFound`] if no tag matches.
    pub async fn resolve_tag(&self, repository: &Repository, version: &str) -> Result<ReleaseTag> {
        let prefix = format!("v{version}");
        let tags = self.list_tags(repository).await?;

        let tag = tags
            .into_iter()
            .find(|tag| tag.name.starts_with(&prefix))
            .ok_or_else(|| CodegameError::tag_not_found(repository.to_string(), version))?;

        tracing::debug!(repository = %repository, tag = %tag.name, "resolved tag");
        Ok(tag)
    }

    /// Returns the newest tag of `repository`.
    ///
    /// # Errors
    ///
    /// Returns [`CodegameError::EmptyTagList`] if the repository has no tags,
    /// or the listing errors of [`TagLocator::resolve_tag`].
    pub async fn latest_tag(&self, repository: &Repository) -> Result<ReleaseTag> {
        let tag = self
            .list_tags(repository)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CodegameError::EmptyTagList {
                repository: repository.to_string(),
            })?;

        tracing::debug!(repository = %repository, tag = %tag.name, "latest tag");
        Ok(tag)
    }

    async fn list_tags(&self, repository: &Repository) -> Result<Vec<ReleaseTag>> {
        let url = self.endpoints.tags_url(repository);
        let unreachable =
            |message: String| CodegameError::repository_unreachable(repository.to_string(), message);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unreachable(format!("HTTP {status}")).into());
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !content_type.starts_with("application/json") {
            return Err(unreachable(format!("unexpected content type '{content_type}'")).into());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| unreachable(e.to_string()))?;

        let tags = serde_json::from_slice(&body)
            .map_err(|e| CodegameError::tag_decode_error(repository.to_string(), e.to_string()))?;
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::paths::CodegamePaths;
    use crate::modules::platform::Platform;

    const TAGS_PATH: &str = "/repos/code-game-project/codegame-cli-go/tags";

    fn locator(server: &mockito::Server) -> TagLocator {
        let env = Environment::new(
            CodegamePaths::with_root(std::env::temp_dir().join("codegame_tags_test")),
            Endpoints::single_host(&server.url()),
            Platform::detect().unwrap(),
        )
        .unwrap();
        TagLocator::new(&env)
    }

    fn repo() -> Repository {
        Repository::codegame("codegame-cli-go")
    }

    async fn serve_tags(server: &mut mockito::Server, body: &str) -> mockito::Mock {
        server
            .mock("GET", TAGS_PATH)
            .with_status(200)
            .with_header("content-type", "application/json; charset=utf-8")
            .with_body(body)
            .create_async()
            .await
    }

    #[test]
    fn release_tag_version_strips_v() {
        let tag = ReleaseTag {
            name: "v0.6.2".to_string(),
        };
        assert_eq!(tag.version(), "0.6.2");

        let bare = ReleaseTag {
            name: "0.6.2".to_string(),
        };
        assert_eq!(bare.version(), "0.6.2");
    }

    #[tokio::test]
    async fn resolve_tag_returns_first_match_in_listed_order() {
        let mut server = mockito::Server::new_async().await;
        serve_tags(
            &mut server,
            r#"[{"name":"v0.7.0"},{"name":"v0.6.3"},{"name":"v0.6.2"},{"name":"v0.5.9"}]"#,
        )
        .await;

        let tag = locator(&server).resolve_tag(&repo(), "0.6").await.unwrap();
        assert_eq!(tag.name, "v0.6.3");
    }

    #[tokio::test]
    async fn resolve_tag_without_match_is_tag_not_found() {
        let mut server = mockito::Server::new_async().await;
        serve_tags(&mut server, r#"[{"name":"v0.7.0"}]"#).await;

        let err = locator(&server)
            .resolve_tag(&repo(), "0.6")
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodegameError>(),
            Some(CodegameError::TagNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn latest_tag_is_first_element() {
        let mut server = mockito::Server::new_async().await;
        serve_tags(&mut server, r#"[{"name":"v1.2.0"},{"name":"v1.1.0"}]"#).await;

        let tag = locator(&server).latest_tag(&repo()).await.unwrap();
        assert_eq!(tag.version(), "1.2.0");
    }

    #[tokio::test]
    async fn latest_tag_of_empty_listing_is_empty_tag_list() {
        let mut server = mockito::Server::new_async().await;
        serve_tags(&mut server, "[]").await;

        let err = locator(&server).latest_tag(&repo()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodegameError>(),
            Some(CodegameError::EmptyTagList { .. })
        ));
    }

    #[tokio::test]
    async fn error_status_is_repository_unreachable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", TAGS_PATH)
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"API rate limit exceeded"}"#)
            .create_async()
            .await;

        let err = locator(&server).latest_tag(&repo()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodegameError>(),
            Some(CodegameError::RepositoryUnreachable { .. })
        ));
    }

    #[tokio::test]
    async fn non_json_content_type_is_repository_unreachable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", TAGS_PATH)
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html></html>")
            .create_async()
            .await;

        let err = locator(&server)
            .resolve_tag(&repo(), "0.6")
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodegameError>(),
            Some(CodegameError::RepositoryUnreachable { .. })
        ));
    }

    #[tokio::test]
    async fn wrong_shape_is_tag_decode_error() {
        let mut server = mockito::Server::new_async().await;
        serve_tags(&mut server, r#"{"tags":["v0.6.0"]}"#).await;

        let err = locator(&server)
            .resolve_tag(&repo(), "0.6")
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodegameError>(),
            Some(CodegameError::TagDecodeError { .. })
        ));
    }
}
