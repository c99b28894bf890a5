//! Game server discovery.
//!
//! Only two things are read from a game server: `/info` for the game name and
//! CodeGame protocol version, and `/events` for the CGE language version the
//! event definitions are written in.
//!
//! Users give a server as `host[:port][/path]`, optionally with a scheme. The
//! API may live at the root or below `/api`, with or without TLS, so
//! [`GameServer::connect`] tries the combinations in order.

use anyhow::{Result, bail};
use serde::Deserialize;

use crate::errors::CodegameError;

/// Metadata served at `/info`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameInfo {
    /// Machine name of the game.
    pub name: String,
    /// CodeGame protocol version.
    pub cg_version: String,
    /// Human readable name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
    /// Version of the game itself.
    #[serde(default)]
    pub version: Option<String>,
    /// Source repository.
    #[serde(default)]
    pub repository_url: Option<String>,
}

/// Strips the scheme and trailing slashes from a user-supplied server URL.
#[must_use]
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    let without_scheme = ["https://", "http://", "wss://", "ws://"]
        .iter()
        .find_map(|scheme| url.strip_prefix(scheme))
        .unwrap_or(url);
    without_scheme.trim_end_matches('/').to_string()
}

/// Base URLs tried for a normalised host, most preferred first.
fn candidate_bases(host: &str) -> [String; 4] {
    [
        format!("https://{host}/api"),
        format!("https://{host}"),
        format!("http://{host}/api"),
        format!("http://{host}"),
    ]
}

/// A reachable game server.
#[derive(Debug, Clone)]
pub struct GameServer {
    client: reqwest::Client,
    /// The normalised URL the user gave.
    pub url: String,
    /// Base URL of the API, with scheme.
    pub base_url: String,
    /// Contents of `/info`.
    pub info: GameInfo,
}

impl GameServer {
    /// Finds the API of the server at `url` and reads its `/info`.
    ///
    /// # Errors
    ///
    /// Returns [`CodegameError::GameServerUnreachable`] if no candidate base
    /// URL serves a valid `/info`.
    pub async fn connect(client: &reqwest::Client, url: &str) -> Result<Self> {
        let host = normalize_url(url);
        if host.is_empty() {
            return Err(CodegameError::invalid_arguments("game server URL is empty").into());
        }

        for base in candidate_bases(&host) {
            match fetch_info(client, &base).await {
                Ok(info) => {
                    tracing::debug!(%base, game = %info.name, "found game server");
                    return Ok(Self {
                        client: client.clone(),
                        url: host,
                        base_url: base,
                        info,
                    });
                }
                Err(e) => tracing::debug!(%base, error = %e, "no game server"),
            }
        }

        Err(CodegameError::game_server(format!("couldn't reach a CodeGame server at '{host}'")).into())
    }

    /// Reads the CGE version from the server's `/events` file.
    ///
    /// # Errors
    ///
    /// Returns [`CodegameError::GameServerUnreachable`] if the file cannot be
    /// fetched or has no `version` declaration.
    pub async fn cge_version(&self) -> Result<String> {
        let url = format!("{}/events", self.base_url);
        let unavailable = || CodegameError::game_server("couldn't access /events endpoint");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|_| unavailable())?;
        if !response.status().is_success() {
            return Err(unavailable().into());
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !content_type.starts_with("text/plain")
            && !content_type.starts_with("application/octet-stream")
        {
            return Err(unavailable().into());
        }

        let text = response.text().await.map_err(|_| unavailable())?;
        let version = parse_cge_version(&text)
            .ok_or_else(|| CodegameError::game_server("no version in /events file"))?;
        Ok(version)
    }
}

async fn fetch_info(client: &reqwest::Client, base: &str) -> Result<GameInfo> {
    let response = client
        .get(format!("{base}/info"))
        .send()
        .await?
        .error_for_status()?;
    let info: GameInfo = response.json().await?;
    if info.name.is_empty() || info.cg_version.is_empty() {
        bail!("{base}/info has no game name or CodeGame version");
    }
    Ok(info)
}

/// Extracts the `version` declaration from a CGE file.
///
/// Leading whitespace, `//` line comments and nested `/* */` block comments
/// are skipped; the word after the first `version` keyword is returned.
#[must_use]
pub fn parse_cge_version(source: &str) -> Option<String> {
    let body = skip_leading_comments(source);
    let mut words = body.split_whitespace();
    while let Some(word) = words.next() {
        if word == "version" {
            return words.next().map(str::to_string);
        }
    }
    None
}

fn skip_leading_comments(source: &str) -> &str {
    let mut rest = source;
    loop {
        rest = rest.trim_start();
        if let Some(line_comment) = rest.strip_prefix("//") {
            rest = line_comment
                .find('\n')
                .map_or("", |newline| &line_comment[newline + 1..]);
        } else if rest.starts_with("/*") {
            rest = skip_block_comment(rest);
        } else {
            return rest;
        }
    }
}

/// Skips one block comment starting at `source`, honouring nesting.
fn skip_block_comment(source: &str) -> &str {
    let mut depth = 0usize;
    let mut index = 0;
    let bytes = source.as_bytes();

    while index < bytes.len() {
        match (bytes[index], bytes.get(index + 1)) {
            (b'/', Some(b'*')) => {
                depth += 1;
                index += 2;
            }
            (b'*', Some(b'/')) => {
                depth -= 1;
                index += 2;
                if depth == 0 {
                    return &source[index..];
                }
            }
            _ => index += 1,
        }
    }

    ""
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::environment::http_client;

    #[test]
    fn normalize_url_strips_scheme_and_slash() {
        assert_eq!(normalize_url("https://games.example.com/"), "games.example.com");
        assert_eq!(normalize_url("wss://games.example.com"), "games.example.com");
        assert_eq!(normalize_url("ws://localhost:8080//"), "localhost:8080");
        assert_eq!(normalize_url("http://host/sub/"), "host/sub");
        assert_eq!(normalize_url("  plain.host  "), "plain.host");
    }

    #[test]
    fn candidates_prefer_tls_and_api() {
        let bases = candidate_bases("host");
        assert_eq!(bases[0], "https://host/api");
        assert_eq!(bases[3], "http://host");
    }

    #[test]
    fn parses_plain_version() {
        assert_eq!(
            parse_cge_version("name tic_tac_toe\nversion 0.4\n"),
            Some("0.4".to_string())
        );
    }

    #[test]
    fn skips_comments_before_declarations() {
        let source = "// header\n/* outer /* inner version 9.9 */ still comment */\n\
                      name game\nversion 0.3\n";
        assert_eq!(parse_cge_version(source), Some("0.3".to_string()));
    }

    #[test]
    fn missing_version_is_none() {
        assert_eq!(parse_cge_version("name game\n"), None);
        assert_eq!(parse_cge_version("version"), None);
        assert_eq!(parse_cge_version("/* unterminated version 1.0"), None);
    }

    #[test]
    fn game_info_requires_name_and_cg_version() {
        let info: GameInfo =
            serde_json::from_str(r#"{"name":"chess","cg_version":"0.7","version":"1.2"}"#)
                .unwrap();
        assert_eq!(info.name, "chess");
        assert_eq!(info.version.as_deref(), Some("1.2"));
        assert!(info.display_name.is_none());

        assert!(serde_json::from_str::<GameInfo>(r#"{"name":"chess"}"#).is_err());
    }

    #[tokio::test]
    async fn connect_falls_back_to_plain_http_root() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/info")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/info")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"tic-tac-toe","cg_version":"0.7"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/events")
            .with_status(200)
            .with_header("content-type", "text/plain; charset=utf-8")
            .with_body("name tic_tac_toe\nversion 0.4\n")
            .create_async()
            .await;

        let game = GameServer::connect(&http_client().unwrap(), &server.url())
            .await
            .unwrap();

        assert_eq!(game.base_url, server.url());
        assert_eq!(game.info.cg_version, "0.7");
        assert_eq!(game.cge_version().await.unwrap(), "0.4");
    }

    #[tokio::test]
    async fn connect_skips_info_without_name() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/info")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"","cg_version":"0.7"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/info")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"chess","cg_version":"0.7"}"#)
            .create_async()
            .await;

        let game = GameServer::connect(&http_client().unwrap(), &server.url())
            .await
            .unwrap();

        assert_eq!(game.base_url, server.url());
        assert_eq!(game.info.name, "chess");
    }

    #[tokio::test]
    async fn connect_rejects_info_without_cg_version() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Regex("info$".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"chess","cg_version":""}"#)
            .create_async()
            .await;

        let err = GameServer::connect(&http_client().unwrap(), &server.url())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodegameError>(),
            Some(CodegameError::GameServerUnreachable { .. })
        ));
    }

    #[tokio::test]
    async fn connect_reports_unreachable_server() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let err = GameServer::connect(&http_client().unwrap(), &server.url())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodegameError>(),
            Some(CodegameError::GameServerUnreachable { .. })
        ));
    }

    #[tokio::test]
    async fn events_with_wrong_content_type_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/info")
            .with_status(200)
            .with_body(r#"{"name":"chess","cg_version":"0.7"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/info")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/events")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html></html>")
            .create_async()
            .await;

        let game = GameServer::connect(&http_client().unwrap(), &server.url())
            .await
            .unwrap();
        assert!(game.cge_version().await.is_err());
    }
}
