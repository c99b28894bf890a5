//! Error types for the codegame CLI.
//!
//! `CodegameError` consolidates every failure the module subsystem can report.
//! Each step of resolving, installing and launching a module has its own
//! variant so the CLI can tell the user which step failed. Commands wrap these
//! in `anyhow::Error` and `main` inspects them again to pick the exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Consolidated error type for codegame CLI operations.
#[derive(Debug, Error)]
pub enum CodegameError {
    /// A version string could not be parsed.
    #[error("malformed version: '{input}'")]
    MalformedVersion {
        /// The rejected input.
        input: String,
    },

    /// The compatibility manifest could not be fetched or decoded.
    #[error("versions manifest unavailable for {repository}: {message}")]
    ManifestUnavailable {
        /// Repository the manifest belongs to.
        repository: String,
        /// What went wrong.
        message: String,
    },

    /// The tag listing of a repository could not be retrieved.
    #[error("couldn't access git tags from '{repository}': {message}")]
    RepositoryUnreachable {
        /// Repository whose tags were requested.
        repository: String,
        /// What went wrong.
        message: String,
    },

    /// The tag listing was retrieved but is not a list of `{name}` records.
    ///
    /// Also known as a manifest decode error: the tag list is the release
    /// manifest of a repository. `versions.json` decode failures are
    /// [`CodegameError::ManifestUnavailable`] instead.
    #[doc(alias = "ManifestDecodeError")]
    #[error("couldn't decode git tag data from '{repository}': {message}")]
    TagDecodeError {
        /// Repository whose tags were requested.
        repository: String,
        /// Decoder message.
        message: String,
    },

    /// No published tag matches the requested version.
    #[error("no release of '{repository}' matches version {version}")]
    TagNotFound {
        /// Repository that was searched.
        repository: String,
        /// Requested version prefix.
        version: String,
    },

    /// The repository has no tags at all.
    #[error("'{repository}' has no published releases")]
    EmptyTagList {
        /// Repository that was searched.
        repository: String,
    },

    /// An archive download failed.
    #[error("download failed: {url}: {message}")]
    DownloadFailed {
        /// Requested URL.
        url: String,
        /// What went wrong.
        message: String,
    },

    /// A downloaded archive could not be read.
    #[error("failed to extract {archive}: {message}")]
    ExtractionFailed {
        /// Path of the archive on disk.
        archive: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The archive does not contain the expected executable.
    #[error("archive {archive} has no entry named '{entry}'")]
    EntryNotFound {
        /// Path of the archive on disk.
        archive: PathBuf,
        /// The entry that was looked for.
        entry: String,
    },

    /// An installed executable could not be started.
    #[error("failed to launch {path}: {message}")]
    SubprocessLaunchFailed {
        /// Executable path.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// Filesystem error with context.
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O operation that failed.
        message: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The host OS/architecture has no prebuilt modules.
    #[error("unsupported platform: {os} on {arch}")]
    UnsupportedPlatform {
        /// Host OS.
        os: String,
        /// Host architecture.
        arch: String,
    },

    /// A project kind other than `client` or `server`.
    #[error("invalid project type: {kind}")]
    InvalidProjectType {
        /// The rejected kind.
        kind: String,
    },

    /// No `.codegame.json` in the current directory or its parents.
    #[error("not in a CodeGame project directory (searched from {start})")]
    ProjectNotFound {
        /// Directory the search started in.
        start: PathBuf,
    },

    /// Invalid command line arguments.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        /// Description of what was invalid.
        message: String,
    },

    /// A game server could not be reached or returned unusable data.
    #[error("game server error: {message}")]
    GameServerUnreachable {
        /// What went wrong.
        message: String,
    },

    /// Subprocess exited with non-zero code.
    ///
    /// The exit code is propagated to the parent process without printing
    /// an additional error message.
    #[error("process exited with code {code}")]
    ProcessExitCode {
        /// The exit code from the subprocess.
        code: i32,
    },
}

impl CodegameError {
    /// Creates a new `MalformedVersion` error.
    #[must_use]
    pub fn malformed_version(input: impl Into<String>) -> Self {
        Self::MalformedVersion {
            input: input.into(),
        }
    }

    /// Creates a new `ManifestUnavailable` error.
    #[must_use]
    pub fn manifest_unavailable(repository: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ManifestUnavailable {
            repository: repository.into(),
            message: message.into(),
        }
    }

    /// Creates a new `RepositoryUnreachable` error.
    #[must_use]
    pub fn repository_unreachable(
        repository: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::RepositoryUnreachable {
            repository: repository.into(),
            message: message.into(),
        }
    }

    /// Creates a new `TagDecodeError`.
    #[must_use]
    pub fn tag_decode_error(repository: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TagDecodeError {
            repository: repository.into(),
            message: message.into(),
        }
    }

    /// Creates a new `TagNotFound` error.
    #[must_use]
    pub fn tag_not_found(repository: impl Into<String>, version: impl Into<String>) -> Self {
        Self::TagNotFound {
            repository: repository.into(),
            version: version.into(),
        }
    }

    /// Creates a new `DownloadFailed` error.
    #[must_use]
    pub fn download_failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DownloadFailed {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ExtractionFailed` error.
    #[must_use]
    pub fn extraction_failed(archive: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            archive: archive.into(),
            message: message.into(),
        }
    }

    /// Creates a new `IoError` from an I/O error with context.
    #[must_use]
    pub fn io_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Creates a new `InvalidArguments` error.
    #[must_use]
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }

    /// Creates a new `GameServerUnreachable` error.
    #[must_use]
    pub fn game_server(message: impl Into<String>) -> Self {
        Self::GameServerUnreachable {
            message: message.into(),
        }
    }

    /// Creates a new `ProcessExitCode` error.
    #[must_use]
    pub const fn process_exit_code(code: i32) -> Self {
        Self::ProcessExitCode { code }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_version_displays_input() {
        let err = CodegameError::malformed_version("1.x");
        assert_eq!(err.to_string(), "malformed version: '1.x'");
    }

    #[test]
    fn tag_not_found_names_repository_and_version() {
        let err = CodegameError::tag_not_found("code-game-project/go-client", "0.9");
        assert_eq!(
            err.to_string(),
            "no release of 'code-game-project/go-client' matches version 0.9"
        );
    }

    #[test]
    fn download_failed_includes_url() {
        let err = CodegameError::download_failed("https://example.com/a.tar.gz", "HTTP 404");
        assert_eq!(
            err.to_string(),
            "download failed: https://example.com/a.tar.gz: HTTP 404"
        );
    }

    #[test]
    fn entry_not_found_names_entry() {
        let err = CodegameError::EntryNotFound {
            archive: PathBuf::from("/tmp/a.tar.gz"),
            entry: "codegame-go".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "archive /tmp/a.tar.gz has no entry named 'codegame-go'"
        );
    }

    #[test]
    fn invalid_arguments_displays_message() {
        let err = CodegameError::invalid_arguments("missing required flag");
        assert_eq!(err.to_string(), "invalid arguments: missing required flag");
    }

    #[test]
    fn process_exit_code_displays_code() {
        let err = CodegameError::process_exit_code(42);
        assert_eq!(err.to_string(), "process exited with code 42");
    }
}
