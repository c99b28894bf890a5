//! Payloads passed to language modules through `CONFIG_FILE`.
//!
//! Field names are part of the module interface and must not change.

use serde::{Deserialize, Serialize};

/// Configuration for `new client`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClientData {
    /// Module language, e.g. `go`, `js` or `ts`.
    pub lang: String,
    /// Game name as reported by the server.
    pub name: String,
    /// Normalised game server URL.
    pub url: String,
    /// Client library version to depend on.
    pub library_version: String,
    /// Whether `cg-gen-events` wrappers are generated for the project.
    pub generate_wrappers: bool,
}

/// Configuration for `new server`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewServerData {
    /// Module language.
    pub lang: String,
    /// Server library version to depend on.
    pub library_version: String,
}

/// Configuration for `update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateData {
    /// Module language.
    pub lang: String,
    /// Library version to update to.
    pub library_version: String,
}

/// Configuration for `run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunData {
    /// Module language.
    pub lang: String,
    /// Game server URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Arguments forwarded to the program.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Configuration for `build`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildData {
    /// Module language.
    pub lang: String,
    /// Output file or directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}
