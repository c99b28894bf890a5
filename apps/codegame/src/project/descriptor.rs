//! The `.codegame.json` project descriptor.
//!
//! Every CodeGame project has a descriptor in its root directory:
//!
//! ```json
//! {
//!   "game": "tic-tac-toe",
//!   "type": "client",
//!   "lang": "go",
//!   "url": "games.example.com"
//! }
//! ```
//!
//! `lang_config` holds language-specific settings owned by the module; the CLI
//! preserves it without interpreting it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CodegameError;
use crate::modules::ProjectKind;

/// File name of the project descriptor.
pub const DESCRIPTOR_FILE: &str = ".codegame.json";

/// Contents of `.codegame.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeGameFile {
    /// Game name as reported by the server.
    pub game: String,
    /// Client or server.
    #[serde(rename = "type")]
    pub kind: ProjectKind,
    /// Project language.
    pub lang: String,
    /// Module-owned settings.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub lang_config: Map<String, Value>,
    /// Game server URL (clients only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CodeGameFile {
    /// Creates a descriptor without language settings.
    #[must_use]
    pub fn new(
        game: impl Into<String>,
        kind: ProjectKind,
        lang: impl Into<String>,
        url: Option<String>,
    ) -> Self {
        Self {
            game: game.into(),
            kind,
            lang: lang.into(),
            lang_config: Map::new(),
            url,
        }
    }

    /// Reads the descriptor in `project_root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(DESCRIPTOR_FILE);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Writes the descriptor into `project_root` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write(&self, project_root: &Path) -> Result<()> {
        let path = project_root.join(DESCRIPTOR_FILE);
        let mut content =
            serde_json::to_string_pretty(self).context("Failed to serialize .codegame.json")?;
        content.push('\n');
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Finds the closest directory at or above `start` containing a descriptor.
///
/// # Errors
///
/// Returns [`CodegameError::ProjectNotFound`] if no ancestor has one.
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(DESCRIPTOR_FILE).is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            CodegameError::ProjectNotFound {
                start: start.to_path_buf(),
            }
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialises_type_field_and_omits_empty_optionals() {
        let file = CodeGameFile::new("chess", ProjectKind::Server, "go", None);
        assert_eq!(
            serde_json::to_value(&file).unwrap(),
            json!({"game": "chess", "type": "server", "lang": "go"})
        );
    }

    #[test]
    fn write_then_load_keeps_lang_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut file = CodeGameFile::new(
            "tic-tac-toe",
            ProjectKind::Client,
            "ts",
            Some("games.example.com".to_string()),
        );
        file.lang_config
            .insert("runtime".to_string(), json!("bun"));

        file.write(temp_dir.path()).unwrap();
        let loaded = CodeGameFile::load(temp_dir.path()).unwrap();

        assert_eq!(loaded, file);
    }

    #[test]
    fn load_rejects_unknown_type() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join(DESCRIPTOR_FILE),
            r#"{"game":"chess","type":"library","lang":"go"}"#,
        )
        .unwrap();

        assert!(CodeGameFile::load(temp_dir.path()).is_err());
    }

    #[test]
    fn find_project_root_walks_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        CodeGameFile::new("chess", ProjectKind::Server, "go", None)
            .write(temp_dir.path())
            .unwrap();
        let nested = temp_dir.path().join("cmd").join("server");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested).unwrap(), temp_dir.path());
    }

    #[test]
    fn find_project_root_fails_outside_project() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = find_project_root(temp_dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodegameError>(),
            Some(CodegameError::ProjectNotFound { .. })
        ));
    }
}
