//! Local directory layout for installed modules and helper programs.
//!
//! The default root is `<data dir>/codegame` (`~/.local/share/codegame` on
//! Linux, `%APPDATA%\codegame` on Windows). It can be overridden by setting the
//! `CODEGAME_HOME` environment variable.
//!
//! ## Directory Structure
//!
//! ```text
//! <data dir>/codegame/                # Root directory (or CODEGAME_HOME)
//!   bin/
//!     codegame-cli/
//!       modules/
//!         go/
//!           codegame-go_0-6-2         # One file per major.minor
//!           codegame-go_0-7-0
//!         js/
//!           codegame-js_0-3-1
//!     cg-gen-events/
//!       cg-gen-events_0-4-0
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable to override the default data root directory.
pub const CODEGAME_HOME_ENV: &str = "CODEGAME_HOME";

/// Manages paths for installed executables.
///
/// Components receive this value explicitly; nothing reads the install
/// location from global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegamePaths {
    /// Root directory for all codegame data.
    pub root: PathBuf,
    /// Directory holding every installed executable.
    pub bin: PathBuf,
}

impl CodegamePaths {
    /// Creates a new `CodegamePaths` instance.
    ///
    /// The root directory is determined by:
    /// 1. The `CODEGAME_HOME` environment variable if set and non-empty
    /// 2. The platform data directory joined with `codegame`
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined.
    pub fn new() -> Result<Self> {
        let root = match std::env::var(CODEGAME_HOME_ENV) {
            Ok(home) if !home.trim().is_empty() => PathBuf::from(home.trim()),
            _ => dirs::data_dir()
                .context(
                    "Cannot determine data directory. Set CODEGAME_HOME environment variable.",
                )?
                .join("codegame"),
        };

        Ok(Self::with_root(root))
    }

    /// Creates a new `CodegamePaths` instance with a specific root directory.
    #[must_use = "returns new paths instance without side effects"]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            bin: root.join("bin"),
            root,
        }
    }

    /// Returns the install directory for the module of a language family.
    #[must_use = "returns the path without side effects"]
    pub fn modules_dir(&self, family: &str) -> PathBuf {
        self.bin.join("codegame-cli").join("modules").join(family)
    }

    /// Returns the install directory for `cg-gen-events`.
    #[must_use = "returns the path without side effects"]
    pub fn gen_events_dir(&self) -> PathBuf {
        self.bin.join("cg-gen-events")
    }

    /// Lists the file names installed in `dir`, sorted.
    ///
    /// A missing directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    pub fn installed_files(dir: &Path) -> Result<Vec<String>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| "Failed to read directory entry")?;
            let path = entry.path();
            if path.is_file()
                && let Some(name) = path.file_name().and_then(|n| n.to_str())
            {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}
