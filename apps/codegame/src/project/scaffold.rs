//! Project directory creation.
//!
//! The CLI only creates the empty project directory; its contents come from
//! the language module invoked with `new client` or `new server`.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

/// Validates a project name for use as a directory name.
///
/// # Rules
///
/// - Must not be empty
/// - Must start with a letter or underscore
/// - Can only contain alphanumeric characters, underscores, and hyphens
///
/// # Errors
///
/// Returns an error with a descriptive message if the name is invalid.
pub fn validate_project_name(name: &str) -> Result<()> {
    let Some(first_char) = name.chars().next() else {
        bail!("Project name cannot be empty");
    };

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        bail!("Project name '{name}' must start with a letter or underscore");
    }

    for ch in name.chars() {
        if !ch.is_ascii_alphanumeric() && ch != '_' && ch != '-' {
            bail!(
                "Project name '{name}' contains invalid character '{ch}'. \
                 Only letters, numbers, underscores, and hyphens are allowed."
            );
        }
    }

    Ok(())
}

/// Creates the directory for project `name` below `parent`.
///
/// # Errors
///
/// Returns an error if the name is invalid, the directory already exists or
/// cannot be created.
pub fn create_project_dir(name: &str, parent: &Path) -> Result<PathBuf> {
    validate_project_name(name)?;

    let project_path = parent.join(name);
    if project_path.exists() {
        bail!(
            "Project '{}' already exists. Choose a different name or delete the existing directory.",
            project_path.display()
        );
    }

    std::fs::create_dir_all(&project_path).with_context(|| {
        format!(
            "Failed to create project directory: {}",
            project_path.display()
        )
    })?;

    Ok(project_path)
}
