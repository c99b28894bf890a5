//! Version command for the codegame CLI.
//!
//! Displays the CLI version together with the commit it was built from and
//! the platform used for module downloads.

use anyhow::Result;

use crate::modules::platform::Platform;

/// Executes the version command.
#[allow(clippy::unnecessary_wraps)]
pub fn execute() -> Result<()> {
    println!("codegame {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build Information:");
    println!("  Version:  {}", env!("CARGO_PKG_VERSION"));
    println!("  Commit:   {}", git_commit());
    println!("  Platform: {}", platform_string());
    Ok(())
}

/// Returns the git commit hash from environment or a fallback.
fn git_commit() -> &'static str {
    option_env!("CODEGAME_GIT_COMMIT").unwrap_or("unknown")
}

/// Returns the module platform, or the raw target for unsupported hosts.
fn platform_string() -> String {
    Platform::detect().map_or_else(
        |_| format!("{}-{} (unsupported)", std::env::consts::OS, std::env::consts::ARCH),
        |platform| platform.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_succeeds() {
        assert!(execute().is_ok());
    }

    #[test]
    fn platform_string_is_not_empty() {
        let platform = platform_string();
        assert!(!platform.is_empty());
        assert!(platform.contains('-'));
    }

    #[test]
    fn git_commit_returns_value() {
        assert!(!git_commit().is_empty());
    }
}
