//! Build script for the codegame CLI.
//!
//! Exposes the short commit hash as `CODEGAME_GIT_COMMIT` for `codegame version`.

use std::process::Command;

fn main() {
    let commit = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=CODEGAME_GIT_COMMIT={commit}");

    if let Some(workspace_root) = git(&["rev-parse", "--show-toplevel"]) {
        println!("cargo:rerun-if-changed={workspace_root}/.git/HEAD");
    }
}

/// Runs git and returns its trimmed stdout, if it succeeded with output.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!stdout.is_empty()).then_some(stdout)
}
