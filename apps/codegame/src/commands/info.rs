//! Info command for the codegame CLI.
//!
//! Displays the metadata a game server publishes at `/info`.
//!
//! ```bash
//! codegame info games.example.com
//! ```

use anyhow::Result;
use clap::Args;

use crate::modules::environment::http_client;
use crate::server::{GameInfo, GameServer};

/// Width of the label column, including the colon.
const LABEL_WIDTH: usize = 17;

/// Arguments for the info command.
#[derive(Args)]
pub struct InfoArgs {
    /// URL of the game server.
    pub url: String,
}

/// Executes the info command.
///
/// # Errors
///
/// Returns an error if no game server answers at the URL.
pub async fn execute(args: &InfoArgs) -> Result<()> {
    let client = http_client()?;
    let server = GameServer::connect(&client, &args.url.to_lowercase()).await?;

    for line in info_lines(&server.info) {
        println!("{line}");
    }
    Ok(())
}

/// Formats the non-empty fields of `info`, one per line.
fn info_lines(info: &GameInfo) -> Vec<String> {
    let fields = [
        ("Display Name", info.display_name.as_deref()),
        ("Name", Some(info.name.as_str())),
        ("Description", info.description.as_deref()),
        ("Version", info.version.as_deref()),
        ("CodeGame Version", Some(info.cg_version.as_str())),
        ("Repository", info.repository_url.as_deref()),
    ];

    fields
        .into_iter()
        .filter_map(|(label, value)| {
            let value = value.filter(|v| !v.is_empty())?;
            Some(format!("{:<LABEL_WIDTH$} {value}", format!("{label}:")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(json: &str) -> GameInfo {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn prints_all_present_fields_aligned() {
        let lines = info_lines(&info(
            r#"{
                "name": "chess",
                "cg_version": "0.7",
                "display_name": "Chess",
                "description": "The classic.",
                "version": "1.2.0",
                "repository_url": "https://github.com/example/chess"
            }"#,
        ));

        assert_eq!(
            lines,
            vec![
                "Display Name:     Chess",
                "Name:             chess",
                "Description:      The classic.",
                "Version:          1.2.0",
                "CodeGame Version: 0.7",
                "Repository:       https://github.com/example/chess",
            ]
        );
    }

    #[test]
    fn skips_missing_and_empty_fields() {
        let lines = info_lines(&info(
            r#"{"name":"chess","cg_version":"0.7","description":""}"#,
        ));
        assert_eq!(lines, vec!["Name:             chess", "CodeGame Version: 0.7"]);
    }
}
