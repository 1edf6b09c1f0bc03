use anyhow::{bail, Context, Result};
use tokio::process::Command;

use crate::commands::CommandResult;

/// Queries the host's distro metadata for the currently supported releases.
pub async fn supported_releases() -> Result<Vec<String>> {
    let output = Command::new("ubuntu-distro-info")
        .arg("--supported")
        .output()
        .await
        .context("Failed to execute 'ubuntu-distro-info'. Is distro-info installed?")?;

    let result = CommandResult::from_output(output);
    if !result.success() {
        bail!(
            "ubuntu-distro-info --supported failed with code {}: {}",
            result.exit_code(),
            result.stderr_lossy().trim()
        );
    }

    Ok(parse_supported(result.stdout_lossy().as_str()))
}

fn parse_supported(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
