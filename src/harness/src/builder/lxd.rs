use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

use crate::commands::CommandResult;
use crate::models::config::Config;

/// Narrow seam over the container hypervisor so the orchestration can run
/// against a fake in tests. `LxdBackend` is the only production
/// implementation.
#[async_trait]
pub trait ContainerBackend: Send + Sync {
    async fn launch(&self, name: &str, release: &str) -> Result<()>;
    async fn snapshot(&self, name: &str, snapshot: &str) -> Result<()>;
    async fn restore(&self, name: &str, snapshot: &str) -> Result<()>;
    /// Runs a command inside the container, returning its captured output
    /// even when it exits non-zero. Errors only when the hypervisor CLI
    /// itself cannot be invoked.
    async fn exec(&self, name: &str, command: &[&str]) -> Result<CommandResult>;
    async fn delete(&self, name: &str) -> Result<()>;
    async fn list(&self) -> Result<Vec<String>>;
}

pub struct LxdBackend {
    image_remote: String,
}

impl LxdBackend {
    pub fn from_config(config: &Config) -> LxdBackend {
        LxdBackend {
            image_remote: config.image_remote.clone(),
        }
    }

    async fn lxc(&self, args: &[&str]) -> Result<CommandResult> {
        debug!("lxc {}", args.join(" "));
        let output = Command::new("lxc")
            .args(args)
            .output()
            .await
            .context("Failed to execute 'lxc'. Is the LXD client installed?")?;

        Ok(CommandResult::from_output(output))
    }

    async fn lxc_checked(&self, args: &[&str]) -> Result<()> {
        let result = self.lxc(args).await?;
        if !result.success() {
            bail!(
                "lxc {} failed with code {}: {}",
                args.first().unwrap_or(&""),
                result.exit_code(),
                result.stderr_lossy().trim()
            );
        }
        Ok(())
    }
}

#[async_trait]
impl ContainerBackend for LxdBackend {
    async fn launch(&self, name: &str, release: &str) -> Result<()> {
        let image = format!("{}:{}", self.image_remote, release);
        self.lxc_checked(&["launch", image.as_str(), name]).await
    }

    async fn snapshot(&self, name: &str, snapshot: &str) -> Result<()> {
        self.lxc_checked(&["snapshot", name, snapshot]).await
    }

    async fn restore(&self, name: &str, snapshot: &str) -> Result<()> {
        self.lxc_checked(&["restore", name, snapshot]).await
    }

    async fn exec(&self, name: &str, command: &[&str]) -> Result<CommandResult> {
        let mut args = vec!["exec", name, "--env", "DEBIAN_FRONTEND=noninteractive", "--"];
        args.extend_from_slice(command);
        self.lxc(&args).await
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.lxc_checked(&["delete", "--force", name]).await
    }

    async fn list(&self) -> Result<Vec<String>> {
        let result = self.lxc(&["list", "--format", "csv", "-c", "n"]).await?;
        if !result.success() {
            bail!(
                "lxc list failed with code {}: {}",
                result.exit_code(),
                result.stderr_lossy().trim()
            );
        }

        Ok(result
            .stdout_lossy()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use crate::builder::lxd::{ContainerBackend, LxdBackend};

    #[tokio::test]
    #[serial]
    #[ignore] // Needs a running LXD daemon.
    async fn list_queries_lxd() {
        let backend = LxdBackend {
            image_remote: "ubuntu-daily".to_string(),
        };

        backend.list().await.unwrap();
    }
}
