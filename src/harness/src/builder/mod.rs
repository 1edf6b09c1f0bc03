pub mod lxd;

use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use log::{debug, info, warn};
use tokio::time::sleep;

use common::models::BuildOutcome;

use crate::builder::lxd::ContainerBackend;
use crate::commands::CommandResult;
use crate::logs::RunLogs;
use crate::models::config::Config;
use crate::models::{PackageReport, RunContext};

pub const BASE_SNAPSHOT: &str = "base";

const BUILD_TOOLING: &str = "build-essential ubuntu-dev-tools";

pub struct Builder<'a, B: ContainerBackend> {
    config: &'a Config,
    backend: &'a B,
}

impl<'a, B: ContainerBackend> Builder<'a, B> {
    pub fn new(config: &'a Config, backend: &'a B) -> Builder<'a, B> {
        Builder { config, backend }
    }

    /// Provisions the run's container, then attempts every requested package
    /// in order. Per-package failures are recorded as artifacts and do not
    /// stop the run; infrastructure failures abort it.
    pub async fn run(&self, context: &RunContext) -> Result<Vec<PackageReport>> {
        self.provision(context).await?;

        let logs = RunLogs::new(&context.log_dir);
        let mut reports = Vec::new();
        for package in self.config.packages.iter() {
            reports.push(self.attempt_package(context, &logs, package).await?);
        }

        Ok(reports)
    }

    async fn provision(&self, context: &RunContext) -> Result<()> {
        info!(
            "Launching container {} from {}:{}",
            context.container_name, self.config.image_remote, context.release
        );
        self.backend
            .launch(&context.container_name, &context.release)
            .await?;

        self.wait_for_network(context).await?;

        info!("Provisioning build tooling in {}", context.container_name);
        self.run_provision_step(context, "apt-get -y update").await?;
        self.run_provision_step(context, "apt-get -y dist-upgrade").await?;
        self.run_provision_step(context, &format!("apt-get -y install {}", BUILD_TOOLING))
            .await?;

        info!("Taking snapshot '{}'", BASE_SNAPSHOT);
        self.backend
            .snapshot(&context.container_name, BASE_SNAPSHOT)
            .await?;

        Ok(())
    }

    async fn run_provision_step(&self, context: &RunContext, command: &str) -> Result<()> {
        let result = self.sh(context, command).await?;
        if !result.success() {
            bail!(
                "'{}' failed in {} with code {}: {}",
                command,
                context.container_name,
                result.exit_code(),
                result.stderr_lossy().trim()
            );
        }
        Ok(())
    }

    async fn sh(&self, context: &RunContext, command: &str) -> Result<CommandResult> {
        self.backend
            .exec(&context.container_name, &["sh", "-c", command])
            .await
    }

    /// Polls for network reachability inside the container. This is the only
    /// retried operation in the harness; exhaustion aborts the run.
    async fn wait_for_network(&self, context: &RunContext) -> Result<()> {
        let probe_host = self.config.network_probe_host.as_str();
        for attempt in 1..=self.config.network_attempts {
            let result = self
                .backend
                .exec(
                    &context.container_name,
                    &["ping", "-c", "1", "-W", "1", probe_host],
                )
                .await?;
            if result.success() {
                debug!("Network reachable after {} probe(s)", attempt);
                return Ok(());
            }

            debug!(
                "Network probe {}/{} to {} failed",
                attempt, self.config.network_attempts, probe_host
            );
            if attempt < self.config.network_attempts {
                sleep(Duration::from_secs(self.config.network_interval)).await;
            }
        }

        bail!(
            "No network in container {} after {} attempts",
            context.container_name,
            self.config.network_attempts
        )
    }

    async fn attempt_package(
        &self,
        context: &RunContext,
        logs: &RunLogs,
        package: &str,
    ) -> Result<PackageReport> {
        info!("Rebuilding {} for {}", package, context.release);

        self.backend
            .restore(&context.container_name, BASE_SNAPSHOT)
            .await?;
        self.wait_for_network(context).await?;

        let fetch = self
            .sh(
                context,
                &format!("cd /root && pull-lp-source {} {}", package, context.release),
            )
            .await?;
        if !fetch.success() {
            warn!("Source for {} not found in {}", package, context.release);
            let outcome = BuildOutcome::SourceUnavailable;
            logs.write_result(package, outcome.result_code()).await?;
            return Ok(PackageReport {
                package: package.to_string(),
                outcome,
                elapsed_seconds: None,
            });
        }

        let chain = format!(
            "cd /root/{}-*/ && apt-get -y update && apt-get -y build-dep ./ && timeout {} dpkg-buildpackage -us -uc",
            package, self.config.build_timeout
        );
        let started = Instant::now();
        let result = self.sh(context, &chain).await?;
        let elapsed_seconds = started.elapsed().as_secs();

        logs.append_log(package, &result.stdout).await?;
        logs.append_log(package, &result.stderr).await?;

        let outcome = BuildOutcome::Completed(result.exit_code());
        logs.write_result(package, outcome.result_code()).await?;
        logs.write_time(package, elapsed_seconds).await?;

        info!("{}: {} in {}s", package, outcome.describe(), elapsed_seconds);

        Ok(PackageReport {
            package: package.to_string(),
            outcome,
            elapsed_seconds: Some(elapsed_seconds),
        })
    }

    /// Deletes the run's container if it still exists. Safe to call on any
    /// exit path; a teardown of an absent container does nothing.
    pub async fn teardown(&self, context: &RunContext) -> Result<()> {
        let instances = self.backend.list().await?;
        if instances.iter().any(|name| name == &context.container_name) {
            info!("Deleting container {}", context.container_name);
            self.backend.delete(&context.container_name).await?;
        } else {
            debug!(
                "Container {} already absent, nothing to delete",
                context.container_name
            );
        }
        Ok(())
    }
}

/// Counts of (built, failed, source unavailable) across a run's reports.
pub fn summarize(reports: &[PackageReport]) -> (usize, usize, usize) {
    let built = reports.iter().filter(|r| r.outcome.is_success()).count();
    let unavailable = reports
        .iter()
        .filter(|r| r.outcome == BuildOutcome::SourceUnavailable)
        .count();
    let failed = reports.len() - built - unavailable;

    (built, failed, unavailable)
}
