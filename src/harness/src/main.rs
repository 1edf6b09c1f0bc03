mod builder;
mod commands;
mod logs;
mod models;

use std::fs::File;

use anyhow::{anyhow, bail, Result};
use log::{debug, error, info, warn};
use simplelog::{ColorChoice, CombinedLogger, Config as SimpleLogConfig, TerminalMode, TermLogger, WriteLogger};

use crate::builder::lxd::LxdBackend;
use crate::builder::{summarize, Builder};
use crate::commands::distro_info;
use crate::models::config::Config;
use crate::models::RunContext;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new().await?;

    CombinedLogger::init(
        vec![
            TermLogger::new(config.log_level, SimpleLogConfig::default(), TerminalMode::Mixed, ColorChoice::Auto),
            WriteLogger::new(config.log_level, SimpleLogConfig::default(), File::create(&config.log_path)?),
        ]
    ).unwrap();

    debug!("Loaded config {:#?}", config);

    info!("Starting archive-rebuild with version {}", env!("CARGO_PKG_VERSION"));

    let supported = distro_info::supported_releases().await?;
    if !supported.iter().any(|release| release == &config.release) {
        bail!(
            "'{}' is not a supported release (supported: {})",
            config.release,
            supported.join(", ")
        );
    }

    let context = RunContext::new(&config);
    let backend = LxdBackend::from_config(&config);
    let builder = Builder::new(&config, &backend);

    info!(
        "Run {}: rebuilding {} package(s) for {} in container {}",
        context.timestamp,
        config.packages.len(),
        context.release,
        context.container_name
    );

    let run_result = tokio::select! {
        res = builder.run(&context) => res,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, aborting run");
            Err(anyhow!("run interrupted"))
        }
    };

    // The container is removed on every exit path; partial artifacts stay on
    // disk for inspection.
    if let Err(e) = builder.teardown(&context).await {
        error!("Failed to tear down container {}: {:?}", context.container_name, e);
    }

    let reports = run_result?;
    for report in reports.iter() {
        match report.elapsed_seconds {
            Some(seconds) => info!("{}: {} ({}s)", report.package, report.outcome.describe(), seconds),
            None => info!("{}: {}", report.package, report.outcome.describe()),
        }
    }

    let (built, failed, unavailable) = summarize(&reports);
    info!(
        "Run complete: {} built, {} failed, {} source unavailable",
        built, failed, unavailable
    );
    info!("Build artifacts in {:?}", context.log_dir);

    Ok(())
}
