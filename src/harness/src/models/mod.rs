pub mod config;

use std::path::PathBuf;

use chrono::Local;
use common::models::BuildOutcome;

use crate::models::config::Config;

/// Identity of one rebuild run, derived once from the process start time and
/// passed explicitly to every operation that needs it.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub timestamp: String,
    pub release: String,
    pub container_name: String,
    pub log_dir: PathBuf,
}

impl RunContext {
    pub fn new(config: &Config) -> RunContext {
        let timestamp = Local::now().format("%Y%m%d-%H%M%S").to_string();

        RunContext {
            release: config.release.clone(),
            container_name: format!("{}-{}", config.container_prefix, timestamp),
            log_dir: config.build_logs_path.join(&timestamp),
            timestamp,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PackageReport {
    pub package: String,
    pub outcome: BuildOutcome,
    pub elapsed_seconds: Option<u64>,
}
