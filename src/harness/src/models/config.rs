use anyhow::{Context, Result};
use std::path::PathBuf;
use clap::builder::TypedValueParser;

use clap::Parser;
use log::LevelFilter;
use serde::Deserialize;

#[derive(Deserialize, Parser, Debug, Default)]
#[clap(author, version, about, long_about = None)]
pub struct SharedConfig {
    /// Release to rebuild against, e.g. 'bionic'. Must be a currently supported release.
    #[clap(value_name = "RELEASE")]
    #[serde(skip)]
    pub release: String,
    /// Source packages to rebuild, attempted in the given order
    #[clap(value_name = "SRC_PACKAGE", required = true, num_args = 1..)]
    #[serde(skip)]
    pub packages: Vec<String>,

    /// Path of the harness configuration file. Default: './config_rebuild.json'
    #[clap(short, long)]
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Log level. Default: 'info'
    #[arg(
        long,
        value_parser = clap::builder::PossibleValuesParser::new(["off", "error", "warn", "info", "debug", "trace"])
        .map(|s| s.parse::<log::LevelFilter>().unwrap()),
    )]
    pub log_level: Option<LevelFilter>,
    /// Log file output for the harness. Default: './archive-rebuild.log'
    #[clap(long, value_hint = clap::ValueHint::DirPath)]
    pub log_path: Option<PathBuf>,

    /// Path to the directory where per-run build logs will be stored. Default: './logs'
    #[clap(short = 'l', long, value_hint = clap::ValueHint::DirPath)]
    pub build_logs_path: Option<PathBuf>,

    /// Image remote to launch containers from. Default: 'ubuntu-daily'
    #[clap(long)]
    pub image_remote: Option<String>,
    /// Prefix for the run's container name. Default: 'rebuild'
    #[clap(long)]
    pub container_prefix: Option<String>,

    /// Wall-clock timeout for one package build, in seconds. Default: 900
    #[clap(short = 't', long)]
    pub build_timeout: Option<u64>,
    /// How many times to probe for network reachability in the container. Default: 60
    #[clap(long)]
    pub network_attempts: Option<u32>,
    /// Seconds to sleep between network probes. Default: 2
    #[clap(long)]
    pub network_interval: Option<u64>,
    /// Host pinged from inside the container to verify network. Default: 'archive.ubuntu.com'
    #[clap(long)]
    pub network_probe_host: Option<String>,
}

impl SharedConfig {
    pub async fn try_from_file(path: &PathBuf) -> Result<SharedConfig>
    {
        let file = tokio::fs::read_to_string(path).await?;
        let config: SharedConfig = serde_json::from_str(file.as_str())?;
        Ok(config)
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub release: String,
    pub packages: Vec<String>,

    pub log_level: LevelFilter,
    pub log_path: PathBuf,

    pub build_logs_path: PathBuf,

    pub image_remote: String,
    pub container_prefix: String,

    pub build_timeout: u64,
    pub network_attempts: u32,
    pub network_interval: u64,
    pub network_probe_host: String,
}

impl Config {
    pub async fn new() -> Result<Config> {
        let cli_config = SharedConfig::parse();

        let file_config = match cli_config.config_path.clone() {
            Some(path) => SharedConfig::try_from_file(&path).await
                .with_context(|| format!("Failed to read config from file {:?}", path))?,
            None => {
                let default_path = PathBuf::from("./config_rebuild.json");
                if default_path.exists() {
                    SharedConfig::try_from_file(&default_path).await
                        .with_context(|| format!("Failed to read config from file {:?}", default_path))?
                } else {
                    SharedConfig::default()
                }
            }
        };

        Ok(Config::resolve(cli_config, file_config))
    }

    fn resolve(cli_config: SharedConfig, file_config: SharedConfig) -> Config {
        Config {
            release: cli_config.release,
            packages: cli_config.packages,

            log_level: cli_config.log_level.unwrap_or(file_config.log_level.unwrap_or(LevelFilter::Info)),
            log_path: cli_config.log_path.unwrap_or(file_config.log_path.unwrap_or(PathBuf::from("./archive-rebuild.log"))),

            build_logs_path: cli_config.build_logs_path.unwrap_or(file_config.build_logs_path.unwrap_or(PathBuf::from("./logs"))),

            image_remote: cli_config.image_remote.unwrap_or(file_config.image_remote.unwrap_or("ubuntu-daily".to_string())),
            container_prefix: cli_config.container_prefix.unwrap_or(file_config.container_prefix.unwrap_or("rebuild".to_string())),

            build_timeout: cli_config.build_timeout.unwrap_or(file_config.build_timeout.unwrap_or(900)),
            network_attempts: cli_config.network_attempts.unwrap_or(file_config.network_attempts.unwrap_or(60)),
            network_interval: cli_config.network_interval.unwrap_or(file_config.network_interval.unwrap_or(2)),
            network_probe_host: cli_config.network_probe_host.unwrap_or(file_config.network_probe_host.unwrap_or("archive.ubuntu.com".to_string())),
        }
    }
}
