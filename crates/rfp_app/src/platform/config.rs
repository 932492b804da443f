use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use rfp_engine::{ClientSettings, EngineSettings};
use serde::{Deserialize, Serialize};

use super::cli::Cli;

pub const DEFAULT_CONFIG_FILE: &str = "./rfp.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogTarget {
    #[default]
    File,
    Terminal,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base: String,
    pub download_dir: PathBuf,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub log: LogTarget,
    pub log_file: PathBuf,
    pub auto_download: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".to_string(),
            download_dir: PathBuf::from("./downloads"),
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            log: LogTarget::File,
            log_file: PathBuf::from(rfp_logging::DEFAULT_LOG_FILE),
            auto_download: false,
        }
    }
}

impl AppConfig {
    /// Loads `path`. A missing file yields defaults unless the user named it
    /// explicitly.
    pub fn load(path: &Path, explicit: bool) -> anyhow::Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !explicit => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()));
            }
        };
        ron::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Config file named on the command line, or the default one. The flag
    /// tells whether the user named it.
    pub fn path_from_cli(cli: &Cli) -> (PathBuf, bool) {
        match &cli.config {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        }
    }

    /// Loads the config file chosen by `cli` and applies the command-line
    /// overrides.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let (path, explicit) = Self::path_from_cli(cli);
        let mut config = Self::load(&path, explicit)?;
        config.apply_overrides(cli);
        Ok(config)
    }

    fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(api_base) = &cli.api_base {
            self.api_base = api_base.clone();
        }
        if let Some(dir) = &cli.download_dir {
            self.download_dir = dir.clone();
        }
        if let Some(file) = &cli.log_file {
            self.log_file = file.clone();
        }
        if cli.download {
            self.auto_download = true;
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            client: ClientSettings {
                api_base: self.api_base.clone(),
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            },
            simulation_start_delay: rfp_core::SIMULATION_START_DELAY,
        }
    }
}
