use crate::bus::{EntryCountPolicy, DEVICES_DIR};
use anyhow::{Context, Result};
use config::{Config, File, FileFormat};
use indexmap::IndexMap;
use log::{debug, info, LevelFilter};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the location of `config.ini`.
pub const CONFIG_ENV: &str = "ONEWIRE_CONFIG";

fn default_devices_dir() -> String {
    DEVICES_DIR.to_string()
}

fn default_modules() -> String {
    "w1_gpio,w1_therm".to_string()
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    10
}

fn default_output() -> String {
    "log".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusConfig {
    #[serde(default = "default_devices_dir")]
    pub devices_dir: String,
    #[serde(default = "default_true")]
    pub activate: bool,
    #[serde(default = "default_modules")]
    pub modules: String,
    /// Reject listings of one entry or fewer before filtering the bus master.
    #[serde(default = "default_true")]
    pub strict_entry_count: bool,
}

impl BusConfig {
    pub fn module_list(&self) -> Vec<String> {
        self.modules
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn entry_count_policy(&self) -> EntryCountPolicy {
        if self.strict_entry_count {
            EntryCountPolicy::Strict
        } else {
            EntryCountPolicy::PostFilter
        }
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            devices_dir: default_devices_dir(),
            activate: true,
            modules: default_modules(),
            strict_entry_count: true,
        }
    }
}

/// How the daemon reports each reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// An `info!` line per device.
    Log,
    /// A JSON object per device on stdout.
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    /// Seconds between read passes.
    #[serde(default = "default_interval")]
    pub interval: u64,
    /// Number of read passes, 0 runs until interrupted.
    #[serde(default)]
    pub count: u64,
    #[serde(default = "default_output")]
    pub output: String,
}

impl PollingConfig {
    pub fn output_format(&self) -> OutputFormat {
        match self.output.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Log,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            count: 0,
            output: default_output(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub bus: BusConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Device name to display label, in reporting order.
    #[serde(default)]
    pub aliases: IndexMap<String, String>,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Self::from_file(Self::path())
    }

    /// `$ONEWIRE_CONFIG`, or `config.ini` in the working directory.
    pub fn path() -> PathBuf {
        env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("config.ini"))
    }

    pub fn get_log_level(&self) -> LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        }
    }

    pub fn label_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();
        debug!("Loading configuration from {}", config_path.display());

        let config = Config::builder()
            .add_source(File::from(config_path).format(FileFormat::Ini))
            .build()
            .context(format!("Failed to load config from {}", config_path.display()))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize config")?;

        Ok(app_config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_path = path.as_ref();

        let mut config_str = String::new();

        config_str.push_str(&format!(
            "[bus]\ndevices_dir = {}\nactivate = {}\nmodules = {}\nstrict_entry_count = {}\n\n",
            self.bus.devices_dir, self.bus.activate, self.bus.modules, self.bus.strict_entry_count
        ));

        config_str.push_str(&format!(
            "[polling]\ninterval = {}\ncount = {}\noutput = {}\n\n",
            self.polling.interval,
            self.polling.count,
            self.polling.output
        ));

        config_str.push_str(&format!("[logging]\nlevel = {}\n\n", self.logging.level));

        if !self.aliases.is_empty() {
            config_str.push_str("[aliases]\n");
            for (name, label) in &self.aliases {
                config_str.push_str(&format!("{} = {}\n", name, label));
            }
        }

        fs::write(config_path, config_str)
            .context(format!("Failed to save config to {}", config_path.display()))?;

        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }
}
