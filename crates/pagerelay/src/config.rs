//! Configuration file
//!
//! The configuration is a JSON file in the same layout PagerMon
//! clients have always used:
//!
//! ```json
//! {
//!   "hostname": "http://localhost:3000",
//!   "apikey": "",
//!   "identifier": "",
//!   "sendFunctionCode": false,
//!   "useTimestamp": true,
//!   "requestTimeout": 30,
//!   "EAS": {
//!     "excludeEvents": [],
//!     "includeFIPS": [],
//!     "addressAddType": true
//!   }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use log::info;
use pagerdec::{DecodeOptions, EasOptions, TimeBase};
use serde::{Deserialize, Serialize};

/// Relay configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the PagerMon server
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// API key sent with every request
    #[serde(default)]
    pub apikey: String,

    /// Source identifier sent with every message
    #[serde(default)]
    pub identifier: String,

    /// Append the POCSAG function code to addresses
    #[serde(default)]
    pub send_function_code: bool,

    /// Use timestamps embedded in message text
    #[serde(default = "default_true")]
    pub use_timestamp: bool,

    /// Per-request timeout, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// SAME/EAS settings
    #[serde(rename = "EAS", default)]
    pub eas: EasConfig,
}

/// SAME/EAS settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EasConfig {
    /// Event codes to ignore
    #[serde(default)]
    pub exclude_events: Vec<String>,

    /// Location codes to accept; empty accepts all
    #[serde(rename = "includeFIPS", default)]
    pub include_fips: Vec<String>,

    /// Append the alert type to the address
    #[serde(default = "default_true")]
    pub address_add_type: bool,
}

/// Result of loading the configuration file
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigFile {
    /// An existing file was read
    Loaded(Config),

    /// No file existed, so one was created with defaults
    Created(PathBuf),
}

impl Config {
    /// Load the configuration at `path`, creating it if missing
    pub fn load_or_create(path: &Path) -> anyhow::Result<ConfigFile> {
        if !path.exists() {
            Config::default().write(path)?;
            info!("created configuration file \"{}\"", path.display());
            return Ok(ConfigFile::Created(path.to_owned()));
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("Unable to read --config \"{}\"", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("Invalid --config \"{}\"", path.display()))?;
        config.validate()?;
        Ok(ConfigFile::Loaded(config))
    }

    /// Write this configuration to `path` as pretty JSON
    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Unable to create directory \"{}\"", dir.display()))?;
        }

        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text + "\n")
            .with_context(|| format!("Unable to write --config \"{}\"", path.display()))
    }

    /// Check for settings which cannot work
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.hostname.trim().is_empty() {
            return Err(anyhow!("configuration \"hostname\" must not be empty"));
        }
        Ok(())
    }

    /// Message submission URL
    ///
    /// One trailing slash on the `hostname` is dropped before
    /// the API path is appended.
    pub fn endpoint(&self) -> String {
        let base = self.hostname.strip_suffix('/').unwrap_or(&self.hostname);
        format!("{}{}", base, API_PATH)
    }

    /// Per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Decoder settings
    pub fn decode_options(&self, time_base: TimeBase) -> DecodeOptions {
        DecodeOptions {
            send_function_code: self.send_function_code,
            use_timestamp: self.use_timestamp,
            time_base,
            eas: EasOptions {
                exclude_events: self.eas.exclude_events.clone(),
                include_fips: self.eas.include_fips.clone(),
                address_add_type: self.eas.address_add_type,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            apikey: String::new(),
            identifier: String::new(),
            send_function_code: false,
            use_timestamp: true,
            request_timeout: default_request_timeout(),
            eas: EasConfig::default(),
        }
    }
}

impl Default for EasConfig {
    fn default() -> Self {
        Self {
            exclude_events: Vec::new(),
            include_fips: Vec::new(),
            address_add_type: true,
        }
    }
}

const API_PATH: &str = "/api/messages";

fn default_hostname() -> String {
    "http://localhost:3000".to_owned()
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30
}
