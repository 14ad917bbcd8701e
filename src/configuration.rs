// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Configuration file handling.

use config::Config;
use log::{info, warn};
use serde_with::{DurationMilliSeconds, DurationSeconds, serde_as};
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Default configuration file.
pub const DEF_CONFIG_FILE: &str = "configuration.yaml";

/// Default REST API port of the OverSight app.
pub const DEF_DEVICE_PORT: u16 = 5001;

/// Environment variable prefix for configuration overrides.
///
/// Nested keys are separated with `__`, e.g. `OVERSIGHT_POLLING__UPDATE_INTERVAL_SEC=60`.
pub const ENV_PREFIX: &str = "OVERSIGHT";

const MAX_RETRIES: u8 = 5;

#[derive(Default, serde::Deserialize, serde::Serialize)]
pub struct Settings {
    pub client: ClientSettings,
    pub polling: PollingSettings,
    #[serde(default)]
    pub devices: Vec<DeviceSettings>,
}

/// Device endpoint descriptor.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DeviceSettings {
    pub host: String,
    #[serde(default = "default_device_port")]
    pub port: u16,
    /// Optional display name. The device name reported by the device is used if not set.
    #[serde(default)]
    pub name: Option<String>,
}

impl DeviceSettings {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            name: None,
        }
    }

    /// `host:port` identifier used in log messages and errors.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Display for DeviceSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} ({}:{})", self.host, self.port),
            None => write!(f, "{}:{}", self.host, self.port),
        }
    }
}

fn default_device_port() -> u16 {
    DEF_DEVICE_PORT
}

/// HTTP client settings, shared by all device clients.
#[serde_as]
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct ClientSettings {
    /// Max time for a single request attempt, including connection setup and reading the body.
    #[serde_as(as = "DurationSeconds")]
    #[serde(rename = "request_timeout_sec")]
    pub request_timeout: Duration,
    /// Number of retries after a transient transport failure. Total attempts = retries + 1.
    pub retries: u8,
    /// Pause between two attempts.
    #[serde_as(as = "DurationMilliSeconds")]
    #[serde(rename = "retry_interval_ms")]
    pub retry_interval: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            retries: 2,
            retry_interval: Duration::from_secs(1),
        }
    }
}

#[serde_as]
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct PollingSettings {
    /// Device state refresh interval.
    #[serde_as(as = "DurationSeconds")]
    #[serde(rename = "update_interval_sec")]
    pub update_interval: Duration,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_secs(30),
        }
    }
}

impl Display for PollingSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "update interval={:?}", self.update_interval)
    }
}

/// Load the configuration settings.
///
/// The application provides default values which can be overriden in the following order:
/// 1. Configuration settings in the yaml or json configuration file specified in `filename`
/// 2. Environment variables with prefix `OVERSIGHT_`
pub fn get_configuration(filename: Option<&str>) -> Result<Settings, config::ConfigError> {
    load_configuration(filename, env_source())
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn load_configuration(
    filename: Option<&str>,
    env: config::Environment,
) -> Result<Settings, config::ConfigError> {
    // default configuration
    let mut config = Config::builder().add_source(Config::try_from(&Settings::default())?);
    // read optional configuration file to override defaults
    if let Some(filename) = filename {
        info!("Loading configuration file: {filename}");
        config = config.add_source(config::File::with_name(filename));
    }

    let config = config.add_source(env).build()?;

    let settings: Settings = config.try_deserialize()?;

    check_cfg_values(settings)
}

fn check_cfg_values(mut settings: Settings) -> Result<Settings, config::ConfigError> {
    if settings.client.request_timeout.as_secs() < 1
        || settings.client.retries > MAX_RETRIES
        || settings.client.retry_interval.as_millis() < 100
    {
        warn!("Invalid client settings, using defaults.");
        settings.client = Default::default();
    }

    if settings.polling.update_interval.as_secs() < 5 {
        warn!("Invalid polling settings, using defaults.");
        settings.polling = Default::default();
    }

    for device in settings.devices.iter_mut() {
        device.host = device.host.trim().to_string();
        if device.host.is_empty() {
            return Err(config::ConfigError::Message(
                "invalid device: host must not be empty".into(),
            ));
        }
        if device.port == 0 {
            return Err(config::ConfigError::Message(format!(
                "invalid device {}: port must be in range 1-65535",
                device.host
            )));
        }
    }

    Ok(settings)
}
