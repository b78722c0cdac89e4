use crate::error::Error;
use crate::model::SyncMode;
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::env;
use std::path::Path;

pub const PASSWORD_ENV_VAR: &str = "VB365_PASSWORD";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub username: String,
    pub vb365_address: String,
    #[serde(default = "default_port")]
    pub vb365_port: u16,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default)]
    pub sync_mode: SyncMode,
    #[serde(default = "default_remove_unavailable")]
    pub remove_unavailable: bool,
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: String,
}

fn default_port() -> u16 {
    4443
}

fn default_api_version() -> String {
    "v7".to_string()
}

fn default_remove_unavailable() -> bool {
    true
}

fn default_snapshot_dir() -> String {
    "snapshots".to_string()
}

/// Load `config.{json,toml,yaml}` from the working directory, overlaid by `VB365_*` variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("config").required(false))
        .add_source(Environment::with_prefix("VB365").try_parsing(true))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

pub fn load_configuration_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::from(path).required(true))
        .add_source(Environment::with_prefix("VB365").try_parsing(true))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.username.trim().is_empty() {
            return Err(Error::InvalidConfig("username is empty".to_string()));
        }
        if self.vb365_address.trim().is_empty() {
            return Err(Error::InvalidConfig("vb365_address is empty".to_string()));
        }
        if self.vb365_address.contains("://") || self.vb365_address.contains('/') {
            return Err(Error::InvalidConfig(format!(
                "vb365_address must be a bare host name, got '{}'",
                self.vb365_address
            )));
        }
        if self.api_version.trim().is_empty() {
            return Err(Error::InvalidConfig("api_version is empty".to_string()));
        }
        Ok(())
    }

    /// Root URL of the REST API, e.g. `https://vb365.local:4443/v7`.
    pub fn base_url(&self) -> String {
        format!(
            "https://{}:{}/{}",
            self.vb365_address, self.vb365_port, self.api_version
        )
    }
}

/// Read the backend password; it is never part of the config file.
pub fn password_from_env() -> Result<String, Error> {
    match env::var(PASSWORD_ENV_VAR) {
        Ok(password) if !password.is_empty() => Ok(password),
        _ => Err(Error::MissingPassword),
    }
}
