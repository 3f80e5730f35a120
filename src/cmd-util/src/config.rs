use anyhow::{Context, Result};
use config::{Config as RConfig, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_ENV_PREFIX, CONFIG_FILE_ENV_VAR, CONFIG_FILE_NAME,
    DEFAULT_REPORT_ENDPOINT, WANT_KUBECTL_DOWNLOAD_MSG, WANT_REPORT_ERROR,
};

/// Read access to boolean user preferences.
pub trait Preferences {
    /// Value of the preference named `key`; unknown keys read as `false`.
    fn get(&self, key: &str) -> bool;
}

impl Preferences for HashMap<String, bool> {
    fn get(&self, key: &str) -> bool {
        HashMap::get(self, key).copied().unwrap_or(false)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub want_kubectl_download_msg: bool,
    pub want_report_error: bool,
    pub report_endpoint: String,
}

impl Preferences for Config {
    fn get(&self, key: &str) -> bool {
        match key {
            WANT_KUBECTL_DOWNLOAD_MSG => self.want_kubectl_download_msg,
            WANT_REPORT_ERROR => self.want_report_error,
            _ => false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            want_kubectl_download_msg: true,
            want_report_error: true,
            report_endpoint: DEFAULT_REPORT_ENDPOINT.to_string(),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// `$CMD_UTIL_CONFIG` if set, otherwise `<config dir>/cmd-util/config.toml`.
    pub fn config_file_path() -> Option<PathBuf> {
        match std::env::var_os(CONFIG_FILE_ENV_VAR) {
            Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)),
        }
    }

    pub fn load() -> Result<Config> {
        Self::load_from(Self::config_file_path().as_deref())
    }

    /// Defaults, then the (optional) TOML file at `path`, then `CMD_UTIL_*`
    /// environment variables.
    pub fn load_from(path: Option<&Path>) -> Result<Config> {
        let defaults = Config::default();
        let mut builder = RConfig::builder()
            .set_default("want_kubectl_download_msg", defaults.want_kubectl_download_msg)?
            .set_default("want_report_error", defaults.want_report_error)?
            .set_default("report_endpoint", defaults.report_endpoint)?;

        if let Some(path) = path {
            builder = builder.add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(Environment::with_prefix(CONFIG_ENV_PREFIX).try_parsing(true));

        let config: Config = builder
            .build()?
            .try_deserialize()
            .context("failed to parse config file")?;

        Ok(config)
    }
}
