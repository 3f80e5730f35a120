use std::env;
use std::path::PathBuf;

use crate::constants::{KUBECONFIG_DEFAULT_DIR, KUBECONFIG_DEFAULT_FILE, KUBECONFIG_ENV_VAR};

/// The active kube-config file: the first entry of `$KUBECONFIG`, or
/// `~/.kube/config` when the variable is unset or empty.
pub fn get_kube_config_path() -> PathBuf {
    env::var_os(KUBECONFIG_ENV_VAR)
        .and_then(|value| first_kube_config_path(&value))
        .unwrap_or_else(default_kube_config_path)
}

/// First entry of a path list, split on the platform delimiter (`:` on unix,
/// `;` on windows). `None` when that entry is empty.
pub fn first_kube_config_path(value: impl AsRef<std::ffi::OsStr>) -> Option<PathBuf> {
    env::split_paths(&value)
        .next()
        .filter(|path| !path.as_os_str().is_empty())
}

pub fn default_kube_config_path() -> PathBuf {
    let relative = PathBuf::from(KUBECONFIG_DEFAULT_DIR).join(KUBECONFIG_DEFAULT_FILE);
    match dirs::home_dir() {
        Some(home) => home.join(relative),
        None => relative,
    }
}
