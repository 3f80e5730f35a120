// Preference keys understood by `config::Preferences`
pub const WANT_KUBECTL_DOWNLOAD_MSG: &str = "WantKubectlDownloadMsg";
pub const WANT_REPORT_ERROR: &str = "WantReportError";

pub const DEFAULT_REPORT_ENDPOINT: &str = "https://errors.cmd-util.dev/api/report";
pub const DEFAULT_EXIT_CODE: &str = "default";

pub const KUBECTL_BINARY: &str = "kubectl";
pub const KUBECTL_VERSION: &str = "v1.30.0";
pub const KUBECTL_DOWNLOAD_BASE_URL: &str = "https://dl.k8s.io/release";

pub const KUBECONFIG_ENV_VAR: &str = "KUBECONFIG";
pub const KUBECONFIG_DEFAULT_DIR: &str = ".kube";
pub const KUBECONFIG_DEFAULT_FILE: &str = "config";

pub const CONFIG_ENV_PREFIX: &str = "CMD_UTIL";
/// Environment override of the `WantKubectlDownloadMsg` preference.
pub const DOWNLOAD_MSG_ENV_VAR: &str = "CMD_UTIL_WANT_KUBECTL_DOWNLOAD_MSG";
pub const CONFIG_FILE_ENV_VAR: &str = "CMD_UTIL_CONFIG";
pub const CONFIG_DIR_NAME: &str = "cmd-util";
pub const CONFIG_FILE_NAME: &str = "config.toml";
