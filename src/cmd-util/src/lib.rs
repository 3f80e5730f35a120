pub mod advisor;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod kubeconfig;
pub mod logging;
pub mod message;
pub mod report;
pub mod trace;
pub mod version;

pub use advisor::{maybe_print_kubectl_download_msg, PathLookup, SearchPath};
pub use config::{Config, ConfigLoader, Preferences};
pub use error::ReportError;
pub use kubeconfig::get_kube_config_path;
pub use report::{format_error, marshall_error, maybe_report_error, report_error, upload_error};
pub use trace::{ErrorChain, Frame, PlainError, TracedError, WrapErr};
pub use version::Version;
