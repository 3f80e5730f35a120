use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::advisor::{maybe_print_kubectl_download_msg, SearchPath};
use crate::config::Config;
use crate::kubeconfig::get_kube_config_path;
use crate::report::report_error;
use crate::trace::{TracedError, WrapErr};
use crate::version::Version;
use crate::{success_message, warning_message};

fn about_message() -> String {
    format!(
        "Diagnostics helpers: crash reports, kubectl discovery and kube-config lookup\nVersion: {}",
        Version::current_str()
    )
}

#[derive(Parser, Clone, Debug)]
#[clap(name = "cmd-util", about = about_message(), version = Version::current_str())]
pub struct Cli {
    /// Path to a TOML config file, overrides $CMD_UTIL_CONFIG
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[clap(long, short, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Send an error report with the given message to the collection endpoint
    Report {
        message: String,

        /// Endpoint to post to instead of the configured one
        #[clap(long)]
        endpoint: Option<String>,
    },

    /// Print the active kube-config path
    Kubeconfig {
        /// Print the contents of the file instead of its path
        #[clap(long)]
        view: bool,
    },

    /// Print an installation hint if kubectl is not on the PATH
    CheckKubectl {
        /// Platform to produce the hint for
        #[clap(long, default_value = std::env::consts::OS)]
        platform: String,
    },

    /// Show the version
    Version,
}

/// Runs one command. An error returned here is a host failure: the caller
/// prints it, offers it to the reporter and exits non-zero.
pub fn process_command(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Report { message, endpoint } => {
            let endpoint = endpoint.unwrap_or_else(|| config.report_endpoint.clone());
            let err = TracedError::new(message);
            // a failed report is reported to the user, never escalated
            match report_error(&err, &endpoint) {
                Ok(()) => {
                    success_message!("Error report sent to {}", endpoint);
                }
                Err(e) => {
                    warning_message!("Unable to send error report: {}", e);
                }
            }
        }
        Command::Kubeconfig { view } => {
            print_kube_config(&get_kube_config_path(), view, &mut io::stdout())?;
        }
        Command::CheckKubectl { platform } => {
            maybe_print_kubectl_download_msg(&platform, &mut io::stdout(), config, &SearchPath);
        }
        Command::Version => {
            writeln!(io::stdout(), "{}", Version::long()).wrap_err("writing version")?;
        }
    }
    Ok(())
}

fn print_kube_config(path: &Path, view: bool, out: &mut dyn Write) -> Result<(), TracedError> {
    if !view {
        return writeln!(out, "{}", path.display()).wrap_err("writing kube-config path");
    }
    let contents = fs::read_to_string(path)
        .wrap_err(format!("reading kube-config {}", path.display()))?;
    out.write_all(contents.as_bytes()).wrap_err("writing kube-config")
}
