//! Installation hint for a missing `kubectl`.

use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::config::Preferences;
use crate::constants::{
    DOWNLOAD_MSG_ENV_VAR, KUBECTL_BINARY, KUBECTL_DOWNLOAD_BASE_URL, KUBECTL_VERSION,
    WANT_KUBECTL_DOWNLOAD_MSG,
};

#[derive(Error, Debug)]
#[error("{name} not found in search path: {reason}")]
pub struct LookupError {
    pub name: String,
    pub reason: String,
}

/// Resolves an executable name to its location.
pub trait PathLookup {
    fn look_path(&self, name: &str) -> Result<PathBuf, LookupError>;
}

/// Looks executables up in `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchPath;

impl PathLookup for SearchPath {
    fn look_path(&self, name: &str) -> Result<PathBuf, LookupError> {
        which::which(name).map_err(|e| LookupError {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}

impl<F> PathLookup for F
where
    F: Fn(&str) -> Result<PathBuf, LookupError>,
{
    fn look_path(&self, name: &str) -> Result<PathBuf, LookupError> {
        self(name)
    }
}

/// Writes an installation hint to `out` when `kubectl` is missing from the
/// search path and the user has not turned the hint off.
///
/// `platform` is an OS name as in `std::env::consts::OS`; on `windows` the
/// hint names `kubectl.exe`. Nothing here is an error: write failures are
/// logged and dropped.
pub fn maybe_print_kubectl_download_msg(
    platform: &str,
    out: &mut dyn Write,
    prefs: &dyn Preferences,
    lookup: &dyn PathLookup,
) {
    if !prefs.get(WANT_KUBECTL_DOWNLOAD_MSG) {
        return;
    }

    match lookup.look_path(KUBECTL_BINARY) {
        Ok(path) => debug!("found {} at {}", KUBECTL_BINARY, path.display()),
        Err(e) => {
            debug!("{}", e);
            let msg = kubectl_download_msg(platform, std::env::consts::ARCH);
            if let Err(e) = out.write_all(msg.as_bytes()) {
                debug!("failed to write kubectl download message: {}", e);
            }
        }
    }
}

fn kubectl_download_msg(platform: &str, arch: &str) -> String {
    let file_name = if platform == "windows" {
        format!("{}.exe", KUBECTL_BINARY)
    } else {
        KUBECTL_BINARY.to_string()
    };
    let os = match platform {
        "macos" => "darwin",
        other => other,
    };
    let arch = match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        other => other,
    };
    let url = format!(
        "{}/{}/bin/{}/{}/{}",
        KUBECTL_DOWNLOAD_BASE_URL, KUBECTL_VERSION, os, arch, file_name
    );

    let (install, disable) = if platform == "windows" {
        (
            format!(
                "curl.exe -Lo {file} {url}\n\
                 Then move {file} into a directory listed in your PATH.",
                file = file_name,
                url = url,
            ),
            format!(
                "$env:{var} = \"false\"      (PowerShell)\n\
                 set {var}=false             (cmd.exe)",
                var = DOWNLOAD_MSG_ENV_VAR,
            ),
        )
    } else {
        (
            format!(
                "curl -Lo {file} {url} && chmod +x {file} && sudo mv {file} /usr/local/bin/",
                file = file_name,
                url = url,
            ),
            format!("export {}=false", DOWNLOAD_MSG_ENV_VAR),
        )
    };

    format!(
        "========================================\n\
         {bin} could not be found on your path. {bin} is needed to talk to your cluster.\n\
         To install {bin}, run the following:\n\n\
         {install}\n\n\
         To disable this message, turn off the {key} preference:\n\n\
         {disable}\n\
         ========================================\n",
        bin = KUBECTL_BINARY,
        key = WANT_KUBECTL_DOWNLOAD_MSG,
    )
}
