//! Crash reporting: format an error with its trace, wrap it in a JSON report
//! and post it once to a collection endpoint.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Write;
use tracing::{debug, warn};

use crate::config::Preferences;
use crate::constants::{DEFAULT_EXIT_CODE, WANT_REPORT_ERROR};
use crate::error::ReportError;
use crate::trace::{ErrorChain, Frame};
use crate::version::Version;

/// Body posted to the collection endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorReport<'a> {
    pub message: &'a str,
    #[serde(rename = "exit-code")]
    pub exit_code: &'a str,
    pub version: &'a str,
}

/// Renders the top-level message followed by the stack trace of every traced
/// link in the chain, innermost cause first.
pub fn format_error(err: Option<&dyn ErrorChain>) -> Result<String, ReportError> {
    let err = err.ok_or(ReportError::InvalidInput)?;

    let mut traces: Vec<Cow<'_, [Frame]>> = Vec::new();
    let mut link = Some(err);
    while let Some(current) = link {
        if let Some(frames) = current.stack_trace() {
            traces.push(frames);
        }
        link = current.wrapped_cause();
    }

    if traces.is_empty() {
        return Err(ReportError::NoStackTrace(err.message()));
    }

    let mut formatted = err.message();
    for frame in traces.iter().rev().flat_map(|frames| frames.iter()) {
        // writing into a String cannot fail
        let _ = write!(formatted, "\n\t{}", frame);
    }
    Ok(formatted)
}

pub fn marshall_error(
    message: &str,
    exit_code: &str,
    version: &str,
) -> Result<Vec<u8>, ReportError> {
    let report = ErrorReport {
        message,
        exit_code,
        version,
    };
    Ok(serde_json::to_vec(&report)?)
}

/// Posts `payload` to `url` exactly once. Blocks until the endpoint answered;
/// must not be called from within an async runtime.
pub fn upload_error(payload: &[u8], url: &str) -> Result<(), ReportError> {
    debug!("uploading error report ({} bytes) to {}", payload.len(), url);

    let response = Client::new()
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .body(payload.to_vec())
        .send()?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        let body = response
            .text()
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ReportError::RemoteRejection { status, body });
    }

    debug!("error report accepted with status {}", status);
    Ok(())
}

/// Formats, serializes and uploads `err`. Stops at the first failing stage;
/// nothing is sent unless formatting and serialization succeeded.
pub fn report_error(err: &dyn ErrorChain, url: &str) -> Result<(), ReportError> {
    let message = format_error(Some(err))?;
    let payload = marshall_error(&message, DEFAULT_EXIT_CODE, Version::current_str())?;
    upload_error(&payload, url)
}

/// Reports `err` if the user opted in. Failures are logged and swallowed so
/// that reporting never turns into a second failure. Returns whether the
/// report was delivered.
pub fn maybe_report_error(err: &dyn ErrorChain, prefs: &dyn Preferences, url: &str) -> bool {
    if !prefs.get(WANT_REPORT_ERROR) {
        debug!("error reporting disabled, not reporting: {}", err.message());
        return false;
    }

    match report_error(err, url) {
        Ok(()) => true,
        Err(e) => {
            warn!(kind = e.kind(), "failed to report error: {}", e);
            false
        }
    }
}
