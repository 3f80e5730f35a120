//! Failures surfaced by the error reporting pipeline.
//!
//! Every stage returns its failure to the immediate caller; nothing here is
//! retried.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    /// There was no error value to report.
    #[error("no error to report")]
    InvalidInput,

    /// The error chain carries no stack trace, so it cannot be reported in
    /// structured form.
    #[error("error has no stack trace attached: {0}")]
    NoStackTrace(String),

    #[error("failed to serialize error report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The collection endpoint could not be reached.
    #[error("failed to send error report: {0}")]
    Transport(#[from] reqwest::Error),

    /// The collection endpoint answered with a failure status.
    #[error("error report rejected with status {status}: {body}")]
    RemoteRejection { status: StatusCode, body: String },
}

impl ReportError {
    /// Short stage label, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::InvalidInput => "invalid_input",
            ReportError::NoStackTrace(_) => "no_stack_trace",
            ReportError::Serialization(_) => "serialization",
            ReportError::Transport(_) => "transport",
            ReportError::RemoteRejection { .. } => "remote_rejection",
        }
    }
}
