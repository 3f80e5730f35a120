//! Errors that remember where they were raised.
//!
//! A [`TracedError`] captures the call stack when it is created, and again
//! every time it is wrapped with more context. The reporter walks the
//! resulting chain through the [`ErrorChain`] capability, so anything that can
//! expose a cause and a stack trace can be reported. `anyhow::Error` takes
//! part too: its own backtrace is used when one was captured.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::iter;
use std::panic::Location;
use std::sync::OnceLock;

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// A single stack-trace entry. Either part may be missing when symbols or
/// debug info are not available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub function: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl Frame {
    /// Frame for the location that called the (track_caller) function this
    /// is invoked from. Carries no function name.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self {
            function: None,
            file: Some(location.file().to_string()),
            line: Some(location.line()),
            column: Some(location.column()),
        }
    }

    fn symbol(function: &str) -> Self {
        // full-format symbols end in a `::h<16 hex digits>` hash
        let is_hash = |hash: &str| hash.len() == 16 && hash.bytes().all(|b| b.is_ascii_hexdigit());
        let function = match function.rsplit_once("::h") {
            Some((path, hash)) if is_hash(hash) => path,
            _ => function,
        };
        Self {
            function: Some(function.to_string()),
            file: None,
            line: None,
            column: None,
        }
    }

    /// Fills in the location from the `file:line:column` text that follows
    /// `at` in a rendered backtrace.
    fn set_location(&mut self, location: &str) {
        let mut parts = location.rsplitn(3, ':');
        let column = parts.next().and_then(|c| c.parse().ok());
        let line = parts.next().and_then(|l| l.parse().ok());
        match (parts.next(), line, column) {
            (Some(file), Some(line), Some(column)) => {
                self.file = Some(file.to_string());
                self.line = Some(line);
                self.column = Some(column);
            }
            _ => self.file = Some(location.to_string()),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(function) = &self.function {
            f.write_str(function)?;
            if self.file.is_some() {
                f.write_str(" at ")?;
            }
        }
        if let Some(file) = &self.file {
            f.write_str(file)?;
            if let Some(line) = self.line {
                write!(f, ":{}", line)?;
            }
            if let Some(column) = self.column {
                write!(f, ":{}", column)?;
            }
        }
        Ok(())
    }
}

/// Frames of a captured backtrace, innermost first, without the frames of the
/// capturing machinery itself. Empty unless the backtrace was captured.
pub fn backtrace_frames(backtrace: &Backtrace) -> Vec<Frame> {
    if backtrace.status() != BacktraceStatus::Captured {
        return Vec::new();
    }
    parse_backtrace(&backtrace.to_string())
}

fn parse_backtrace(rendered: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    for line in rendered.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('[') || line.starts_with("note:") {
            continue;
        }
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                frame.set_location(location);
            }
            continue;
        }
        // "12: name", or a bare name for a symbol inlined into the frame above
        let function = match line.split_once(": ") {
            Some((index, name)) if index.bytes().all(|b| b.is_ascii_digit()) => name,
            _ => line,
        };
        frames.push(Frame::symbol(function));
    }
    frames.retain(|frame| !is_capture_frame(frame));
    frames
}

fn is_capture_frame(frame: &Frame) -> bool {
    let Some(function) = frame.function.as_deref() else {
        return false;
    };
    function.contains("std::backtrace")
        || function.contains("anyhow::")
        || function.contains("cmd_util::trace::TracedError::")
        || function.contains("cmd_util::trace::WrapErr")
}

/// Traversal of a chain of wrapped errors.
pub trait ErrorChain: fmt::Display {
    /// The next error down the chain that can itself be traversed.
    fn wrapped_cause(&self) -> Option<&dyn ErrorChain>;

    /// The trace recorded for this link, if any.
    fn stack_trace(&self) -> Option<Cow<'_, [Frame]>>;

    /// Human readable description of the whole error.
    fn message(&self) -> String {
        self.to_string()
    }
}

/// An error with a recorded stack trace and an optional underlying cause.
///
/// The backtrace is always captured, independent of `RUST_BACKTRACE`, and
/// only resolved into frames when the trace is first asked for.
pub struct TracedError {
    message: String,
    location: Frame,
    backtrace: Backtrace,
    frames: OnceLock<Vec<Frame>>,
    cause: Option<BoxError>,
}

impl TracedError {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::capture(message.into(), None, Frame::caller())
    }

    /// Wraps `cause` with additional context, capturing the current stack.
    #[track_caller]
    pub fn wrap(cause: impl Into<BoxError>, message: impl Into<String>) -> Self {
        Self::capture(message.into(), Some(cause.into()), Frame::caller())
    }

    fn capture(message: String, cause: Option<BoxError>, location: Frame) -> Self {
        Self {
            message,
            location,
            backtrace: Backtrace::force_capture(),
            frames: OnceLock::new(),
            cause,
        }
    }

    /// The context message of this link only, without the causes.
    pub fn context(&self) -> &str {
        &self.message
    }

    /// Where this link was created.
    pub fn location(&self) -> &Frame {
        &self.location
    }

    fn frames(&self) -> &[Frame] {
        self.frames.get_or_init(|| {
            let frames = backtrace_frames(&self.backtrace);
            // unsupported platforms still get the creation site
            if frames.is_empty() {
                vec![self.location.clone()]
            } else {
                frames
            }
        })
    }
}

impl fmt::Debug for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedError")
            .field("message", &self.message)
            .field("location", &self.location)
            .field("cause", &self.cause)
            .finish()
    }
}

impl fmt::Display for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {}", self.message, cause),
            None => f.write_str(&self.message),
        }
    }
}

impl Error for TracedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn Error + 'static))
    }
}

impl ErrorChain for TracedError {
    fn wrapped_cause(&self) -> Option<&dyn ErrorChain> {
        let cause = self.cause.as_deref()?;
        find_traced(cause).map(|traced| traced as &dyn ErrorChain)
    }

    fn stack_trace(&self) -> Option<Cow<'_, [Frame]>> {
        Some(Cow::Borrowed(self.frames()))
    }
}

/// First [`TracedError`] in the `source()` chain starting at `err`.
fn find_traced<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a TracedError> {
    iter::successors(Some(err), |&e| e.source()).find_map(|e| e.downcast_ref::<TracedError>())
}

/// An `anyhow::Error` is traversed through the first [`TracedError`] found in
/// its context chain. Its own trace is anyhow's backtrace, which is only
/// captured when `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` is enabled.
impl ErrorChain for anyhow::Error {
    fn wrapped_cause(&self) -> Option<&dyn ErrorChain> {
        self.chain()
            .find_map(|e| e.downcast_ref::<TracedError>())
            .map(|traced| traced as &dyn ErrorChain)
    }

    fn stack_trace(&self) -> Option<Cow<'_, [Frame]>> {
        let frames = backtrace_frames(self.backtrace());
        (!frames.is_empty()).then_some(Cow::Owned(frames))
    }

    fn message(&self) -> String {
        format!("{:#}", self)
    }
}

/// Adapter for ordinary `std::error::Error` values. It carries no trace of its
/// own, but a [`TracedError`] anywhere in its `source()` chain is found.
#[derive(Debug)]
pub struct PlainError<E>(pub E);

impl<E: fmt::Display> fmt::Display for PlainError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<E: Error + 'static> ErrorChain for PlainError<E> {
    fn wrapped_cause(&self) -> Option<&dyn ErrorChain> {
        self.0
            .source()
            .and_then(find_traced)
            .map(|traced| traced as &dyn ErrorChain)
    }

    fn stack_trace(&self) -> Option<Cow<'_, [Frame]>> {
        None
    }
}

/// Adds `wrap_err` to any `Result` whose error converts into a boxed error.
pub trait WrapErr<T> {
    fn wrap_err(self, message: impl Into<String>) -> Result<T, TracedError>;
}

impl<T, E> WrapErr<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    #[track_caller]
    fn wrap_err(self, message: impl Into<String>) -> Result<T, TracedError> {
        // not `map_err`: the closure would hide the caller's location
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(TracedError::wrap(err, message)),
        }
    }
}
