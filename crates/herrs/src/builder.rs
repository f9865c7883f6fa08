//! Error construction.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::error::{Cause, DynError, Error, Params};
use crate::stack::{self, BacktraceStack, FrameId, StackSource};
use crate::ErrorKind;

/// Frames between `StackSource::capture` and the code building the error.
const BUILD_FRAMES: usize = 1;

/// Human-readable message of one error layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message(String);

impl Message {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Message {
    fn from(message: &str) -> Self {
        Message(message.to_string())
    }
}

impl From<String> for Message {
    fn from(message: String) -> Self {
        Message(message)
    }
}

/// A foreign error to be wrapped as an opaque leaf.
#[derive(Clone)]
pub struct Opaque(DynError);

impl Opaque {
    pub fn new<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Opaque(Arc::new(err))
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// One loosely-typed argument of [`Builder::from_args`] and [`e!`](crate::e).
///
/// Only the types with a `From` impl below are accepted; anything else is a
/// compile error.
#[derive(Debug, Clone)]
pub enum Arg {
    Kind(ErrorKind),
    Message(Message),
    Wrapped(Error),
    Opaque(Opaque),
    Params(Params),
}

impl From<ErrorKind> for Arg {
    fn from(kind: ErrorKind) -> Self {
        Arg::Kind(kind)
    }
}

impl From<Message> for Arg {
    fn from(message: Message) -> Self {
        Arg::Message(message)
    }
}

impl From<Error> for Arg {
    fn from(err: Error) -> Self {
        Arg::Wrapped(err)
    }
}

impl From<&Error> for Arg {
    fn from(err: &Error) -> Self {
        Arg::Wrapped(err.clone())
    }
}

impl From<Opaque> for Arg {
    fn from(err: Opaque) -> Self {
        Arg::Opaque(err)
    }
}

impl From<std::io::Error> for Arg {
    fn from(err: std::io::Error) -> Self {
        Arg::Opaque(Opaque::new(err))
    }
}

impl From<Params> for Arg {
    fn from(params: Params) -> Self {
        Arg::Params(params)
    }
}

/// Builder for [`Error`].
///
/// Setters may be called in any order; a later call for the same field wins.
/// At least one setter must be called before building.
#[derive(Debug, Default)]
pub struct Builder {
    kind: Option<ErrorKind>,
    message: String,
    cause: Cause,
    params: Option<Params>,
    args: usize,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect a list of loosely-typed arguments.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = Arg>,
    {
        args.into_iter().fold(Self::new(), |builder, arg| builder.arg(arg))
    }

    /// Apply a single argument.
    pub fn arg(self, arg: impl Into<Arg>) -> Self {
        match arg.into() {
            Arg::Kind(kind) => self.kind(kind),
            Arg::Message(message) => self.message(message.0),
            Arg::Wrapped(err) => self.wrap(err),
            Arg::Opaque(err) => self.set_cause(Cause::Opaque(err.0)),
            Arg::Params(params) => self.set_params(params),
        }
    }

    pub fn kind(mut self, kind: ErrorKind) -> Self {
        self.kind = Some(kind);
        self.args += 1;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self.args += 1;
        self
    }

    /// Wrap another error of ours. The builder owns its copy, so the chain
    /// cannot be altered through the original value.
    pub fn wrap(self, err: Error) -> Self {
        self.set_cause(Cause::Wrapped(Box::new(err)))
    }

    /// Wrap a foreign error as an opaque leaf.
    pub fn source<E>(self, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.set_cause(Cause::Opaque(Arc::new(err)))
    }

    /// Attach a payload that is dumped when the error is logged.
    pub fn params<P>(self, params: P) -> Self
    where
        P: fmt::Debug + Send + Sync + 'static,
    {
        self.set_params(Params::new(params))
    }

    fn set_cause(mut self, cause: Cause) -> Self {
        self.cause = cause;
        self.args += 1;
        self
    }

    fn set_params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self.args += 1;
        self
    }

    /// Build the error, capturing the process call stack.
    ///
    /// # Panics
    /// Panics if no argument was supplied. That is a defect at the call site,
    /// not a runtime condition.
    #[inline(never)]
    pub fn build(self) -> Error {
        self.check_args();
        let frames = BacktraceStack.capture(BUILD_FRAMES);
        self.finish(frames)
    }

    /// Build the error against the given stack source.
    ///
    /// # Panics
    /// Panics if no argument was supplied.
    #[inline(never)]
    pub fn build_with(self, stack: &dyn StackSource) -> Error {
        self.check_args();
        let frames = stack.capture(BUILD_FRAMES);
        self.finish(frames)
    }

    fn check_args(&self) {
        assert!(self.args > 0, "call to herrs::Builder::build with no arguments");
    }

    fn finish(self, frames: Vec<FrameId>) -> Error {
        let mut err = Error {
            kind: self.kind,
            message: self.message,
            cause: self.cause,
            params: self.params,
            frames,
        };

        // Only our own errors take part in coalescing and dedup; opaque
        // causes are leaves.
        if let Cause::Wrapped(inner) = &mut err.cause {
            stack::coalesce(&mut err.frames, &mut inner.frames);

            if inner.message == err.message {
                inner.message.clear();
            }
            if inner.kind == err.kind {
                inner.kind = None;
            }
        }

        err
    }
}

/// Build an [`Error`] from an unordered list of arguments.
///
/// Each argument must convert into [`Arg`]: an [`ErrorKind`], a [`Message`],
/// an [`Error`] (or `&Error`) to wrap, an [`Opaque`] or `std::io::Error`
/// cause, or [`Params`].
///
/// `std::io::Error` is the only foreign error accepted as is. Wrap any other
/// error type in [`Opaque::new`], or use [`Builder::source`]:
///
/// ```
/// use herrs::{ErrorKind, Opaque, e};
///
/// let parse = "x".parse::<u32>().unwrap_err();
/// let err = e!(ErrorKind::InvalidInput, Opaque::new(parse));
/// assert_eq!(err.flattened_message(), "invalid digit found in string");
/// ```
///
/// ```
/// use herrs::{ErrorKind, Message, e};
///
/// let err = e!(ErrorKind::ValidationError, Message::from("bad id"));
/// assert_eq!(err.to_string(), "VALIDATION_ERROR: bad id");
/// assert_eq!(err.status().as_u16(), 400);
/// ```
///
/// Calling it with no arguments panics.
#[macro_export]
macro_rules! e {
    ($($arg:expr),* $(,)?) => {
        $crate::Builder::new()$(.arg($arg))*.build()
    };
}
