//! The chained Error type.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::ErrorKind;
use crate::builder::Builder;
use crate::stack::FrameId;

/// Shared handle to an error that is not one of ours.
pub type DynError = Arc<dyn StdError + Send + Sync + 'static>;

/// Opaque payload attached to a single layer of an error chain.
///
/// The payload is only ever printed, through its `Debug` impl, when the error
/// is logged. It is not inherited by wrapping layers.
#[derive(Clone)]
pub struct Params(Arc<dyn fmt::Debug + Send + Sync + 'static>);

impl Params {
    pub fn new<P>(params: P) -> Self
    where
        P: fmt::Debug + Send + Sync + 'static,
    {
        Params(Arc::new(params))
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// What an error wraps.
#[derive(Debug, Clone, Default)]
pub enum Cause {
    /// Nothing: this layer is the root of the chain.
    #[default]
    None,
    /// Another chained error, owned by this layer.
    Wrapped(Box<Error>),
    /// A foreign error, treated as a leaf.
    Opaque(DynError),
}

/// A structured, chainable error.
///
/// Each layer may carry a kind, a message, a params payload and a cause, plus
/// the call stack captured when it was built. Values are created with
/// [`Error::builder`] or the [`e!`](crate::e) macro and are immutable
/// afterwards.
#[derive(Clone)]
pub struct Error {
    pub(crate) kind: Option<ErrorKind>,
    pub(crate) message: String,
    pub(crate) cause: Cause,
    pub(crate) params: Option<Params>,
    pub(crate) frames: Vec<FrameId>,
}

impl Error {
    /// Start building a new error.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// The kind set at this layer, if any.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.kind
    }

    /// The message set at this layer; empty when none was given.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// The wrapped error when the cause is one of ours.
    pub fn wrapped(&self) -> Option<&Error> {
        match &self.cause {
            Cause::Wrapped(inner) => Some(inner),
            _ => None,
        }
    }

    /// The foreign error when the cause is opaque.
    pub fn opaque(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match &self.cause {
            Cause::Opaque(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    pub fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }

    /// Captured frames, newest first. Empty once merged into a wrapping layer.
    pub fn frames(&self) -> &[FrameId] {
        &self.frames
    }

    /// True for bookkeeping layers that carry no kind, message or cause.
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.message.is_empty() && matches!(self.cause, Cause::None)
    }

    /// Iterate the layers of the chain from this one inwards, stopping before
    /// an opaque cause.
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }
}

/// Iterator over the layers of an error chain. See [`Error::chain`].
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a Error>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Error;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.wrapped();
        Some(current)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", crate::kind::tag_of(self.kind))?;

        if !self.message.is_empty() {
            writeln!(f, "    Message: {}", self.message)?;
        }

        if let Some(params) = &self.params {
            writeln!(f, "    Params: {:?}", params)?;
        }

        if !self.frames.is_empty() {
            writeln!(f, "    Frames: {}", self.frames.len())?;
        }

        match &self.cause {
            Cause::None => {}
            Cause::Wrapped(inner) => write!(f, "    Cause: {:?}", inner)?,
            Cause::Opaque(err) => writeln!(f, "    Cause: {:?}", err)?,
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.cause {
            Cause::None => None,
            Cause::Wrapped(inner) => Some(inner.as_ref() as &(dyn StdError + 'static)),
            Cause::Opaque(err) => Some(err.as_ref() as &(dyn StdError + 'static)),
        }
    }
}
