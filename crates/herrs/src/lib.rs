//! # herrs
//!
//! Structured, chainable errors for request-serving backends.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: What went wrong, as a stable category that maps to one HTTP status
//! - **Message**: Human-readable context added at each layer
//! - **Cause**: The error being wrapped, either one of ours or a foreign leaf
//! - **Stack**: Captured at construction and coalesced across wrapping layers,
//!   so a request that is re-wrapped N times still logs a single trace
//!
//! ## Usage
//!
//! ```rust
//! use herrs::{Error, ErrorKind, Message, e};
//!
//! fn load_user(id: u32) -> herrs::Result<()> {
//!     Err(e!(ErrorKind::NotFound, Message::from(format!("user {id}"))))
//! }
//!
//! fn handler() -> herrs::Result<()> {
//!     load_user(7).map_err(|err| Error::builder().message("get profile").wrap(err).build())
//! }
//!
//! let err = handler().unwrap_err();
//! assert_eq!(err.status().as_u16(), 404);
//! assert_eq!(err.flattened_message(), "get profile: user 7");
//! assert_eq!(err.to_string(), "get profile:\n\tNOT_FOUND: user 7");
//! ```
//!
//! ## Principles
//!
//! - A layer that repeats the kind or message of the error it wraps clears
//!   them on the wrapped copy, so nothing prints twice
//! - Rendering never mutates the chain
//! - `status()` always yields a usable status, `Display` never yields empty text
//! - `log_line()` is the only operation with a side effect: it emits through `tracing`

mod builder;
mod error;
mod format;
pub mod kind;
pub mod stack;
pub mod status;

pub use builder::{Arg, Builder, Message, Opaque};
pub use error::{Cause, Chain, DynError, Error, Params};
pub use format::{DEFAULT_SEPARATOR, RenderOptions};
pub use http::StatusCode;
pub use kind::ErrorKind;
pub use stack::{BacktraceStack, FrameId, ResolvedFrame, ScriptedStack, StackSource};

/// Result type alias using the chained Error
pub type Result<T> = std::result::Result<T, Error>;
