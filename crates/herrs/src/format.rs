//! Chain walking: flattened message, HTTP status, rendered text, stack trace
//! and the full log line.
//!
//! Every operation here borrows the error immutably. Only [`Error::log_line`]
//! has a side effect, handing its result to `tracing`.

use std::fmt::Write as _;

use http::StatusCode;

use crate::error::{Cause, Error};
use crate::stack::{BacktraceStack, StackSource};
use crate::status::status_of;

/// Separator placed before a nested error and between stack frames.
pub const DEFAULT_SEPARATOR: &str = ":\n\t";

/// Marker printed in place of a frame-name prefix shared with the previous frame.
const ELLIPSIS: &str = "...";

/// Rendering configuration.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Separator before nested errors and between stack frames. Servers that
    /// want one error per line can use something like `":: "`.
    pub separator: String,

    /// Abbreviate frame names sharing leading path segments with the
    /// previously printed frame.
    pub abbreviate: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            separator: DEFAULT_SEPARATOR.to_string(),
            abbreviate: true,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep every nested error on a single line.
    pub fn single_line() -> Self {
        Self::default().with_separator(":: ")
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_abbreviate(mut self, abbreviate: bool) -> Self {
        self.abbreviate = abbreviate;
        self
    }
}

impl Error {
    /// Every layer's message, outermost first, joined by `": "`.
    ///
    /// An opaque cause ends the walk and contributes its own text. Empty
    /// messages add neither text nor separator.
    pub fn flattened_message(&self) -> String {
        let mut out = String::new();
        for layer in self.chain() {
            join(&mut out, &layer.message);
        }
        if let Some(leaf) = self.chain().last().and_then(Error::opaque) {
            join(&mut out, &leaf.to_string());
        }
        out
    }

    /// The HTTP status of the first layer carrying a kind, outermost first.
    ///
    /// Descent stops at an opaque cause. Chains without any kind report
    /// `500 Internal Server Error`.
    pub fn status(&self) -> StatusCode {
        if let Some(kind) = self.kind {
            return kind.http_status();
        }
        for layer in self.chain().skip(1) {
            if let Some(kind) = layer.kind {
                return kind.http_status();
            }
        }
        status_of(self.kind)
    }

    /// Single error text with default options, `"no error"` when nothing
    /// in the chain has content. This is also the `Display` output.
    pub fn rendered(&self) -> String {
        self.rendered_with(&RenderOptions::default())
    }

    pub fn rendered_with(&self, opts: &RenderOptions) -> String {
        let mut out = String::new();
        if let Some(kind) = self.kind {
            pad(&mut out, ": ");
            out.push_str(kind.tag());
        }
        if !self.message.is_empty() {
            pad(&mut out, ": ");
            out.push_str(&self.message);
        }
        match &self.cause {
            Cause::Wrapped(inner) if !inner.is_empty() => {
                pad(&mut out, &opts.separator);
                out.push_str(&inner.rendered_with(opts));
            }
            Cause::Opaque(err) => {
                pad(&mut out, ": ");
                out.push_str(&err.to_string());
            }
            Cause::Wrapped(_) | Cause::None => {}
        }

        if out.is_empty() {
            return "no error".to_string();
        }
        out
    }

    /// The captured stack trace, resolved against the process stack.
    pub fn stack_trace(&self) -> String {
        self.stack_trace_with(&RenderOptions::default(), &BacktraceStack)
    }

    /// Print the captured frames from the entry point towards the error site.
    ///
    /// The leading frames that the render site shares with the error (by
    /// resolved name, compared from the entry point) are skipped. Runs of the
    /// same function, left behind by coalescing, print once.
    pub fn stack_trace_with(&self, opts: &RenderOptions, stack: &dyn StackSource) -> String {
        let here = stack.capture(0);
        let mut out = String::new();
        let mut prev = String::new();
        let mut diverged = false;

        for (depth, &frame) in self.frames.iter().rev().enumerate() {
            let resolved = stack.resolve(frame);

            if !diverged {
                if let Some(&shared) = here.iter().rev().nth(depth) {
                    if stack.resolve(shared).name == resolved.name {
                        continue;
                    }
                }
                diverged = true;
            }

            if resolved.name == prev {
                continue;
            }

            let trim = if opts.abbreviate {
                shared_segments(&prev, &resolved.name)
            } else {
                0
            };

            pad(&mut out, &opts.separator);
            let _ = write!(out, "{}:{}: ", resolved.file, resolved.line);
            if trim > 0 {
                out.push_str(ELLIPSIS);
            }
            out.push_str(&resolved.name[trim..]);

            prev = resolved.name;
        }

        out
    }

    /// Assemble the stack trace, the rendered error and the params dump, and
    /// emit the result through `tracing` at error level.
    pub fn log_line(&self) -> String {
        self.log_line_with(&RenderOptions::default(), &BacktraceStack)
    }

    pub fn log_line_with(&self, opts: &RenderOptions, stack: &dyn StackSource) -> String {
        let mut out = self.stack_trace_with(opts, stack);

        pad(&mut out, ": ");
        out.push('\n');
        out.push_str(&self.rendered_with(opts));

        if let Some(params) = &self.params {
            pad(&mut out, ": ");
            out.push('\n');
            let _ = write!(out, "{params:?}");
        }

        tracing::error!(target: "herrs", status = self.status().as_u16(), "{out}");
        out
    }
}

/// Append `sep` if `out` already has content.
fn pad(out: &mut String, sep: &str) {
    if !out.is_empty() {
        out.push_str(sep);
    }
}

/// Append a non-empty `part`, separated by `": "` from earlier content.
fn join(out: &mut String, part: &str) {
    if part.is_empty() {
        return;
    }
    pad(out, ": ");
    out.push_str(part);
}

/// Byte length of the leading `::`-separated segments `name` shares with `prev`,
/// separators included.
fn shared_segments(prev: &str, name: &str) -> usize {
    let mut trim = 0;
    while let Some(at) = name[trim..].find("::") {
        let end = trim + at + 2;
        if !prev.starts_with(&name[..end]) {
            break;
        }
        trim = end;
    }
    trim
}
