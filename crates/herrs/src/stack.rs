//! Call-stack capture, resolution and coalescing.
//!
//! Stacks are stored as plain frame identifiers, newest first: index 0 is the
//! frame that built the error, the last element is the program entry point.
//! Names, files and lines are only resolved when a trace is printed.

use std::ffi::c_void;
use std::fmt;

use parking_lot::{Mutex, RwLock};

/// Maximum number of frames kept per capture.
pub const MAX_DEPTH: usize = 64;

/// Opaque identifier of one captured frame (an instruction address for
/// [`BacktraceStack`], a registry index for [`ScriptedStack`]).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(usize);

impl FrameId {
    pub const fn new(addr: usize) -> Self {
        FrameId(addr)
    }

    pub fn addr(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameId({:#x})", self.0)
    }
}

/// A frame resolved for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFrame {
    pub name: String,
    pub file: String,
    pub line: u32,
}

impl ResolvedFrame {
    pub fn new(name: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            line,
        }
    }

    /// Placeholder for frames that cannot be resolved.
    pub fn unknown() -> Self {
        Self::new("???", "???", 0)
    }
}

/// Platform capability to snapshot and resolve call stacks.
///
/// Errors are built against a `StackSource` so that tests can substitute a
/// deterministic stack for the process one.
pub trait StackSource: Send + Sync {
    /// Capture the current stack, newest first. The first `skip` frames,
    /// counting from the caller of `capture`, are dropped.
    fn capture(&self, skip: usize) -> Vec<FrameId>;

    /// Resolve a frame previously returned by [`StackSource::capture`].
    fn resolve(&self, frame: FrameId) -> ResolvedFrame;
}

/// The process call stack, walked and symbolized with the `backtrace` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceStack;

impl StackSource for BacktraceStack {
    #[inline(never)]
    fn capture(&self, skip: usize) -> Vec<FrameId> {
        // Frames up to and including this method belong to the unwinder.
        let anchor = <Self as StackSource>::capture as fn(&Self, usize) -> Vec<FrameId> as usize;
        let mut ips = Vec::new();
        let mut anchor_at = None;
        backtrace::trace(|frame| {
            if anchor_at.is_none() && frame.symbol_address() as usize == anchor {
                anchor_at = Some(ips.len());
            }
            ips.push(FrameId::new(frame.ip() as usize));
            ips.len() < MAX_DEPTH * 4
        });

        let start = anchor_at.map_or(0, |at| at + 1) + skip;
        ips.into_iter().skip(start).take(MAX_DEPTH).collect()
    }

    fn resolve(&self, frame: FrameId) -> ResolvedFrame {
        // Return addresses point just past the call instruction.
        let addr = frame.addr().saturating_sub(1) as *mut c_void;
        let mut resolved = None;
        backtrace::resolve(addr, |symbol| {
            if resolved.is_some() {
                return;
            }
            let Some(name) = symbol.name() else {
                return;
            };
            resolved = Some(ResolvedFrame::new(
                format!("{name:#}"),
                symbol
                    .filename()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "???".to_string()),
                symbol.lineno().unwrap_or(0),
            ));
        });
        resolved.unwrap_or_else(ResolvedFrame::unknown)
    }
}

/// In-memory stack for tests and tooling.
///
/// Frames are registered by name, and the "current" stack is whatever was
/// last passed to [`ScriptedStack::enter`]. The `skip` argument of `capture`
/// is ignored: scripted stacks never contain construction frames.
#[derive(Debug, Default)]
pub struct ScriptedStack {
    symbols: RwLock<Vec<ResolvedFrame>>,
    current: Mutex<Vec<FrameId>>,
}

impl ScriptedStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frame and return its identifier.
    pub fn frame(&self, name: &str, file: &str, line: u32) -> FrameId {
        let mut symbols = self.symbols.write();
        symbols.push(ResolvedFrame::new(name, file, line));
        FrameId::new(symbols.len())
    }

    /// Set the current stack, newest first.
    pub fn enter(&self, frames: &[FrameId]) {
        *self.current.lock() = frames.to_vec();
    }

    /// The stack a capture would return right now.
    pub fn current(&self) -> Vec<FrameId> {
        self.current.lock().clone()
    }
}

impl StackSource for ScriptedStack {
    fn capture(&self, _skip: usize) -> Vec<FrameId> {
        self.current()
    }

    fn resolve(&self, frame: FrameId) -> ResolvedFrame {
        frame
            .addr()
            .checked_sub(1)
            .and_then(|index| self.symbols.read().get(index).cloned())
            .unwrap_or_else(ResolvedFrame::unknown)
    }
}

/// Merge the stack of a wrapped error into the stack of its wrapper.
///
/// Both stacks are compared from their oldest end. When they share a
/// non-empty suffix, `outer` becomes the distinct head of `inner` followed by
/// all of `outer`, and `inner` is cleared so it is never printed on its own.
/// Without a shared suffix both stacks are left untouched. Returns the length
/// of the shared suffix.
pub fn coalesce(outer: &mut Vec<FrameId>, inner: &mut Vec<FrameId>) -> usize {
    let shared = outer
        .iter()
        .rev()
        .zip(inner.iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    if shared == 0 {
        tracing::trace!(outer = outer.len(), inner = inner.len(), "stacks disjoint");
        return 0;
    }

    let head = &inner[..inner.len() - shared];
    let mut merged = Vec::with_capacity(head.len() + outer.len());
    merged.extend_from_slice(head);
    merged.extend_from_slice(outer);
    tracing::trace!(shared, merged = merged.len(), "stacks coalesced");

    *outer = merged;
    inner.clear();
    shared
}
