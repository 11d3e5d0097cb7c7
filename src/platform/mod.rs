//! Platform Event Sources
//!
//! Two structurally different OS interception mechanisms behind one
//! contract: [`message`] subclasses the host window's message procedure
//! (Win32), [`event_tap`] registers a process-scoped system event tap
//! (macOS). Both normalize native pointer input into
//! [`PointerEvent`](crate::input::PointerEvent)s, hand them to the installed
//! sink synchronously, and swallow or forward the native event according to
//! the returned [`SuppressDecision`].
//!
//! The classification logic of both backends is portable and unit-tested on
//! every host; only the thin hook plumbing is platform-gated.

use std::sync::Arc;

use crate::error::Result;
use crate::input::PointerEvent;

pub mod event_tap;
pub mod message;

/// Whether the native event should be withheld from the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressDecision {
    /// Swallow the native event; the host never sees it
    Suppress,
    /// Forward the native event to the host unchanged
    Forward,
}

impl SuppressDecision {
    /// True if the native event must be withheld.
    pub const fn is_suppress(self) -> bool {
        matches!(self, Self::Suppress)
    }
}

/// Synchronous event consumer installed into a backend.
///
/// Called on the host's input thread for every normalized pointer event; it
/// must not block.
pub type EventSink = Arc<dyn Fn(PointerEvent) -> SuppressDecision + Send + Sync>;

/// One OS interception backend.
///
/// Implementations must tolerate repeated install/uninstall cycles without
/// leaking OS resources, and `uninstall` must be idempotent (safe to call
/// when never installed).
pub trait PlatformEventSource: Send {
    /// Install the OS hook and route events into `sink`.
    fn install(&mut self, sink: EventSink) -> Result<()>;

    /// Remove the OS hook. Idempotent.
    fn uninstall(&mut self) -> Result<()>;

    /// Whether the hook is currently live.
    fn is_installed(&self) -> bool;

    /// Backend name, for logging.
    fn name(&self) -> &'static str;
}

/// The backend for the current build target.
///
/// On targets with no interception mechanism this returns the message
/// backend, whose `install` fails gracefully; the engine logs the failure
/// and keeps running with rebinding disabled.
pub fn default_event_source() -> Box<dyn PlatformEventSource> {
    #[cfg(target_os = "macos")]
    {
        Box::new(event_tap::TapEventSource::new())
    }
    #[cfg(not(target_os = "macos"))]
    {
        Box::new(message::MessageEventSource::new())
    }
}
