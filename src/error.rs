//! Engine Error Types
//!
//! Error handling for hook installation and engine lifecycle. Binding-file
//! problems are deliberately *not* errors: the parser reports them as
//! diagnostics and keeps going (see [`crate::bindings::parser`]).

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine error types
#[derive(Error, Debug)]
pub enum EngineError {
    /// Host window could not be located for subclassing
    #[error("Host window not found")]
    WindowNotFound,

    /// The OS refused the window subclass
    #[error("Hook installation failed: {0}")]
    HookInstallFailed(String),

    /// The OS refused to create the event tap (typically missing
    /// accessibility permissions)
    #[error("Event tap creation failed: {0}")]
    TapCreationFailed(String),

    /// Hook uninstallation failed; the previous procedure could not be
    /// restored
    #[error("Hook uninstallation failed: {0}")]
    HookUninstallFailed(String),

    /// Install called while a hook is already live
    #[error("Event source is already installed")]
    AlreadyInstalled,

    /// The backend does not exist on the current platform
    #[error("Event source not supported on this platform: {0}")]
    UnsupportedPlatform(&'static str),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
