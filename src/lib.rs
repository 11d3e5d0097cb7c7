//! # mousebind
//!
//! Pointer input interception and command rebinding engine for simulator
//! plugins. Extra mouse buttons and the mouse wheel can be re-assigned to
//! arbitrary host commands via a small line-oriented profile file.
//!
//! # Architecture
//!
//! ```text
//! mousebind
//!   ├─> Platform Event Source (window-proc subclass | system event tap)
//!   ├─> Modifier Resolver (keyboard modifiers ∪ other held buttons)
//!   ├─> Binding Table (identity + mask → host action)
//!   ├─> Dispatcher (lookup, Begin/End, suppression decision)
//!   └─> Engine (lifecycle: enable / disable / vehicle loaded)
//! ```
//!
//! # Data Flow
//!
//! **Input Path:** native event → classify → modifier snapshot → dispatch →
//! host action Begin/End → suppress or forward the native event.
//!
//! The host command system is injected behind
//! [`actions::ActionRegistry`]; the engine only ever signals opaque
//! Begin/End pairs and never learns what a command does.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Host action interface
pub mod actions;

/// Binding table, parser and file resolution
pub mod bindings;

/// Settings store
pub mod config;

/// Engine lifecycle orchestration
pub mod engine;

/// Error types
pub mod error;

/// Abstract event model, modifier resolution and dispatch
pub mod input;

/// Logging initialization
pub mod logging;

/// Platform event sources
pub mod platform;

pub use actions::{ActionHandle, ActionRegistry};
pub use bindings::{Binding, BindingTable};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use input::{ButtonIdentity, Modifier, ModifierMask, Phase, PointerEvent};
pub use platform::{PlatformEventSource, SuppressDecision};
