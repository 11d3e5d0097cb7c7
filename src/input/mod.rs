//! Abstract Input Event Model
//!
//! Both platform backends normalize raw OS events into the same small
//! vocabulary: a [`ButtonIdentity`] (which button or wheel direction), a
//! [`Phase`] (press/release transition), and a [`ModifierMask`] snapshot of
//! the keyboard modifiers and other held pointer buttons at event time.
//!
//! ```text
//! Native event (WM_* message / CG event)
//!       ↓ classify
//! (ButtonIdentity, Phase)
//!       ↓ + modifier snapshot
//! PointerEvent ──> Dispatcher ──> SuppressDecision
//! ```

pub mod dispatcher;
pub mod modifiers;

pub use modifiers::{Modifier, ModifierMask, RawModifierState};

/// Abstract pointer button or wheel-impulse identity.
///
/// The five physical buttons have a press and a release transition; the four
/// wheel identities are impulse-only (a scroll tick has no release).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonIdentity {
    /// Primary (left) button
    Left,
    /// Secondary (right) button
    Right,
    /// Middle button
    Middle,
    /// Forward side button
    Forward,
    /// Backward side button
    Backward,
    /// Wheel scrolled away from the user
    WheelForward,
    /// Wheel scrolled towards the user
    WheelBackward,
    /// Wheel tilted or scrolled left
    WheelLeft,
    /// Wheel tilted or scrolled right
    WheelRight,
}

impl ButtonIdentity {
    /// All identities, in binding-file name-table order.
    pub const ALL: [Self; 9] = [
        Self::Left,
        Self::Right,
        Self::Middle,
        Self::Forward,
        Self::Backward,
        Self::WheelForward,
        Self::WheelBackward,
        Self::WheelLeft,
        Self::WheelRight,
    ];

    /// Symbolic name used in the binding file.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "Mouse-Left",
            Self::Right => "Mouse-Right",
            Self::Middle => "Mouse-Middle",
            Self::Forward => "Mouse-Forward",
            Self::Backward => "Mouse-Backward",
            Self::WheelForward => "Mouse-Wheel-Forward",
            Self::WheelBackward => "Mouse-Wheel-Backward",
            Self::WheelLeft => "Mouse-Wheel-Left",
            Self::WheelRight => "Mouse-Wheel-Right",
        }
    }

    /// Resolve a symbolic binding-file name. Matching is case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|identity| identity.name().eq_ignore_ascii_case(name))
    }

    /// Whether this identity is impulse-only (wheel tick): it carries a
    /// single Begin and never a matching End.
    pub const fn is_impulse(self) -> bool {
        matches!(
            self,
            Self::WheelForward | Self::WheelBackward | Self::WheelLeft | Self::WheelRight
        )
    }
}

/// Begin/End transition of a momentary input.
///
/// Wheel impulses are delivered as a single `Begin`; the dispatcher knows
/// impulse identities never receive an `End`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Button pressed, or wheel impulse fired
    Begin,
    /// Button released
    End,
}

/// A normalized pointer event as produced by a platform backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    /// Which button or wheel direction fired
    pub identity: ButtonIdentity,
    /// Press/release transition
    pub phase: Phase,
    /// Modifiers active at event time, excluding the trigger itself
    pub modifiers: ModifierMask,
}
