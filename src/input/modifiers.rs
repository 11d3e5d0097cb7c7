//! Modifier Mask Resolution
//!
//! A [`ModifierMask`] is a bitset over the keyboard modifiers and the pointer
//! buttons held *in addition to* the one that triggered the current event.
//! The mask is a plain set union with no ordering between keyboard and
//! pointer bits; the only rule is that a button never contributes its own
//! held-bit to the event it triggered.

use enumflags2::{bitflags, BitFlags};

use crate::input::ButtonIdentity;

/// A single modifier bit.
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Either Ctrl key
    Ctrl = 1 << 0,
    /// Either Shift key
    Shift = 1 << 1,
    /// Either Alt key
    Alt = 1 << 2,
    /// Left mouse button held
    LeftButton = 1 << 3,
    /// Right mouse button held
    RightButton = 1 << 4,
    /// Middle mouse button held
    MiddleButton = 1 << 5,
    /// Forward side button held
    ForwardButton = 1 << 6,
    /// Backward side button held
    BackwardButton = 1 << 7,
}

/// Bitset of concurrently active modifiers.
pub type ModifierMask = BitFlags<Modifier>;

impl Modifier {
    /// Symbolic name used in the binding file's `+`-joined modifier list.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ctrl => "CTRL",
            Self::Shift => "SHIFT",
            Self::Alt => "ALT",
            Self::LeftButton => "LMB",
            Self::RightButton => "RMB",
            Self::MiddleButton => "MMB",
            Self::ForwardButton => "FMB",
            Self::BackwardButton => "BMB",
        }
    }

    /// Resolve a symbolic modifier name. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        BitFlags::<Self>::all()
            .iter()
            .find(|modifier| modifier.name() == name)
    }

    /// The held-button bit corresponding to a pointer button identity.
    /// Wheel identities have no held state and map to `None`.
    pub const fn for_button(identity: ButtonIdentity) -> Option<Self> {
        match identity {
            ButtonIdentity::Left => Some(Self::LeftButton),
            ButtonIdentity::Right => Some(Self::RightButton),
            ButtonIdentity::Middle => Some(Self::MiddleButton),
            ButtonIdentity::Forward => Some(Self::ForwardButton),
            ButtonIdentity::Backward => Some(Self::BackwardButton),
            _ => None,
        }
    }
}

/// Raw platform modifier/button state sampled at event time, before the
/// triggering button has been excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawModifierState {
    /// Either Ctrl key down
    pub ctrl: bool,
    /// Either Shift key down
    pub shift: bool,
    /// Either Alt key down
    pub alt: bool,
    /// Held pointer buttons, as reported by the platform. May still include
    /// the triggering button during its own down/up transition.
    pub held_buttons: ModifierMask,
}

/// Compute the modifier mask for an event triggered by `trigger`.
///
/// Keyboard bits and held-button bits compose by set union; the trigger's
/// own held-bit is removed even if the platform reports the button as still
/// down during its own transition.
pub fn resolve_mask(raw: RawModifierState, trigger: ButtonIdentity) -> ModifierMask {
    let mut mask = ModifierMask::empty();
    if raw.ctrl {
        mask |= Modifier::Ctrl;
    }
    if raw.shift {
        mask |= Modifier::Shift;
    }
    if raw.alt {
        mask |= Modifier::Alt;
    }

    let mut held = raw.held_buttons;
    if let Some(own) = Modifier::for_button(trigger) {
        held.remove(own);
    }
    mask | held
}

/// Render a mask in binding-file notation (`CTRL+ALT`). The empty mask
/// renders as the explicit `NONE` placeholder so serialized tables stay
/// three-token lines.
pub fn format_mask(mask: ModifierMask) -> String {
    if mask.is_empty() {
        return "NONE".to_string();
    }
    mask.iter()
        .map(Modifier::name)
        .collect::<Vec<_>>()
        .join("+")
}
