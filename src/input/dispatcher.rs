//! Event Dispatcher
//!
//! Binding-table lookup plus Begin/End routing. Runs inside the platform
//! hook's synchronous callback context: no blocking work, no table
//! mutation. Unbound inputs are always forwarded so they are never silently
//! eaten from the host.

use tracing::trace;

use crate::actions::ActionRegistry;
use crate::bindings::BindingTable;
use crate::input::{ButtonIdentity, ModifierMask, Phase, PointerEvent};
use crate::platform::SuppressDecision;

/// Look up `(identity, mask)` and drive the bound action.
///
/// Misses forward the native event. Hits invoke Begin or End per the event
/// phase and suppress; wheel-style impulse identities fire a single Begin
/// with no End ever issued.
pub fn dispatch<R: ActionRegistry + ?Sized>(
    table: &BindingTable,
    registry: &R,
    identity: ButtonIdentity,
    phase: Phase,
    modifiers: ModifierMask,
) -> SuppressDecision {
    let Some(binding) = table.get(identity, modifiers) else {
        return SuppressDecision::Forward;
    };

    trace!(
        "dispatch {} {:?} mod = {:#04x} -> {}",
        identity.name(),
        phase,
        modifiers.bits(),
        binding.action_name
    );

    if identity.is_impulse() {
        // Wheel ticks have no release. The bound action gets a single
        // fire-and-forget Begin.
        registry.begin(binding.action);
        return SuppressDecision::Suppress;
    }

    match phase {
        Phase::Begin => registry.begin(binding.action),
        Phase::End => registry.end(binding.action),
    }
    SuppressDecision::Suppress
}

/// Convenience wrapper over [`dispatch`] for a full [`PointerEvent`].
pub fn dispatch_event<R: ActionRegistry + ?Sized>(
    table: &BindingTable,
    registry: &R,
    event: PointerEvent,
) -> SuppressDecision {
    dispatch(table, registry, event.identity, event.phase, event.modifiers)
}
