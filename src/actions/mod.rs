//! Host Action Interface
//!
//! The engine never executes commands itself; it signals Begin/End on opaque
//! host-side actions. The host command system is injected behind the
//! [`ActionRegistry`] trait so the binding parser and dispatcher stay free of
//! global state.
//!
//! Actions are fire-and-forget: the engine gets no feedback on whether a
//! Begin/End pair was correctly bracketed by the host.

/// Opaque reference to a host-defined command.
///
/// Handles are produced by the host registry and only ever passed back into
/// it. The engine attaches no meaning to the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionHandle(u64);

impl ActionHandle {
    /// Wrap a raw host command identifier.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw host command identifier.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Host command system seam.
///
/// `lookup`/`create` are used while building the binding table; `begin`/`end`
/// are invoked from the platform hook's synchronous callback context and must
/// not block.
#[cfg_attr(test, mockall::automock)]
pub trait ActionRegistry: Send + Sync {
    /// Look up a previously registered action by name.
    fn lookup(&self, name: &str) -> Option<ActionHandle>;

    /// Create a new action. Called for binding lines that reference a name
    /// the host does not know yet (create-on-first-reference policy).
    fn create(&mut self, name: &str, description: &str) -> ActionHandle;

    /// Signal the start of an action.
    fn begin(&self, action: ActionHandle);

    /// Signal the end of an action.
    fn end(&self, action: ActionHandle);
}

/// Resolve an action name against the registry, creating it on a miss.
pub fn resolve_action<R: ActionRegistry + ?Sized>(registry: &mut R, name: &str) -> ActionHandle {
    match registry.lookup(name) {
        Some(handle) => handle,
        None => registry.create(name, ""),
    }
}
