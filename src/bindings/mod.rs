//! Binding Table
//!
//! The ordered collection of `(button identity, modifier mask) → action`
//! mappings for the current session. The table is built wholesale by the
//! parser (see [`parser`]), read-only while a platform hook is live, and
//! rebuilt from scratch when the active vehicle changes.
//!
//! Duplicate keys resolve last-write-wins: a later line in the source file
//! silently shadows an earlier one with the same key.

use std::collections::HashMap;

use crate::actions::ActionHandle;
use crate::input::{ButtonIdentity, ModifierMask};

pub mod parser;
pub mod source;

/// Lookup key: which input, under which modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingKey {
    /// Triggering button or wheel direction
    pub identity: ButtonIdentity,
    /// Required modifier mask (exact match, not subset)
    pub modifiers: ModifierMask,
}

/// A single configured binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Triggering button or wheel direction
    pub identity: ButtonIdentity,
    /// Required modifier mask
    pub modifiers: ModifierMask,
    /// Resolved host action
    pub action: ActionHandle,
    /// Action name as written in the binding file, kept for serialization
    /// and logging
    pub action_name: String,
}

impl Binding {
    /// The table key for this binding.
    pub fn key(&self) -> BindingKey {
        BindingKey {
            identity: self.identity,
            modifiers: self.modifiers,
        }
    }
}

/// All bindings for the current session.
#[derive(Debug, Default, Clone)]
pub struct BindingTable {
    entries: HashMap<BindingKey, Binding>,
}

impl BindingTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a binding, replacing any earlier binding with the same key.
    /// Returns the shadowed binding, if any.
    pub fn insert(&mut self, binding: Binding) -> Option<Binding> {
        self.entries.insert(binding.key(), binding)
    }

    /// Exact-match lookup.
    pub fn get(&self, identity: ButtonIdentity, modifiers: ModifierMask) -> Option<&Binding> {
        self.entries.get(&BindingKey {
            identity,
            modifiers,
        })
    }

    /// Number of bindings in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no bindings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all bindings, unordered.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.entries.values()
    }
}
