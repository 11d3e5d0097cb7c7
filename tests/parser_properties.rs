//! Property tests for the binding-file parser
//!
//! Generated binding tables survive a serialize → re-parse round trip, and
//! parsing is deterministic under duplicate keys.

use std::collections::HashMap;

use proptest::prelude::*;

use mousebind::bindings::parser::{parse, serialize};
use mousebind::{ActionHandle, ActionRegistry, ButtonIdentity, ModifierMask};

#[derive(Default)]
struct CountingRegistry {
    handles: HashMap<String, ActionHandle>,
}

impl ActionRegistry for CountingRegistry {
    fn lookup(&self, name: &str) -> Option<ActionHandle> {
        self.handles.get(name).copied()
    }

    fn create(&mut self, name: &str, _description: &str) -> ActionHandle {
        let handle = ActionHandle::from_raw(self.handles.len() as u64 + 1);
        self.handles.insert(name.to_string(), handle);
        handle
    }

    fn begin(&self, _action: ActionHandle) {}
    fn end(&self, _action: ActionHandle) {}
}

fn identity_strategy() -> impl Strategy<Value = ButtonIdentity> {
    prop::sample::select(ButtonIdentity::ALL.to_vec())
}

fn mask_strategy() -> impl Strategy<Value = ModifierMask> {
    // Any subset of the 8 modifier bits.
    any::<u8>().prop_map(|bits| ModifierMask::from_bits_truncate(bits))
}

fn action_name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_/]{0,30}"
}

fn line(identity: ButtonIdentity, mask: ModifierMask, action: &str) -> String {
    let mask_text = if mask.is_empty() {
        "NONE".to_string()
    } else {
        mask.iter()
            .map(|modifier| modifier.name().to_string())
            .collect::<Vec<_>>()
            .join("+")
    };
    format!("{}\t{}\t{}\n", identity.name(), mask_text, action)
}

proptest! {
    #[test]
    fn serialize_reparse_round_trip(
        entries in prop::collection::vec(
            (identity_strategy(), mask_strategy(), action_name_strategy()),
            0..32,
        )
    ) {
        let mut input = String::new();
        for (identity, mask, action) in &entries {
            input.push_str(&line(*identity, *mask, action));
        }

        let mut registry = CountingRegistry::default();
        let first = parse(&input, &mut registry);
        prop_assert!(first.diagnostics.is_empty());

        let text = serialize(&first.table);
        let second = parse(&text, &mut registry);
        prop_assert!(second.diagnostics.is_empty());

        prop_assert_eq!(first.table.len(), second.table.len());
        for binding in first.table.iter() {
            let other = second.table.get(binding.identity, binding.modifiers);
            prop_assert!(other.is_some());
            prop_assert_eq!(&other.unwrap().action_name, &binding.action_name);
        }
    }

    #[test]
    fn duplicate_keys_resolve_to_last_line(
        identity in identity_strategy(),
        mask in mask_strategy(),
        first_action in action_name_strategy(),
        second_action in action_name_strategy(),
    ) {
        let input = format!(
            "{}{}",
            line(identity, mask, &first_action),
            line(identity, mask, &second_action),
        );

        let mut registry = CountingRegistry::default();
        let outcome = parse(&input, &mut registry);

        prop_assert_eq!(outcome.table.len(), 1);
        prop_assert_eq!(
            &outcome.table.get(identity, mask).unwrap().action_name,
            &second_action
        );
    }

    #[test]
    fn comments_and_legacy_headers_never_bind(
        action in action_name_strategy(),
    ) {
        let input = format!("I\n1005 Version\n# {action}\n");
        let mut registry = CountingRegistry::default();
        let outcome = parse(&input, &mut registry);
        prop_assert!(outcome.table.is_empty());
        prop_assert!(outcome.diagnostics.is_empty());
    }
}
