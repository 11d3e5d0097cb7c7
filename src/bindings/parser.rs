//! Binding File Parser
//!
//! Line-oriented text format: one binding per non-empty, non-comment line,
//! three whitespace-separated tokens:
//!
//! ```text
//! # identity          modifiers   action
//! Mouse-Right         CTRL+ALT    sim/flight_controls/landing_gear_toggle
//! Mouse-Wheel-Forward NONE        sim/view/zoom_in
//! ```
//!
//! Comment lines start with `#`. The modifier token is a `+`-joined list of
//! modifier names; the placeholder `NONE` means "no modifiers". Two literal
//! legacy header lines (`I` and `1005 Version`) from the historical profile
//! format are accepted and skipped before tokenizing.
//!
//! Malformed lines never abort the parse: they are skipped with a recorded
//! diagnostic. Unknown modifier tokens are skipped individually; the rest of
//! the mask is still honored.

use tracing::{debug, warn};

use crate::actions::{resolve_action, ActionRegistry};
use crate::bindings::{Binding, BindingTable};
use crate::input::modifiers::format_mask;
use crate::input::{ButtonIdentity, Modifier, ModifierMask};

/// Placeholder modifier token meaning "no modifiers".
pub const NO_MODIFIERS_TOKEN: &str = "NONE";

/// A recoverable problem found while parsing a binding file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// 1-based line number in the source text
    pub line: usize,
    /// Human-readable description
    pub message: String,
}

/// Result of parsing a binding source: the table plus any diagnostics.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    /// The constructed table
    pub table: BindingTable,
    /// Problems encountered; the parse still succeeded
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// Legacy header lines carried over from the historical profile format.
/// Tolerated verbatim, never validated.
fn is_legacy_header(line: &str) -> bool {
    line == "I" || line == "1005 Version"
}

/// Parse a `+`-joined modifier list. Unrecognized tokens are skipped with a
/// diagnostic; recognized ones still contribute to the mask.
fn parse_modifiers(token: &str, line: usize, diagnostics: &mut Vec<ParseDiagnostic>) -> ModifierMask {
    let mut mask = ModifierMask::empty();
    for part in token.split('+') {
        if part.is_empty() || part == NO_MODIFIERS_TOKEN {
            continue;
        }
        match Modifier::from_name(part) {
            Some(modifier) => mask |= modifier,
            None => diagnostics.push(ParseDiagnostic {
                line,
                message: format!("unknown modifier: {part}"),
            }),
        }
    }
    mask
}

/// Parse binding-file text into a table, resolving action names against the
/// host registry (creating actions on first reference).
pub fn parse<R: ActionRegistry + ?Sized>(input: &str, registry: &mut R) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for (index, raw_line) in input.lines().enumerate() {
        let number = index + 1;
        let line = raw_line.trim_end_matches('\r');
        if is_legacy_header(line) {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(identity_token) = tokens.next() else {
            continue;
        };
        if identity_token.starts_with('#') {
            continue;
        }

        let Some(identity) = ButtonIdentity::from_name(identity_token) else {
            warn!("unknown mouse button identifier: {identity_token}");
            outcome.diagnostics.push(ParseDiagnostic {
                line: number,
                message: format!("unknown mouse button identifier: {identity_token}"),
            });
            continue;
        };

        let (Some(modifier_token), Some(action_name)) = (tokens.next(), tokens.next()) else {
            outcome.diagnostics.push(ParseDiagnostic {
                line: number,
                message: "malformed binding line, expected 3 tokens".to_string(),
            });
            continue;
        };

        let modifiers = parse_modifiers(modifier_token, number, &mut outcome.diagnostics);
        let action = resolve_action(registry, action_name);

        debug!(
            "binding  identity = {} | mod = {:#04x} | cmd = {}",
            identity.name(),
            modifiers.bits(),
            action_name
        );
        outcome.table.insert(Binding {
            identity,
            modifiers,
            action,
            action_name: action_name.to_string(),
        });
    }

    outcome
}

/// Serialize a table back into the line format. Re-parsing the output yields
/// an equivalent table. Lines are emitted in identity-table order for a
/// stable result.
pub fn serialize(table: &BindingTable) -> String {
    let mut bindings: Vec<_> = table.iter().collect();
    bindings.sort_by_key(|binding| {
        let order = ButtonIdentity::ALL
            .iter()
            .position(|identity| *identity == binding.identity)
            .unwrap_or(usize::MAX);
        (order, binding.modifiers.bits())
    });

    let mut out = String::new();
    for binding in bindings {
        out.push_str(binding.identity.name());
        out.push('\t');
        out.push_str(&format_mask(binding.modifiers));
        out.push('\t');
        out.push_str(&binding.action_name);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionHandle;
    use std::collections::HashMap;

    /// Minimal in-memory host registry: hands out sequential handles.
    #[derive(Default)]
    struct FakeRegistry {
        known: HashMap<String, ActionHandle>,
        created: Vec<String>,
    }

    impl ActionRegistry for FakeRegistry {
        fn lookup(&self, name: &str) -> Option<ActionHandle> {
            self.known.get(name).copied()
        }

        fn create(&mut self, name: &str, _description: &str) -> ActionHandle {
            let handle = ActionHandle::from_raw(self.known.len() as u64 + 1);
            self.known.insert(name.to_string(), handle);
            self.created.push(name.to_string());
            handle
        }

        fn begin(&self, _action: ActionHandle) {}
        fn end(&self, _action: ActionHandle) {}
    }

    #[test]
    fn test_parse_single_binding() {
        let mut registry = FakeRegistry::default();
        let outcome = parse("Mouse-Right  CTRL+ALT  Gear/Toggle\n", &mut registry);

        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.table.len(), 1);
        let binding = outcome
            .table
            .get(ButtonIdentity::Right, Modifier::Ctrl | Modifier::Alt)
            .unwrap();
        assert_eq!(binding.action_name, "Gear/Toggle");
        assert_eq!(registry.created, vec!["Gear/Toggle"]);
    }

    #[test]
    fn test_parse_skips_comments_blanks_and_legacy_headers() {
        let input = "I\n1005 Version\n\n# a comment\nMouse-Middle NONE View/Reset\n";
        let mut registry = FakeRegistry::default();
        let outcome = parse(input, &mut registry);

        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.table.len(), 1);
        assert!(outcome
            .table
            .get(ButtonIdentity::Middle, ModifierMask::empty())
            .is_some());
    }

    #[test]
    fn test_unknown_identity_skips_line() {
        let input = "Mouse-Fourth NONE A\nMouse-Left NONE B\n";
        let mut registry = FakeRegistry::default();
        let outcome = parse(input, &mut registry);

        assert_eq!(outcome.table.len(), 1);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(outcome.diagnostics[0]
            .message
            .contains("unknown mouse button identifier"));
        assert_eq!(outcome.diagnostics[0].line, 1);
    }

    #[test]
    fn test_unknown_modifier_token_skipped_individually() {
        let input = "Mouse-Left CTRL+HYPER+SHIFT A\n";
        let mut registry = FakeRegistry::default();
        let outcome = parse(input, &mut registry);

        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(outcome.diagnostics[0].message.contains("HYPER"));
        // The recognized tokens still form the mask.
        assert!(outcome
            .table
            .get(ButtonIdentity::Left, Modifier::Ctrl | Modifier::Shift)
            .is_some());
    }

    #[test]
    fn test_malformed_line_records_diagnostic() {
        let input = "Mouse-Left CTRL\n";
        let mut registry = FakeRegistry::default();
        let outcome = parse(input, &mut registry);

        assert!(outcome.table.is_empty());
        assert_eq!(outcome.diagnostics.len(), 1);
    }

    #[test]
    fn test_duplicate_key_last_write_wins() {
        let input = "Mouse-Middle NONE A\nMouse-Middle NONE B\n";
        let mut registry = FakeRegistry::default();
        let outcome = parse(input, &mut registry);

        assert_eq!(outcome.table.len(), 1);
        assert_eq!(
            outcome
                .table
                .get(ButtonIdentity::Middle, ModifierMask::empty())
                .unwrap()
                .action_name,
            "B"
        );
    }

    #[test]
    fn test_existing_action_not_recreated() {
        let mut registry = FakeRegistry::default();
        registry
            .known
            .insert("sim/view/zoom_in".to_string(), ActionHandle::from_raw(99));

        let outcome = parse("Mouse-Wheel-Forward NONE sim/view/zoom_in\n", &mut registry);
        assert!(registry.created.is_empty());
        assert_eq!(
            outcome
                .table
                .get(ButtonIdentity::WheelForward, ModifierMask::empty())
                .unwrap()
                .action,
            ActionHandle::from_raw(99)
        );
    }

    #[test]
    fn test_crlf_input() {
        let input = "I\r\nMouse-Left NONE A\r\n";
        let mut registry = FakeRegistry::default();
        let outcome = parse(input, &mut registry);
        assert_eq!(outcome.table.len(), 1);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_serialize_round_trip() {
        let input = "Mouse-Right CTRL+ALT Gear/Toggle\nMouse-Wheel-Forward NONE View/ZoomIn\nMouse-Backward SHIFT+RMB View/Back\n";
        let mut registry = FakeRegistry::default();
        let first = parse(input, &mut registry);

        let text = serialize(&first.table);
        let second = parse(&text, &mut registry);

        assert!(second.diagnostics.is_empty());
        assert_eq!(first.table.len(), second.table.len());
        for binding in first.table.iter() {
            let other = second
                .table
                .get(binding.identity, binding.modifiers)
                .unwrap();
            assert_eq!(other.action_name, binding.action_name);
        }
    }

    #[test]
    fn test_reparse_is_idempotent() {
        let input = "Mouse-Left CTRL A\nMouse-Left CTRL B\n";
        let mut registry = FakeRegistry::default();
        let first = parse(input, &mut registry);
        let second = parse(input, &mut registry);

        assert_eq!(first.table.len(), second.table.len());
        assert_eq!(
            first
                .table
                .get(ButtonIdentity::Left, Modifier::Ctrl.into())
                .unwrap()
                .action_name,
            second
                .table
                .get(ButtonIdentity::Left, Modifier::Ctrl.into())
                .unwrap()
                .action_name,
        );
    }
}
