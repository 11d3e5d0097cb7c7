//! Engine Lifecycle
//!
//! Orchestrates the full subsystem: builds the binding table from the
//! resolved binding file, installs the platform hook, routes hook callbacks
//! through the dispatcher, and tears everything down in the required order
//! (uninstall hook, then discard the table, then release action handles).
//!
//! The binding table is read-only while a hook is live. A vehicle change
//! rebuilds it wholesale inside a full uninstall/install cycle so the hook
//! never fires against a table under construction.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::actions::ActionRegistry;
use crate::bindings::source::{load_bindings, HostPaths};
use crate::bindings::BindingTable;
use crate::config::Settings;
use crate::error::Result;
use crate::input::dispatcher;
use crate::platform::{default_event_source, EventSink, PlatformEventSource};

/// Vehicle index denoting the user's own vehicle in host load
/// notifications.
pub const USER_VEHICLE_INDEX: i32 = 0;

/// Host query for the currently loaded vehicle's data file path.
pub type VehicleQuery = Box<dyn Fn() -> Option<PathBuf> + Send + Sync>;

/// State shared with the platform hook's callback.
struct Shared<R: ActionRegistry> {
    table: BindingTable,
    registry: R,
}

/// The input-interception and command-rebinding engine.
///
/// Owns the binding table, the injected host action registry and the
/// platform event source. Dropping an enabled engine disables it first, so
/// the OS hook is released on every exit path.
pub struct Engine<R: ActionRegistry + 'static> {
    shared: Arc<RwLock<Shared<R>>>,
    source: Box<dyn PlatformEventSource>,
    vehicle_query: VehicleQuery,
    plugin_dir: PathBuf,
    settings: Settings,
    enabled: bool,
}

impl<R: ActionRegistry + 'static> Engine<R> {
    /// Create a disabled engine with an explicit event source.
    pub fn new(
        registry: R,
        source: Box<dyn PlatformEventSource>,
        plugin_dir: PathBuf,
        vehicle_query: VehicleQuery,
        settings: Settings,
    ) -> Self {
        Self {
            shared: Arc::new(RwLock::new(Shared {
                table: BindingTable::new(),
                registry,
            })),
            source,
            vehicle_query,
            plugin_dir,
            settings,
            enabled: false,
        }
    }

    /// Create a disabled engine with the backend for the current platform.
    pub fn with_default_source(
        registry: R,
        plugin_dir: PathBuf,
        vehicle_query: VehicleQuery,
        settings: Settings,
    ) -> Self {
        Self::new(
            registry,
            default_event_source(),
            plugin_dir,
            vehicle_query,
            settings,
        )
    }

    /// Enable the engine: parse bindings and install the platform hook.
    ///
    /// A hook install failure is not fatal; the engine stays enabled with
    /// rebinding inactive and every native event reaching the host
    /// untouched.
    pub fn enable(&mut self) -> Result<()> {
        if self.enabled {
            warn!("engine already enabled");
            return Ok(());
        }

        self.rebuild_table();
        if let Err(err) = self.install_hook() {
            warn!("could not install {} event source: {}", self.source.name(), err);
        }
        self.enabled = true;
        Ok(())
    }

    /// Disable the engine: uninstall the hook, then discard the table.
    ///
    /// The ordering matters: the hook must be gone before the table (and
    /// with it the action handles) is torn down, so a late callback can
    /// never fire against destroyed state.
    pub fn disable(&mut self) {
        if !self.enabled {
            return;
        }
        if let Err(err) = self.source.uninstall() {
            warn!("could not uninstall {} event source: {}", self.source.name(), err);
        }
        self.shared.write().table = BindingTable::new();
        self.enabled = false;
        debug!("engine disabled");
    }

    /// Host notification that a vehicle finished loading. Only the user's
    /// own vehicle triggers a re-parse; the table swap happens inside a
    /// full hook uninstall/install cycle.
    pub fn vehicle_loaded(&mut self, index: i32) {
        if index != USER_VEHICLE_INDEX || !self.enabled {
            return;
        }

        let was_installed = self.source.is_installed();
        if was_installed {
            if let Err(err) = self.source.uninstall() {
                warn!(
                    "could not uninstall {} event source: {}",
                    self.source.name(),
                    err
                );
                return;
            }
        }
        self.rebuild_table();
        if was_installed {
            if let Err(err) = self.install_hook() {
                warn!(
                    "could not reinstall {} event source: {}",
                    self.source.name(),
                    err
                );
            }
        }
    }

    /// Whether the engine is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the OS hook is currently live.
    pub fn is_hook_installed(&self) -> bool {
        self.source.is_installed()
    }

    /// Number of bindings in the current table.
    pub fn binding_count(&self) -> usize {
        self.shared.read().table.len()
    }

    fn rebuild_table(&mut self) {
        let paths = HostPaths {
            plugin_dir: self.plugin_dir.clone(),
            vehicle_file: (self.vehicle_query)(),
        };
        let mut shared = self.shared.write();
        let table = load_bindings(&paths, &self.settings.bindings, &mut shared.registry);
        shared.table = table;
    }

    fn install_hook(&mut self) -> Result<()> {
        let shared = Arc::clone(&self.shared);
        let sink: EventSink = Arc::new(move |event| {
            // Re-entrant read: a host action may synchronously pump another
            // input event back through the hook. The table is only written
            // while the hook is uninstalled, so readers never starve a
            // writer here.
            let shared = shared.read_recursive();
            dispatcher::dispatch_event(&shared.table, &shared.registry, event)
        });
        self.source.install(sink)?;
        info!("{} event source installed", self.source.name());
        Ok(())
    }
}

impl<R: ActionRegistry + 'static> Drop for Engine<R> {
    fn drop(&mut self) {
        self.disable();
    }
}
