//! Binding File Resolution
//!
//! Two-tier source search: a profile named after the currently loaded
//! vehicle (its data file with the extension swapped to the binding-file
//! extension, colocated with the vehicle), else a fixed-name fallback file
//! in the plugin's installation directory. Neither file existing is not an
//! error; it simply means zero bindings.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::actions::ActionRegistry;
use crate::bindings::parser::{self, ParseOutcome};
use crate::bindings::BindingTable;
use crate::config::BindingSettings;

/// Paths supplied by the host at lifecycle time.
#[derive(Debug, Clone, Default)]
pub struct HostPaths {
    /// The plugin's installation directory (fallback-file location)
    pub plugin_dir: PathBuf,
    /// Data file of the currently loaded vehicle, if any
    pub vehicle_file: Option<PathBuf>,
}

/// Pick the binding file to load, probing the vehicle-specific profile
/// first and the plugin-directory fallback second.
pub fn resolve_binding_file(paths: &HostPaths, settings: &BindingSettings) -> Option<PathBuf> {
    if let Some(vehicle_file) = &paths.vehicle_file {
        let profile = vehicle_file.with_extension(&settings.extension);
        if profile.is_file() {
            debug!("using aircraft binding profile '{}'", profile.display());
            return Some(profile);
        }
        info!(
            "could not load mouse bindings for aircraft from '{}'",
            profile.display()
        );
    }

    let fallback = paths.plugin_dir.join(&settings.fallback_file);
    if fallback.is_file() {
        debug!("using fallback binding profile '{}'", fallback.display());
        return Some(fallback);
    }
    info!("could not load mouse bindings from '{}'", fallback.display());
    None
}

/// Resolve, read and parse the binding file for the current vehicle.
///
/// Missing files and unreadable files both degrade to an empty table;
/// per-line problems are logged and parsing continues.
pub fn load_bindings<R: ActionRegistry + ?Sized>(
    paths: &HostPaths,
    settings: &BindingSettings,
    registry: &mut R,
) -> BindingTable {
    let Some(path) = resolve_binding_file(paths, settings) else {
        return BindingTable::new();
    };
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            warn!("could not read '{}': {}", path.display(), err);
            return BindingTable::new();
        }
    };

    let ParseOutcome { table, diagnostics } = parser::parse(&text, registry);
    for diagnostic in &diagnostics {
        warn!(
            "{}:{}: {}",
            file_name(&path),
            diagnostic.line,
            diagnostic.message
        );
    }
    info!("loaded {} mouse bindings", table.len());
    table
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionHandle;
    use std::fs;

    struct NullRegistry;

    impl ActionRegistry for NullRegistry {
        fn lookup(&self, _name: &str) -> Option<ActionHandle> {
            None
        }
        fn create(&mut self, _name: &str, _description: &str) -> ActionHandle {
            ActionHandle::from_raw(1)
        }
        fn begin(&self, _action: ActionHandle) {}
        fn end(&self, _action: ActionHandle) {}
    }

    #[test]
    fn test_vehicle_profile_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let vehicle = dir.path().join("Cessna_172.acf");
        fs::write(&vehicle, "").unwrap();
        fs::write(dir.path().join("Cessna_172.prf"), "").unwrap();
        fs::write(dir.path().join("mouse.prf"), "").unwrap();

        let paths = HostPaths {
            plugin_dir: dir.path().to_path_buf(),
            vehicle_file: Some(vehicle),
        };
        let resolved = resolve_binding_file(&paths, &BindingSettings::default()).unwrap();
        assert_eq!(resolved.file_name().unwrap(), "Cessna_172.prf");
    }

    #[test]
    fn test_fallback_when_vehicle_profile_absent() {
        let dir = tempfile::tempdir().unwrap();
        let vehicle = dir.path().join("Cessna_172.acf");
        fs::write(dir.path().join("mouse.prf"), "").unwrap();

        let paths = HostPaths {
            plugin_dir: dir.path().to_path_buf(),
            vehicle_file: Some(vehicle),
        };
        let resolved = resolve_binding_file(&paths, &BindingSettings::default()).unwrap();
        assert_eq!(resolved.file_name().unwrap(), "mouse.prf");
    }

    #[test]
    fn test_no_file_at_either_tier() {
        let dir = tempfile::tempdir().unwrap();
        let paths = HostPaths {
            plugin_dir: dir.path().to_path_buf(),
            vehicle_file: Some(dir.path().join("Cessna_172.acf")),
        };
        assert!(resolve_binding_file(&paths, &BindingSettings::default()).is_none());

        let table = load_bindings(&paths, &BindingSettings::default(), &mut NullRegistry);
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_bindings_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("mouse.prf"),
            "I\n1005 Version\nMouse-Right CTRL Gear/Toggle\n",
        )
        .unwrap();

        let paths = HostPaths {
            plugin_dir: dir.path().to_path_buf(),
            vehicle_file: None,
        };
        let table = load_bindings(&paths, &BindingSettings::default(), &mut NullRegistry);
        assert_eq!(table.len(), 1);
    }
}
