//! Path layout for the managed debug adapter.
//!
//! All state lives under a storage directory owned by the host:
//!
//! - `{storage}/settings.json`: operator settings
//! - `{storage}/debugAdapterInstall/`: managed install root
//! - `{storage}/debugAdapterInstall/manifest.json`: installed version record
//! - `{storage}/debugAdapterInstall/adapter/bin/<script>`: start script
//!
//! The default storage directory is `~/.local/share/kotlin-debug/` (or the
//! platform equivalent).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::catalog::INSTALL_DIR_NAME;
use super::types::OsFamily;

/// Subdirectory name under the platform data directory.
const STORAGE_DIR_NAME: &str = "kotlin-debug";

const SETTINGS_FILE: &str = "settings.json";
const MANIFEST_FILE: &str = "manifest.json";

// ============================================================================
// Path Resolution
// ============================================================================

/// Returns the default storage directory.
///
/// e.g., `~/.local/share/kotlin-debug/` on Linux
pub fn default_storage_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local/share")))
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

    Ok(data_dir.join(STORAGE_DIR_NAME))
}

/// Returns the settings file path.
///
/// Path: `{storage}/settings.json`
pub fn settings_path(storage_dir: &Path) -> PathBuf {
    storage_dir.join(SETTINGS_FILE)
}

/// Returns the managed install root.
///
/// Path: `{storage}/debugAdapterInstall/`
pub fn install_dir(storage_dir: &Path) -> PathBuf {
    storage_dir.join(INSTALL_DIR_NAME)
}

/// Returns the manifest path inside an install root.
pub fn manifest_path(install_dir: &Path) -> PathBuf {
    install_dir.join(MANIFEST_FILE)
}

/// Returns the unpacked adapter tree inside an install root.
pub fn adapter_dir(install_dir: &Path) -> PathBuf {
    install_dir.join("adapter")
}

/// Appends the platform-conventional script suffix to a base name.
///
/// `kotlin-debug-adapter` stays as is on POSIX and becomes
/// `kotlin-debug-adapter.bat` on Windows.
pub fn correct_script_name(base_name: &str, family: OsFamily) -> String {
    format!("{}{}", base_name, family.script_suffix())
}

/// Returns the start script path inside an install root.
///
/// Path: `{install}/adapter/bin/{script}`
pub fn start_script_path(install_dir: &Path, base_name: &str, family: OsFamily) -> PathBuf {
    adapter_dir(install_dir)
        .join("bin")
        .join(correct_script_name(base_name, family))
}

/// Ensures the storage directory and the install root exist.
///
/// # Errors
///
/// Returns an error if any directory cannot be created (e.g., permission issues).
pub fn ensure_dirs_exist(storage_dir: &Path) -> Result<()> {
    let dirs = [storage_dir.to_path_buf(), install_dir(storage_dir)];

    for dir in dirs {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    Ok(())
}
