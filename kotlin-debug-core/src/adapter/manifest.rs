//! Install manifest persistence.
//!
//! The manifest records which adapter version is unpacked in an install root,
//! so the installer can skip the download when the pinned version is already
//! present. It is stored at `{install}/manifest.json`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Current schema version for the manifest file.
const SCHEMA_VERSION: u32 = 1;

// ============================================================================
// Manifest Data Structures
// ============================================================================

/// Information about the installed release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledRelease {
    /// Installed version string.
    pub version: String,
    /// When the release was installed.
    pub installed_at: DateTime<Utc>,
    /// Size of the downloaded archive in bytes.
    pub size_bytes: u64,
}

/// Root structure for the install manifest file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallManifest {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    /// The installed release, if any.
    #[serde(default)]
    pub installed: Option<InstalledRelease>,
}

impl Default for InstallManifest {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            installed: None,
        }
    }
}

impl InstallManifest {
    /// Creates a new empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the given version is the one installed.
    pub fn is_installed(&self, version: &str) -> bool {
        self.installed
            .as_ref()
            .is_some_and(|info| info.version == version)
    }

    /// Returns the installed version, if any.
    pub fn installed_version(&self) -> Option<&str> {
        self.installed.as_ref().map(|info| info.version.as_str())
    }

    /// Records a release as installed, replacing any previous record.
    pub fn mark_installed(&mut self, version: String, size_bytes: u64) {
        self.installed = Some(InstalledRelease {
            version,
            installed_at: Utc::now(),
            size_bytes,
        });
    }

    /// Clears the installed record.
    pub fn mark_uninstalled(&mut self) {
        self.installed = None;
    }
}

// ============================================================================
// Manifest Persistence
// ============================================================================

/// Loads the manifest from a path.
///
/// If the manifest doesn't exist, returns a new empty manifest.
/// If the manifest exists but is corrupted, logs a warning and returns empty.
pub fn load_manifest(path: &Path) -> Result<InstallManifest> {
    if !path.exists() {
        debug!("Manifest not found at {}, creating new", path.display());
        return Ok(InstallManifest::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest from {}", path.display()))?;

    match serde_json::from_str::<InstallManifest>(&content) {
        Ok(mut manifest) => {
            if manifest.schema_version != SCHEMA_VERSION {
                info!(
                    "Manifest schema version {} differs from current {}, migrating",
                    manifest.schema_version, SCHEMA_VERSION
                );
                manifest.schema_version = SCHEMA_VERSION;
            }
            Ok(manifest)
        }
        Err(e) => {
            warn!(
                "Failed to parse manifest at {}: {}. Starting fresh.",
                path.display(),
                e
            );
            Ok(InstallManifest::new())
        }
    }
}

/// Saves the manifest to a path.
pub fn save_manifest(manifest: &InstallManifest, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create manifest directory: {}", parent.display())
        })?;
    }

    let content = serde_json::to_string_pretty(manifest).context("Failed to serialize manifest")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write manifest to {}", path.display()))?;

    debug!("Manifest saved to {}", path.display());
    Ok(())
}
