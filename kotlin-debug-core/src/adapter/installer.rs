//! Managed installation of the debug adapter.
//!
//! [`Installer`] is the boundary the provisioner depends on; it only cares
//! whether installation succeeded. [`ReleaseInstaller`] is the concrete
//! implementation that downloads and unpacks a pinned GitHub release,
//! skipping the download when that version is already in place.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::catalog::kotlin_debug_adapter;
use super::fetch::{fetch_release, FetchError};
use super::manifest::{load_manifest, save_manifest};
use super::paths;
use super::status::StatusReporter;
use super::types::{AdapterRelease, OsFamily};
use super::unpack::{mark_executable, unpack_adapter, UnpackError};

/// Errors raised while installing the adapter.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Release asset {0} is not a zip archive")]
    UnsupportedArchive(&'static str),
    #[error("Download failed: {0}")]
    Download(#[from] FetchError),
    #[error("Unpacking failed: {0}")]
    Unpack(#[from] UnpackError),
    #[error("Start script missing after unpacking: {}", .0.display())]
    MissingScript(PathBuf),
    #[error("Manifest error: {0}")]
    Manifest(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Mechanism that makes the adapter available inside a target directory.
#[async_trait]
pub trait Installer: Send + Sync {
    /// Installs (or confirms) the adapter under `target_dir`.
    async fn ensure_installed(
        &self,
        target_dir: &Path,
        status: &dyn StatusReporter,
    ) -> Result<(), InstallError>;
}

#[async_trait]
impl<T: Installer + ?Sized> Installer for Arc<T> {
    async fn ensure_installed(
        &self,
        target_dir: &Path,
        status: &dyn StatusReporter,
    ) -> Result<(), InstallError> {
        (**self).ensure_installed(target_dir, status).await
    }
}

// ============================================================================
// Release Installer
// ============================================================================

/// Installs a pinned adapter release from its download URL.
#[derive(Debug, Clone)]
pub struct ReleaseInstaller {
    release: AdapterRelease,
    family: OsFamily,
}

impl Default for ReleaseInstaller {
    fn default() -> Self {
        Self::new(*kotlin_debug_adapter())
    }
}

impl ReleaseInstaller {
    /// Creates an installer for a release on the host OS family.
    pub fn new(release: AdapterRelease) -> Self {
        Self {
            release,
            family: OsFamily::current(),
        }
    }

    /// Overrides the OS family used to locate the start script.
    pub fn with_os_family(mut self, family: OsFamily) -> Self {
        self.family = family;
        self
    }

    /// Returns the release this installer provides.
    pub fn release(&self) -> &AdapterRelease {
        &self.release
    }

    /// Checks whether the pinned version is already unpacked in `target_dir`.
    pub fn is_up_to_date(&self, target_dir: &Path) -> bool {
        let manifest = match load_manifest(&paths::manifest_path(target_dir)) {
            Ok(manifest) => manifest,
            Err(e) => {
                debug!("Could not read install manifest: {:#}", e);
                return false;
            }
        };

        let script =
            paths::start_script_path(target_dir, self.release.script_base_name, self.family);
        manifest.is_installed(self.release.version) && script.exists()
    }

    /// Removes the unpacked adapter and its manifest record.
    pub async fn uninstall(&self, target_dir: &Path) -> Result<(), InstallError> {
        let adapter_dir = paths::adapter_dir(target_dir);
        info!("Uninstalling {}", self.release.display_name);

        if adapter_dir.exists() {
            tokio::fs::remove_dir_all(&adapter_dir).await?;
        }

        let manifest_path = paths::manifest_path(target_dir);
        let mut manifest =
            load_manifest(&manifest_path).map_err(|e| InstallError::Manifest(format!("{e:#}")))?;
        manifest.mark_uninstalled();
        save_manifest(&manifest, &manifest_path)
            .map_err(|e| InstallError::Manifest(format!("{e:#}")))?;

        Ok(())
    }
}

#[async_trait]
impl Installer for ReleaseInstaller {
    async fn ensure_installed(
        &self,
        target_dir: &Path,
        status: &dyn StatusReporter,
    ) -> Result<(), InstallError> {
        let release = &self.release;

        if self.is_up_to_date(target_dir) {
            debug!(
                "{} v{} already installed in {}",
                release.display_name,
                release.version,
                target_dir.display()
            );
            status.update(&format!("{} is up to date", release.display_name));
            return Ok(());
        }

        if !release.is_zip() {
            return Err(InstallError::UnsupportedArchive(release.asset_name));
        }

        info!(
            "Installing {} v{} from {}",
            release.display_name, release.version, release.url
        );
        status.update(&format!(
            "Downloading {} v{}...",
            release.display_name, release.version
        ));

        tokio::fs::create_dir_all(target_dir).await?;

        // Clean up any previous partial install
        let adapter_dir = paths::adapter_dir(target_dir);
        if adapter_dir.exists() {
            tokio::fs::remove_dir_all(&adapter_dir).await?;
        }

        let archive_path = target_dir.join(release.asset_name);
        let bytes_downloaded = fetch_release(release, &archive_path, status).await?;

        status.update(&format!("Unpacking {}...", release.display_name));
        let unpacked = unpack_adapter(&archive_path, target_dir);

        if let Err(e) = tokio::fs::remove_file(&archive_path).await {
            warn!("Failed to clean up archive: {}", e);
        }
        unpacked?;

        let script = paths::start_script_path(target_dir, release.script_base_name, self.family);
        if !script.exists() {
            return Err(InstallError::MissingScript(script));
        }
        if let Err(e) = mark_executable(&script) {
            warn!("Failed to mark {} executable: {}", script.display(), e);
        }

        let manifest_path = paths::manifest_path(target_dir);
        let mut manifest =
            load_manifest(&manifest_path).map_err(|e| InstallError::Manifest(format!("{e:#}")))?;
        manifest.mark_installed(release.version.to_string(), bytes_downloaded);
        save_manifest(&manifest, &manifest_path)
            .map_err(|e| InstallError::Manifest(format!("{e:#}")))?;

        info!(
            "{} v{} installed successfully",
            release.display_name, release.version
        );
        Ok(())
    }
}
