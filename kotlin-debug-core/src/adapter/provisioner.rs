//! Resolution of a runnable adapter start script.
//!
//! The [`Provisioner`] honors an operator-supplied override path when one is
//! configured and otherwise runs the managed installer. On POSIX hosts it then
//! repairs the executable bit in the background.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::catalog::kotlin_debug_adapter;
use super::unpack::mark_executable;
use super::installer::{InstallError, Installer};
use super::java::JavaInstallation;
use super::paths;
use super::status::StatusReporter;
use super::types::OsFamily;
use crate::config::Settings;

// ============================================================================
// Errors
// ============================================================================

/// Fatal provisioning failure.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Could not update/download {tool}: {source}")]
    InstallFailed {
        tool: &'static str,
        #[source]
        source: InstallError,
    },
}

/// Best-effort executable-bit repair failed. Never fatal.
#[derive(Debug, Error)]
#[error("Failed to mark {} executable: {source}", path.display())]
pub struct PermissionRepairError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

// ============================================================================
// Executable Path
// ============================================================================

/// Where a resolved start script came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOrigin {
    /// Supplied by the operator, used verbatim.
    Override,
    /// Unpacked by the managed installer.
    Managed,
}

/// Resolved path to the adapter start script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutablePath {
    path: PathBuf,
    origin: PathOrigin,
}

impl ExecutablePath {
    pub fn new(path: impl Into<PathBuf>, origin: PathOrigin) -> Self {
        Self {
            path: path.into(),
            origin,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn origin(&self) -> PathOrigin {
        self.origin
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }
}

// ============================================================================
// Setup Context
// ============================================================================

/// Everything provisioning reads, fixed at startup.
#[derive(Clone)]
pub struct SetupContext {
    storage_dir: PathBuf,
    settings: Settings,
    status: Arc<dyn StatusReporter>,
    java: JavaInstallation,
}

impl SetupContext {
    pub fn new(
        storage_dir: impl Into<PathBuf>,
        settings: Settings,
        status: Arc<dyn StatusReporter>,
        java: JavaInstallation,
    ) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            settings,
            status,
            java,
        }
    }

    /// Root of the managed install: `{storage}/debugAdapterInstall`.
    pub fn install_root(&self) -> PathBuf {
        paths::install_dir(&self.storage_dir)
    }

    /// Non-empty operator override for the start script, if configured.
    pub fn configured_override(&self) -> Option<&str> {
        self.settings.debug_adapter_path()
    }

    pub fn status(&self) -> &dyn StatusReporter {
        self.status.as_ref()
    }

    pub fn java(&self) -> &JavaInstallation {
        &self.java
    }
}

impl std::fmt::Debug for SetupContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupContext")
            .field("storage_dir", &self.storage_dir)
            .field("settings", &self.settings)
            .field("java", &self.java)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Permission Repair
// ============================================================================

/// Marks a file executable.
pub trait PermissionRepair: Send + Sync + 'static {
    fn make_executable(&self, path: &Path) -> Result<(), PermissionRepairError>;
}

/// Sets the executable bits through the filesystem (`chmod +x`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ChmodRepair;

impl PermissionRepair for ChmodRepair {
    fn make_executable(&self, path: &Path) -> Result<(), PermissionRepairError> {
        mark_executable(path).map_err(|source| PermissionRepairError {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ============================================================================
// Provisioner
// ============================================================================

/// Produces the start script path, installing the adapter when needed.
pub struct Provisioner<I, R = ChmodRepair> {
    installer: I,
    repair: Arc<R>,
    family: OsFamily,
    script_base_name: &'static str,
    display_name: &'static str,
}

impl<I: Installer> Provisioner<I> {
    /// Creates a provisioner for the host OS family with `chmod` repair.
    pub fn new(installer: I) -> Self {
        let release = kotlin_debug_adapter();
        Self {
            installer,
            repair: Arc::new(ChmodRepair),
            family: OsFamily::current(),
            script_base_name: release.script_base_name,
            display_name: release.display_name,
        }
    }
}

impl<I: Installer, R: PermissionRepair> Provisioner<I, R> {
    /// Replaces the permission repair strategy.
    pub fn with_repair<R2: PermissionRepair>(self, repair: R2) -> Provisioner<I, R2> {
        Provisioner {
            installer: self.installer,
            repair: Arc::new(repair),
            family: self.family,
            script_base_name: self.script_base_name,
            display_name: self.display_name,
        }
    }

    /// Overrides the OS family used for the script name and repair decision.
    pub fn with_os_family(mut self, family: OsFamily) -> Self {
        self.family = family;
        self
    }

    pub fn os_family(&self) -> OsFamily {
        self.family
    }

    pub fn display_name(&self) -> &'static str {
        self.display_name
    }

    /// Resolves the start script.
    ///
    /// A configured override is returned verbatim without installing or
    /// checking it. Otherwise the installer runs once against the install
    /// root; its failure is fatal.
    pub async fn resolve(&self, ctx: &SetupContext) -> Result<ExecutablePath, ProvisionError> {
        let resolved = match ctx.configured_override() {
            Some(custom) => {
                info!(path = %custom, "Using configured debug adapter path");
                ExecutablePath::new(custom, PathOrigin::Override)
            }
            None => {
                let install_root = ctx.install_root();
                self.installer
                    .ensure_installed(&install_root, ctx.status())
                    .await
                    .map_err(|source| ProvisionError::InstallFailed {
                        tool: self.display_name,
                        source,
                    })?;

                let script =
                    paths::start_script_path(&install_root, self.script_base_name, self.family);
                debug!(path = %script.display(), "Using managed debug adapter");
                ExecutablePath::new(script, PathOrigin::Managed)
            }
        };

        if self.family.is_posix() {
            self.spawn_permission_repair(resolved.path().to_path_buf());
        }

        Ok(resolved)
    }

    /// Requests the executable bit without waiting for the outcome.
    ///
    /// Inside a Tokio runtime the repair runs on the blocking pool. Without
    /// one it runs inline before `resolve` returns.
    fn spawn_permission_repair(&self, path: PathBuf) {
        let repair = Arc::clone(&self.repair);
        let job = move || {
            if let Err(e) = repair.make_executable(&path) {
                warn!("{}", e);
            }
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(job);
            }
            Err(_) => {
                debug!("No Tokio runtime, repairing permissions inline");
                job();
            }
        }
    }
}
