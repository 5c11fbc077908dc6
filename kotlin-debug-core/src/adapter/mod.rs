//! Kotlin Debug Adapter provisioning and session bridging.
//!
//! This module makes sure the debug adapter's start script exists and is
//! runnable, then registers a factory that hands the host a launch
//! descriptor (command, arguments, environment) for every debugging session.
//!
//! # Architecture
//!
//! - `types`: Core types (OsFamily, AdapterRelease)
//! - `catalog`: The pinned adapter release and the debug type name
//! - `paths`: Storage and install layout, platform script names
//! - `manifest`: JSON record of the installed version
//! - `fetch`: Allowlisted, checksummed streaming of the release asset
//! - `unpack`: Zip unpacking and executable bits
//! - `installer`: The install boundary and the release-based implementation
//! - `status`: Status and progress reporting
//! - `java`: Java runtime discovery
//! - `env`: Environment assembly for the adapter process
//! - `provisioner`: Override-or-install resolution of the start script
//! - `descriptor`: Per-session launch descriptors
//! - `host`: Host registration and the in-process session registry
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use kotlin_debug_core::adapter::*;
//!
//! let ctx = SetupContext::new(storage_dir, settings, Arc::new(LogStatus), java);
//! let provisioner = Provisioner::new(ReleaseInstaller::default());
//! let registry = SessionRegistry::new();
//!
//! register_debug_adapter(&ctx, &provisioner, &registry).await?;
//! let descriptor = registry.start_session(DEBUG_TYPE)?;
//! ```

pub mod catalog;
pub mod descriptor;
pub mod env;
pub mod fetch;
pub mod host;
pub mod installer;
pub mod java;
pub mod manifest;
pub mod paths;
pub mod provisioner;
pub mod status;
pub mod types;
pub mod unpack;

// Re-export commonly used types
pub use catalog::{kotlin_debug_adapter, DEBUG_TYPE, INSTALL_DIR_NAME};
pub use descriptor::{DescriptorFactory, SessionDescriptor};
pub use env::{ambient_environment, build_environment, EnvironmentMap, JAVA_HOME_KEY};
pub use fetch::{FetchError, FetchProgress};
pub use host::{register_debug_adapter, DebugAdapterHost, SessionError, SessionRegistry};
pub use installer::{InstallError, Installer, ReleaseInstaller};
pub use java::JavaInstallation;
pub use manifest::{InstallManifest, InstalledRelease};
pub use paths::{correct_script_name, default_storage_dir, start_script_path};
pub use provisioner::{
    ChmodRepair, ExecutablePath, PathOrigin, PermissionRepair, PermissionRepairError,
    ProvisionError, Provisioner, SetupContext,
};
pub use status::{LogStatus, StatusReporter};
pub use types::{AdapterRelease, OsFamily};
pub use unpack::UnpackError;
