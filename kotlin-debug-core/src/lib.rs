//! Kotlin Debug Core Library
//!
//! This crate prepares the Kotlin Debug Adapter for a debugging front-end.
//! It includes:
//!
//! - Managed download and installation of a pinned adapter release
//! - Operator override of the adapter path
//! - Java runtime discovery and adapter environment assembly
//! - A descriptor factory handing out launch descriptors per session
//! - Configuration management (settings file)

pub mod adapter;
pub mod config;

// Re-exports for convenience
pub use config::{DebugAdapterSettings, Settings};

pub use adapter::{
    register_debug_adapter, DebugAdapterHost, DescriptorFactory, ExecutablePath,
    JavaInstallation, LogStatus, ProvisionError, Provisioner, ReleaseInstaller,
    SessionDescriptor, SessionError, SessionRegistry, SetupContext, StatusReporter, DEBUG_TYPE,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
