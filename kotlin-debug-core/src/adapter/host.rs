//! Registration of the adapter with a debugging host.
//!
//! [`register_debug_adapter`] is the startup entry point: it provisions the
//! adapter, assembles its environment, and registers a [`DescriptorFactory`]
//! under the `kotlin` debug type. Nothing is registered when provisioning
//! fails, so no session can start against a missing adapter.

use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;
use tracing::{info, warn};

use super::catalog::DEBUG_TYPE;
use super::descriptor::{DescriptorFactory, SessionDescriptor};
use super::env::{ambient_environment, build_environment};
use super::installer::Installer;
use super::provisioner::{PermissionRepair, ProvisionError, Provisioner, SetupContext};

/// Host-side session launch subsystem.
pub trait DebugAdapterHost {
    /// Registers the producer of launch descriptors for a debug type.
    fn register_descriptor_factory(&self, debug_type: &str, factory: DescriptorFactory);
}

/// Errors when starting a session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No debug adapter registered for type '{0}'")]
    NoAdapter(String),
}

// ============================================================================
// Session Registry
// ============================================================================

/// In-process host that keeps one factory per debug type.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    factories: RwLock<HashMap<String, DescriptorFactory>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a factory is registered for `debug_type`.
    pub fn is_registered(&self, debug_type: &str) -> bool {
        self.factories
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(debug_type)
    }

    /// Starts a session and returns the descriptor to launch it with.
    pub fn start_session(&self, debug_type: &str) -> Result<SessionDescriptor, SessionError> {
        let factories = self.factories.read().unwrap_or_else(|e| e.into_inner());
        factories
            .get(debug_type)
            .map(DescriptorFactory::create_descriptor)
            .ok_or_else(|| SessionError::NoAdapter(debug_type.to_string()))
    }
}

impl DebugAdapterHost for SessionRegistry {
    fn register_descriptor_factory(&self, debug_type: &str, factory: DescriptorFactory) {
        info!(
            debug_type,
            command = %factory.command().display(),
            "Registered debug adapter descriptor factory"
        );
        self.factories
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(debug_type.to_string(), factory);
    }
}

// ============================================================================
// Startup Registration
// ============================================================================

/// Provisions the adapter and registers its descriptor factory with `host`.
///
/// On failure a warning is surfaced through the context's status reporter,
/// nothing is registered, and the error is returned.
pub async fn register_debug_adapter<I, R, H>(
    ctx: &SetupContext,
    provisioner: &Provisioner<I, R>,
    host: &H,
) -> Result<(), ProvisionError>
where
    I: Installer,
    R: PermissionRepair,
    H: DebugAdapterHost + ?Sized,
{
    ctx.status()
        .update(&format!("Registering {}...", provisioner.display_name()));

    let executable = match provisioner.resolve(ctx).await {
        Ok(executable) => executable,
        Err(e) => {
            warn!(error = %e, "Debug adapter provisioning failed");
            ctx.status().warn(&e.to_string());
            return Err(e);
        }
    };

    let env = build_environment(&ambient_environment(), ctx.java().java_home.as_deref());
    host.register_descriptor_factory(DEBUG_TYPE, DescriptorFactory::new(executable, env));
    Ok(())
}
