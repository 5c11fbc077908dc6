//! Session descriptors for the debug adapter.
//!
//! A [`DescriptorFactory`] is built once provisioning has finished and hands
//! the same command and environment to every debugging session.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::env::EnvironmentMap;
use super::provisioner::ExecutablePath;

/// What the host needs to start the adapter for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionDescriptor {
    /// Start script to execute.
    pub command: PathBuf,
    /// Arguments passed to the start script. Always empty.
    pub args: Vec<String>,
    /// Full environment of the adapter process.
    pub env: EnvironmentMap,
}

/// Produces launch descriptors from a fixed command and environment.
#[derive(Debug, Clone)]
pub struct DescriptorFactory {
    command: PathBuf,
    env: Arc<EnvironmentMap>,
}

impl DescriptorFactory {
    pub fn new(executable: ExecutablePath, env: EnvironmentMap) -> Self {
        Self {
            command: executable.into_path_buf(),
            env: Arc::new(env),
        }
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    pub fn env(&self) -> &EnvironmentMap {
        &self.env
    }

    /// Returns a fresh descriptor for a new session.
    pub fn create_descriptor(&self) -> SessionDescriptor {
        SessionDescriptor {
            command: self.command.clone(),
            args: Vec::new(),
            env: self.env.as_ref().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::provisioner::PathOrigin;
    use std::collections::HashMap;

    fn factory() -> DescriptorFactory {
        let env = HashMap::from([
            ("PATH".to_string(), "/bin".to_string()),
            ("JAVA_HOME".to_string(), "/opt/rt".to_string()),
        ]);
        DescriptorFactory::new(
            ExecutablePath::new("/kda/adapter/bin/kotlin-debug-adapter", PathOrigin::Managed),
            env,
        )
    }

    #[test]
    fn test_descriptor_fields() {
        let descriptor = factory().create_descriptor();

        assert_eq!(
            descriptor.command,
            PathBuf::from("/kda/adapter/bin/kotlin-debug-adapter")
        );
        assert!(descriptor.args.is_empty());
        assert_eq!(descriptor.env["JAVA_HOME"], "/opt/rt");
        assert_eq!(descriptor.env.len(), 2);
    }

    #[test]
    fn test_descriptors_are_equal_across_calls() {
        let factory = factory();
        let first = factory.create_descriptor();

        for _ in 0..10 {
            assert_eq!(factory.create_descriptor(), first);
        }
    }

    #[test]
    fn test_concurrent_descriptors() {
        let factory = factory();
        let expected = factory.create_descriptor();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let factory = factory.clone();
                std::thread::spawn(move || factory.create_descriptor())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_descriptor_serializes() {
        let json = serde_json::to_value(factory().create_descriptor()).unwrap();
        assert_eq!(json["command"], "/kda/adapter/bin/kotlin-debug-adapter");
        assert_eq!(json["args"], serde_json::json!([]));
        assert_eq!(json["env"]["PATH"], "/bin");
    }
}
