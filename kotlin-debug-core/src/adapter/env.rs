//! Environment assembly for the adapter process.
//!
//! The adapter is launched with a copy of the current process environment,
//! plus `JAVA_HOME` when a Java runtime was located.

use std::collections::HashMap;
use tracing::debug;

/// Environment handed to the adapter process.
pub type EnvironmentMap = HashMap<String, String>;

/// Key the runtime home directory is published under.
pub const JAVA_HOME_KEY: &str = "JAVA_HOME";

/// Snapshots the current process environment.
///
/// Entries whose name or value is not valid UTF-8 are skipped.
pub fn ambient_environment() -> EnvironmentMap {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Builds the adapter environment from an ambient snapshot.
///
/// Every ambient entry is kept. A non-empty `runtime_home` is written under
/// [`JAVA_HOME_KEY`], replacing any ambient value.
pub fn build_environment(ambient: &EnvironmentMap, runtime_home: Option<&str>) -> EnvironmentMap {
    let mut env = ambient.clone();

    if let Some(home) = runtime_home.filter(|home| !home.is_empty()) {
        debug!(java_home = %home, "Injecting runtime home into adapter environment");
        env.insert(JAVA_HOME_KEY.to_string(), home.to_string());
    }

    env
}
