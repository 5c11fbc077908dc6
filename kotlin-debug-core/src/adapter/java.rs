//! Java runtime discovery.
//!
//! The adapter start script runs on the JVM; when a runtime home is known it
//! is passed to the adapter as `JAVA_HOME`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::Settings;

/// Result of locating a Java runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JavaInstallation {
    /// Runtime home directory, if one was found.
    pub java_home: Option<String>,
}

impl JavaInstallation {
    /// Creates an installation with a known home directory.
    pub fn with_home(home: impl Into<String>) -> Self {
        Self {
            java_home: Some(home.into()),
        }
    }

    /// Locates a Java runtime for the current process.
    ///
    /// Lookup order: the `java_home` setting, the `JAVA_HOME` environment
    /// variable, then the first `java` executable on `PATH`.
    pub fn locate(settings: &Settings) -> Self {
        let env_home = std::env::var("JAVA_HOME").ok();
        let path_var = std::env::var_os("PATH");
        Self::locate_with(settings.java_home(), env_home.as_deref(), path_var.as_deref())
    }

    pub(crate) fn locate_with(
        configured: Option<&str>,
        env_home: Option<&str>,
        path_var: Option<&OsStr>,
    ) -> Self {
        if let Some(home) = configured.filter(|h| !h.is_empty()) {
            debug!(java_home = %home, "Using configured Java home");
            return Self::with_home(home);
        }

        if let Some(home) = env_home.filter(|h| !h.is_empty()) {
            debug!(java_home = %home, "Using JAVA_HOME from environment");
            return Self::with_home(home);
        }

        if let Some(home) = path_var.and_then(home_from_path) {
            debug!(java_home = %home.display(), "Derived Java home from PATH");
            return Self::with_home(home.to_string_lossy().into_owned());
        }

        debug!("No Java runtime found");
        Self::default()
    }
}

/// Finds the `java` executable on a PATH value and returns the directory
/// above its `bin/`.
fn home_from_path(path_var: &OsStr) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_default();
    let java = match which::which_in("java", Some(path_var), cwd) {
        Ok(java) => java,
        Err(e) => {
            debug!("No java executable on PATH: {}", e);
            return None;
        }
    };

    let java = java.canonicalize().unwrap_or(java);
    java.parent().and_then(Path::parent).map(Path::to_path_buf)
}
