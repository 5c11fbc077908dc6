//! Operator settings for debug adapter provisioning.
//!
//! Settings are persisted as JSON in the storage directory.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// Debug Adapter Settings
// =============================================================================

/// Settings under the `debug_adapter` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugAdapterSettings {
    /// Path to a pre-installed adapter start script.
    /// When set, managed installation is skipped entirely.
    #[serde(default)]
    pub path: Option<String>,
}

// =============================================================================
// Application Settings
// =============================================================================

/// Application settings - persisted as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Debug adapter options.
    #[serde(default)]
    pub debug_adapter: DebugAdapterSettings,

    /// Java home to launch the adapter with, overriding detection.
    #[serde(default)]
    pub java_home: Option<String>,
}

impl Settings {
    /// Load settings from a JSON file, using defaults for missing values.
    ///
    /// If the file doesn't exist or can't be parsed, returns defaults.
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to read settings, using defaults");
                }
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&json) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse settings, using defaults");
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        Ok(())
    }

    /// Returns the configured adapter path override, if set and non-empty.
    pub fn debug_adapter_path(&self) -> Option<&str> {
        self.debug_adapter
            .path
            .as_deref()
            .filter(|path| !path.is_empty())
    }

    /// Returns the configured Java home override, if set and non-empty.
    pub fn java_home(&self) -> Option<&str> {
        self.java_home.as_deref().filter(|home| !home.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.debug_adapter_path(), None);
        assert_eq!(settings.java_home(), None);
    }

    #[test]
    fn test_empty_override_is_absent() {
        let settings = Settings {
            debug_adapter: DebugAdapterSettings {
                path: Some(String::new()),
            },
            java_home: Some(String::new()),
        };
        assert_eq!(settings.debug_adapter_path(), None);
        assert_eq!(settings.java_home(), None);
    }

    #[test]
    fn test_settings_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("settings.json");

        let settings = Settings {
            debug_adapter: DebugAdapterSettings {
                path: Some("/opt/kda/bin/kotlin-debug-adapter".to_string()),
            },
            java_home: Some("/usr/lib/jvm/java-17".to_string()),
        };
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded, settings);
        assert_eq!(
            loaded.debug_adapter_path(),
            Some("/opt/kda/bin/kotlin-debug-adapter")
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load(&temp_dir.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_corrupted_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"java_home":"/opt/jdk"}"#).unwrap();
        assert_eq!(settings.java_home(), Some("/opt/jdk"));
        assert_eq!(settings.debug_adapter_path(), None);
    }
}
