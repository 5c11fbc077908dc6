//! Core types for debug adapter provisioning.
//!
//! This module defines the foundational types shared by the installer and the
//! provisioner: the host OS family and the static description of a managed
//! adapter release.

use serde::{Deserialize, Serialize};

// ============================================================================
// OS Family
// ============================================================================

/// Operating system family, as far as launching a start script is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    /// Executables are marked runnable via a permission bit (Linux, macOS, BSDs).
    Posix,
    /// Executables are recognized by their filename suffix.
    Windows,
}

impl OsFamily {
    /// Detects the family of the host at compile time.
    pub fn current() -> Self {
        #[cfg(windows)]
        {
            Self::Windows
        }
        #[cfg(not(windows))]
        {
            Self::Posix
        }
    }

    /// Returns true if executables need their permission bit set.
    pub fn is_posix(&self) -> bool {
        matches!(self, Self::Posix)
    }

    /// Conventional suffix appended to start scripts on this family.
    pub fn script_suffix(&self) -> &'static str {
        match self {
            Self::Posix => "",
            Self::Windows => ".bat",
        }
    }
}

impl Default for OsFamily {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// Adapter Release
// ============================================================================

/// Static description of a managed debug adapter release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterRelease {
    /// Human-readable display name, used in status and warning messages.
    pub display_name: &'static str,
    /// Base name of the start script inside `adapter/bin/`.
    pub script_base_name: &'static str,
    /// Release asset file name.
    pub asset_name: &'static str,
    /// Pinned version string.
    pub version: &'static str,
    /// Download URL of the release asset.
    pub url: &'static str,
    /// Expected SHA256 hash (lowercase hex), or None to skip verification.
    pub sha256: Option<&'static str>,
}

impl AdapterRelease {
    /// Returns true if the asset is a zip archive, the only format unpacked.
    pub fn is_zip(&self) -> bool {
        self.asset_name.to_ascii_lowercase().ends_with(".zip")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_family_current() {
        #[cfg(windows)]
        assert_eq!(OsFamily::current(), OsFamily::Windows);
        #[cfg(not(windows))]
        assert_eq!(OsFamily::current(), OsFamily::Posix);
    }

    #[test]
    fn test_script_suffix() {
        assert_eq!(OsFamily::Posix.script_suffix(), "");
        assert_eq!(OsFamily::Windows.script_suffix(), ".bat");
        assert!(OsFamily::Posix.is_posix());
        assert!(!OsFamily::Windows.is_posix());
    }

    #[test]
    fn test_release_is_zip() {
        let release = AdapterRelease {
            display_name: "Test Adapter",
            script_base_name: "test-adapter",
            asset_name: "adapter.zip",
            version: "1.0.0",
            url: "https://github.com/example/test-adapter/releases/download/1.0.0/adapter.zip",
            sha256: None,
        };
        assert!(release.is_zip());
        assert!(AdapterRelease {
            asset_name: "ADAPTER.ZIP",
            ..release
        }
        .is_zip());
        assert!(!AdapterRelease {
            asset_name: "adapter.tar.gz",
            ..release
        }
        .is_zip());
    }
}
