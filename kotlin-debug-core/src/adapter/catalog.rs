//! Release catalog for the managed debug adapter.
//!
//! The adapter is published as a single platform-independent `adapter.zip`
//! on GitHub; the archive contains `adapter/bin/kotlin-debug-adapter` and its
//! `.bat` sibling for Windows.

use super::types::AdapterRelease;

/// Debug type the adapter is registered under with the host.
pub const DEBUG_TYPE: &str = "kotlin";

/// Name of the managed install directory inside the host storage directory.
pub const INSTALL_DIR_NAME: &str = "debugAdapterInstall";

const KDA_VERSION: &str = "0.4.4";

const KDA_RELEASE: AdapterRelease = AdapterRelease {
    display_name: "Kotlin Debug Adapter",
    script_base_name: "kotlin-debug-adapter",
    asset_name: "adapter.zip",
    version: KDA_VERSION,
    url: "https://github.com/fwcd/kotlin-debug-adapter/releases/download/0.4.4/adapter.zip",
    sha256: None,
};

/// Returns the pinned Kotlin Debug Adapter release.
pub fn kotlin_debug_adapter() -> &'static AdapterRelease {
    &KDA_RELEASE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_is_zip_on_github() {
        let release = kotlin_debug_adapter();
        assert!(release.is_zip());
        assert!(release.url.starts_with("https://github.com/"));
        assert!(release.url.contains(release.version));
        assert!(release.url.ends_with(release.asset_name));
    }

    #[test]
    fn test_script_base_name() {
        assert_eq!(kotlin_debug_adapter().script_base_name, "kotlin-debug-adapter");
    }
}
