//! Unpacking of the adapter zip into the install root.

use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Failure while unpacking the release zip.
#[derive(Debug, Error)]
pub enum UnpackError {
    #[error("Cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{path} is not a usable adapter zip: {source}")]
    Archive {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Unpacks the release zip into `install_root` and returns its entry count.
///
/// Entry names that would resolve outside `install_root` are refused by the
/// zip reader. Unix modes stored in the archive are applied to the files.
pub fn unpack_adapter(archive: &Path, install_root: &Path) -> Result<usize, UnpackError> {
    let path = archive.display().to_string();
    let file = File::open(archive).map_err(|source| UnpackError::Open {
        path: path.clone(),
        source,
    })?;

    let mut zip = zip::ZipArchive::new(file).map_err(|source| UnpackError::Archive {
        path: path.clone(),
        source,
    })?;
    let entries = zip.len();
    zip.extract(install_root)
        .map_err(|source| UnpackError::Archive { path, source })?;

    info!(entries, root = %install_root.display(), "Unpacked debug adapter");
    Ok(entries)
}

/// Sets every execute bit on `path`. Does nothing outside Unix.
pub fn mark_executable(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mode = std::fs::metadata(path)?.permissions().mode();
        if mode & 0o111 != 0o111 {
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode | 0o111))?;
            tracing::debug!(path = %path.display(), "Marked executable");
        }
    }
    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_adapter_zip(archive: &Path) {
        let mut zip = zip::ZipWriter::new(File::create(archive).unwrap());
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);

        zip.start_file("adapter/bin/kotlin-debug-adapter", options.unix_permissions(0o755))
            .unwrap();
        zip.write_all(b"#!/bin/sh\nexec java -jar adapter.jar\n").unwrap();
        zip.start_file("adapter/bin/kotlin-debug-adapter.bat", options)
            .unwrap();
        zip.write_all(b"@echo off\r\n").unwrap();
        zip.start_file("adapter/lib/adapter.jar", options).unwrap();
        zip.write_all(b"not really a jar").unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_unpack_adapter_layout() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("adapter.zip");
        let root = temp_dir.path().join("debugAdapterInstall");
        write_adapter_zip(&archive);

        let entries = unpack_adapter(&archive, &root).unwrap();

        assert_eq!(entries, 3);
        let script = root.join("adapter/bin/kotlin-debug-adapter");
        assert!(script.is_file());
        assert!(root.join("adapter/bin/kotlin-debug-adapter.bat").is_file());
        assert!(root.join("adapter/lib/adapter.jar").is_file());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&script).unwrap().permissions().mode();
            assert_ne!(mode & 0o111, 0);
        }
    }

    #[test]
    fn test_unpack_rejects_non_zip() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("adapter.zip");
        std::fs::write(&archive, b"<html>rate limited</html>").unwrap();

        let err = unpack_adapter(&archive, temp_dir.path()).unwrap_err();

        assert!(matches!(err, UnpackError::Archive { .. }));
        assert!(!temp_dir.path().join("adapter").exists());
    }

    #[test]
    fn test_unpack_missing_archive() {
        let temp_dir = TempDir::new().unwrap();
        let err = unpack_adapter(&temp_dir.path().join("adapter.zip"), temp_dir.path())
            .unwrap_err();
        assert!(matches!(err, UnpackError::Open { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_mark_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let script = temp_dir.path().join("kotlin-debug-adapter");
        std::fs::write(&script, b"#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o640)).unwrap();

        mark_executable(&script).unwrap();

        let mode = std::fs::metadata(&script).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o751);
    }

    #[cfg(unix)]
    #[test]
    fn test_mark_executable_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = mark_executable(&temp_dir.path().join("missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
