//! The packaging seam: compress a staged directory into one archive.
//!
//! [`ZipPackager`] shells out to the system `zip` binary. Tests substitute
//! their own [`Packager`] so builds run without any external tool.

use std::path::Path;

use async_trait::async_trait;

/// Default archive tool binary.
pub const DEFAULT_ZIP_BIN: &str = "zip";

/// Error type for packaging operations.
#[derive(Debug, thiserror::Error)]
pub enum PackagerError {
    #[error("Packager binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("Packager execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Compresses a directory's contents into a single archive file.
#[async_trait]
pub trait Packager: Send + Sync {
    /// Package everything under `dir` into an archive at `archive_path`.
    ///
    /// `archive_path` may live inside `dir`; implementations must not
    /// recurse into the archive they are writing.
    async fn pack(&self, dir: &Path, archive_path: &Path) -> Result<(), PackagerError>;
}

/// [`Packager`] backed by the system `zip` binary.
pub struct ZipPackager {
    bin: String,
}

impl ZipPackager {
    /// Use a specific `zip` binary (name or path).
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

impl Default for ZipPackager {
    fn default() -> Self {
        Self::new(DEFAULT_ZIP_BIN)
    }
}

#[async_trait]
impl Packager for ZipPackager {
    async fn pack(&self, dir: &Path, archive_path: &Path) -> Result<(), PackagerError> {
        // `zip -r <archive> .` from inside the staging directory; zip
        // itself skips the archive file it is writing.
        let output = tokio::process::Command::new(&self.bin)
            .arg("-r")
            .arg("-q")
            .arg(archive_path)
            .arg(".")
            .current_dir(dir)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PackagerError::NotFound(e)
                } else {
                    PackagerError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(PackagerError::ExecutionFailed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_classified_as_not_found() {
        let packager = ZipPackager::new("definitely-not-a-zip-binary");
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("out.zip");

        let err = packager.pack(dir.path(), &archive).await.unwrap_err();
        assert!(matches!(err, PackagerError::NotFound(_)), "got {err:?}");
    }

    #[test]
    fn execution_failed_display_carries_stderr() {
        let err = PackagerError::ExecutionFailed {
            exit_code: Some(12),
            stderr: "nothing to do".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("nothing to do"));
    }
}
