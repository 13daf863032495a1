use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Filesystem storage rooted at the report output directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute paths are used as-is, relative ones resolve under the root.
    fn resolve(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(self.resolve(path)).await?)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read_under_root() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("nested/report.zip", b"PK").await.unwrap();
        assert!(temp_dir.path().join("nested/report.zip").exists());
        assert_eq!(storage.read_file("nested/report.zip").await.unwrap(), b"PK");
    }

    #[tokio::test]
    async fn test_absolute_path_bypasses_root() {
        let root = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let logo = elsewhere.path().join("logo.png");
        std::fs::write(&logo, b"img").unwrap();

        let storage = LocalStorage::new(root.path());
        let bytes = storage.read_file(logo.to_str().unwrap()).await.unwrap();
        assert_eq!(bytes, b"img");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let root = TempDir::new().unwrap();
        let storage = LocalStorage::new(root.path());
        assert!(storage.read_file("absent.png").await.is_err());
    }
}
