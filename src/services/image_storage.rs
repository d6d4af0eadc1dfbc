use std::path::{Path, PathBuf};

use tokio::fs;

/// Flat directory holding uploaded product images.
#[derive(Debug, Clone)]
pub struct ImageStorage {
    dir: PathBuf,
}

impl ImageStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// `<millis>_<original>`; uniqueness relies on the timestamp alone.
    pub fn storage_name(original_file_name: &str, millis: i64) -> String {
        format!("{}_{}", millis, original_file_name)
    }

    /// Writes `bytes` under `file_name`, creating the directory if needed and
    /// overwriting any file with the same name.
    pub async fn store(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(file_name);
        fs::write(&path, bytes).await?;

        tracing::debug!("Stored image {} ({} bytes)", path.display(), bytes.len());

        Ok(path)
    }

    pub async fn remove(&self, file_name: &str) -> std::io::Result<()> {
        let path = self.path_for(file_name);
        fs::remove_file(&path).await?;

        tracing::debug!("Removed image {}", path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_name_prefixes_timestamp() {
        assert_eq!(
            ImageStorage::storage_name("a.png", 1_700_000_000_123),
            "1700000000123_a.png"
        );
    }

    #[tokio::test]
    async fn store_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = ImageStorage::new(tmp.path().join("public").join("images"));

        let path = storage.store("1_a.png", b"PNGDATA").await.unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"PNGDATA");
    }

    #[tokio::test]
    async fn store_overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = ImageStorage::new(tmp.path());

        storage.store("1_a.png", b"first").await.unwrap();
        storage.store("1_a.png", b"second").await.unwrap();

        assert_eq!(std::fs::read(storage.path_for("1_a.png")).unwrap(), b"second");
    }

    #[tokio::test]
    async fn remove_reports_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = ImageStorage::new(tmp.path());

        let err = storage.remove("missing.png").await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn remove_deletes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = ImageStorage::new(tmp.path());
        storage.store("1_a.png", b"x").await.unwrap();

        storage.remove("1_a.png").await.unwrap();

        assert!(!storage.path_for("1_a.png").exists());
    }
}
