use crate::domain::ports::Storage;
use crate::utils::error::{BlendError, Result};
use std::path::{Path, PathBuf};

/// Filesystem storage. Relative paths resolve against `base_path`, absolute paths are used as is.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

/// Sibling of `path` that receives the data before it is renamed into place.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.blend-tmp", name))
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        tokio::fs::read(&full_path)
            .await
            .map_err(|source| BlendError::InputFile {
                path: full_path.display().to_string(),
                source,
            })
    }

    /// Replaces the file in one rename, so a failed write leaves the previous
    /// content intact. Missing parent directories are created.
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);
        let output_error = |source| BlendError::OutputFile {
            path: full_path.display().to_string(),
            source,
        };

        if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(output_error)?;
        }

        let staging = staging_path(&full_path);
        let written = match tokio::fs::write(&staging, data).await {
            Ok(()) => tokio::fs::rename(&staging, &full_path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
                tracing::debug!("Could not remove {}: {}", staging.display(), cleanup);
            }
            return Err(output_error(e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_overwrites_previous_content() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("out.ods", b"first run, longer").await.unwrap();
        storage.write_file("out.ods", b"second").await.unwrap();

        assert_eq!(storage.read_file("out.ods").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_output() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        storage.write_file("out.ods", b"previous").await.unwrap();

        // a directory in the staging spot makes the write fail
        std::fs::create_dir(dir.path().join(".out.ods.blend-tmp")).unwrap();

        let err = storage.write_file("out.ods", b"next").await.unwrap_err();
        assert!(matches!(err, BlendError::OutputFile { ref path, .. } if path.ends_with("out.ods")));
        assert_eq!(std::fs::read(dir.path().join("out.ods")).unwrap(), b"previous");
    }

    #[tokio::test]
    async fn test_write_leaves_no_staging_file() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("out.ods", b"PK").await.unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("out.ods")]);
    }

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("reports/2024/out.ods", b"PK").await.unwrap();
        assert!(dir.path().join("reports/2024/out.ods").exists());
    }

    #[tokio::test]
    async fn test_missing_input_is_an_input_file_error() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        let err = storage.read_file("missing.xml").await.unwrap_err();
        assert!(matches!(err, BlendError::InputFile { ref path, .. } if path.ends_with("missing.xml")));
    }

    #[tokio::test]
    async fn test_absolute_path_ignores_base() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.xml");
        std::fs::write(&file, b"<a/>").unwrap();

        let storage = LocalStorage::new("/nonexistent-base");
        let data = storage.read_file(file.to_str().unwrap()).await.unwrap();
        assert_eq!(data, b"<a/>");
    }
}
