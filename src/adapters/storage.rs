use crate::core::Storage;
use crate::utils::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

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
    async fn test_write_creates_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage
            .write_file("exports/2023/top_scorers.csv", b"position,player")
            .await
            .unwrap();

        let data = std::fs::read(temp_dir.path().join("exports/2023/top_scorers.csv")).unwrap();
        assert_eq!(data, b"position,player");
    }

    #[tokio::test]
    async fn test_write_under_a_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("exports"), b"not a directory").unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        assert!(matches!(
            storage.write_file("exports/top_scorers.csv", b"position").await,
            Err(crate::utils::error::EtlError::IoError(_))
        ));
    }

    #[tokio::test]
    async fn test_absolute_path_ignores_base() {
        let base_dir = TempDir::new().unwrap();
        let export_dir = TempDir::new().unwrap();
        let target = export_dir.path().join("top_scorers.csv");
        let storage = LocalStorage::new(base_dir.path().to_str().unwrap().to_string());

        storage
            .write_file(target.to_str().unwrap(), b"position")
            .await
            .unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"position");
    }
}
