//! JSON file persistence for the wishlist dataset and URL list

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::Dataset;

/// Storage seam for the refresh loop
#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Previous snapshot; empty when none has been written yet
    async fn load_dataset(&self) -> Result<Dataset>;

    /// User-maintained URL list, `None` when the list file does not exist
    async fn load_url_list(&self) -> Result<Option<Vec<String>>>;

    /// Replace the stored snapshot
    async fn save_dataset(&self, dataset: &Dataset) -> Result<()>;
}

/// Parse URL list contents
///
/// One URL per line. Blank lines and `#` comments are skipped; repeated URLs
/// keep their first position.
pub fn parse_url_list(contents: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| seen.insert(*line))
        .map(String::from)
        .collect()
}

/// Dataset stored as pretty-printed JSON next to a plain-text URL list
#[derive(Debug, Clone)]
pub struct JsonDatasetRepository {
    data_file: PathBuf,
    urls_file: PathBuf,
}

impl JsonDatasetRepository {
    pub fn new(data_file: impl Into<PathBuf>, urls_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            urls_file: urls_file.into(),
        }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn urls_file(&self) -> &Path {
        &self.urls_file
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .data_file
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.data_file.with_file_name(name)
    }
}

#[async_trait]
impl DatasetRepository for JsonDatasetRepository {
    async fn load_dataset(&self) -> Result<Dataset> {
        if !tokio::fs::try_exists(&self.data_file).await.unwrap_or(false) {
            info!("ℹ️ {:?} not found, starting with an empty wishlist", self.data_file);
            return Ok(Dataset::default());
        }

        let content = tokio::fs::read_to_string(&self.data_file)
            .await
            .with_context(|| format!("Failed to read dataset {:?}", self.data_file))?;
        let dataset: Dataset = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse dataset {:?}", self.data_file))?;

        debug!("Loaded {} records from {:?}", dataset.len(), self.data_file);
        Ok(dataset)
    }

    async fn load_url_list(&self) -> Result<Option<Vec<String>>> {
        if !tokio::fs::try_exists(&self.urls_file).await.unwrap_or(false) {
            debug!("No URL list at {:?}", self.urls_file);
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&self.urls_file)
            .await
            .with_context(|| format!("Failed to read URL list {:?}", self.urls_file))?;
        let urls = parse_url_list(&content);

        info!("Loaded {} URLs from {:?}", urls.len(), self.urls_file);
        Ok(Some(urls))
    }

    async fn save_dataset(&self, dataset: &Dataset) -> Result<()> {
        if let Some(parent) = self.data_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let mut content =
            serde_json::to_string_pretty(dataset).context("Failed to serialize dataset")?;
        content.push('\n');

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, content)
            .await
            .with_context(|| format!("Failed to write {:?}", temp_path))?;
        tokio::fs::rename(&temp_path, &self.data_file)
            .await
            .with_context(|| format!("Failed to replace dataset {:?}", self.data_file))?;

        info!("💾 Saved {} products to {:?}", dataset.len(), self.data_file);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProductRecord;
    use tempfile::TempDir;

    fn repository(dir: &TempDir) -> JsonDatasetRepository {
        JsonDatasetRepository::new(dir.path().join("data.json"), dir.path().join("urls.txt"))
    }

    fn record(url: &str) -> ProductRecord {
        ProductRecord {
            image: "https://img.loja.com/a.jpg".to_string(),
            title: "Cafeteira Elétrica".to_string(),
            price: "R$ 199,90".to_string(),
            url: url.to_string(),
            store: "loja.com".to_string(),
        }
    }

    #[test]
    fn test_parse_url_list() {
        let urls = parse_url_list(
            "# presentes\nhttps://a.com/1\n\n  https://b.com/2  \nhttps://a.com/1\n",
        );
        assert_eq!(urls, vec!["https://a.com/1", "https://b.com/2"]);
    }

    #[tokio::test]
    async fn test_missing_files() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);

        assert!(repo.load_dataset().await.unwrap().is_empty());
        assert_eq!(repo.load_url_list().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);
        let dataset = Dataset {
            last_updated: "2026-10-17 09:30:00".to_string(),
            products: vec![record("https://loja.com/p/1")],
        };

        repo.save_dataset(&dataset).await.unwrap();
        assert_eq!(repo.load_dataset().await.unwrap(), dataset);
        assert!(!repo.temp_path().exists());
    }

    #[tokio::test]
    async fn test_saved_file_layout() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);
        let dataset = Dataset {
            last_updated: "2026-10-17 09:30:00".to_string(),
            products: vec![record("https://loja.com/p/1")],
        };
        repo.save_dataset(&dataset).await.unwrap();

        let text = std::fs::read_to_string(repo.data_file()).unwrap();
        assert!(text.starts_with("{\n  \"last_updated\""));
        assert!(text.contains("Cafeteira Elétrica"));
        let image_at = text.find("\"image\"").unwrap();
        let store_at = text.find("\"store\"").unwrap();
        assert!(image_at < store_at);
    }

    #[tokio::test]
    async fn test_corrupted_dataset_is_an_error() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);
        std::fs::write(repo.data_file(), "{ not json").unwrap();
        assert!(repo.load_dataset().await.is_err());
    }
}
