use std::path::{Path, PathBuf};

use crate::{
    error::{AppError, AppResult},
    models::CatalogItem,
};

/// Source of cleaned catalog records
///
/// Implementations own ingestion: parsing, type coercion and default-filling.
/// Items are returned in catalog order; positions become item ids.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Loads every catalog item
    async fn load(&self) -> AppResult<Vec<CatalogItem>>;

    /// Source name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Reads the catalog from a JSON array of dataset records
pub struct JsonCatalogSource {
    path: PathBuf,
}

impl JsonCatalogSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl CatalogSource for JsonCatalogSource {
    async fn load(&self) -> AppResult<Vec<CatalogItem>> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::Catalog(format!(
                "failed to read catalog {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let mut items: Vec<CatalogItem> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Catalog(format!(
                "failed to parse catalog {}: {}",
                self.path.display(),
                e
            ))
        })?;

        for (position, item) in items.iter_mut().enumerate() {
            item.id = position;
        }

        tracing::info!(
            source = self.name(),
            path = %self.path.display(),
            item_count = items.len(),
            "Catalog loaded"
        );

        Ok(items)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

/// Loads a catalog from `source`, logging which source was used
pub async fn load_catalog(source: &dyn CatalogSource) -> AppResult<Vec<CatalogItem>> {
    tracing::debug!(source = source.name(), "Loading catalog");
    source.load().await.map_err(|e| {
        tracing::error!(source = source.name(), error = %e, "Catalog load failed");
        e
    })
}
