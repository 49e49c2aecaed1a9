//! Lazily-fetched technology catalog behind the CV skills autocomplete.
//!
//! The catalog is an owned service: construct one at startup, share it
//! (e.g. behind an `Arc`), drop it at shutdown. There is no global cache.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::error::CoreError;

/// One entry of the technology icon catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Where the catalog comes from (remote JSON index, fixture, ...).
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Technology>, CoreError>;
}

/// Fetch-once cache over a [`CatalogSource`].
///
/// Concurrent [`get`](Self::get) calls share a single in-flight fetch. A
/// failed fetch is not cached; the next call retries.
pub struct TechnologyCatalog<S> {
    source: S,
    cache: OnceCell<Arc<Vec<Technology>>>,
}

impl<S: CatalogSource> TechnologyCatalog<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> Result<Arc<Vec<Technology>>, CoreError> {
        let entries = self
            .cache
            .get_or_try_init(|| async {
                let entries = self.source.fetch().await?;
                tracing::debug!(count = entries.len(), "Technology catalog fetched");
                Ok::<_, CoreError>(Arc::new(entries))
            })
            .await?;
        Ok(Arc::clone(entries))
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.initialized()
    }

    /// Drop the cached catalog so the next `get` fetches again.
    pub fn invalidate(&mut self) {
        self.cache.take();
    }

    /// Autocomplete suggestions: prefix matches first, then substring
    /// matches, both case-insensitive and in catalog order.
    pub async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<Technology>, CoreError> {
        let query = query.trim().to_lowercase();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let entries = self.get().await?;

        let (prefix, contains): (Vec<&Technology>, Vec<&Technology>) = entries
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&query))
            .partition(|t| t.name.to_lowercase().starts_with(&query));

        Ok(prefix
            .into_iter()
            .chain(contains)
            .take(limit)
            .cloned()
            .collect())
    }
}
