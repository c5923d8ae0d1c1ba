//! Content catalog
//!
//! Holds the ordered list of content items currently offered on the panel.
//! The catalog is only ever replaced wholesale; readers take an `Arc`
//! snapshot and keep seeing that exact version until they drop it.

use arc_swap::ArcSwap;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use userguide_core::{FetchFailure, Host, SyncError, HTTP_STATUS_OK};
use userguide_types::{ContentItem, ItemId};
use uuid::Uuid;

/// Where catalog content comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Inline list from configuration
    Static(Vec<ContentItem>),
    /// JSON document fetched with a GET
    Remote(String),
}

impl CatalogSource {
    pub fn is_remote(&self) -> bool {
        matches!(self, CatalogSource::Remote(_))
    }
}

/// An item together with the id its button carries
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: ItemId,
    pub item: ContentItem,
}

/// One loaded version of the catalog
#[derive(Debug)]
pub struct Catalog {
    generation: Uuid,
    entries: Vec<CatalogEntry>,
    index: HashMap<ItemId, usize>,
}

impl Catalog {
    /// Build a catalog, minting a fresh id for every item
    pub fn new(items: Vec<ContentItem>) -> Self {
        let entries: Vec<CatalogEntry> = items
            .into_iter()
            .map(|item| CatalogEntry {
                id: ItemId::mint(),
                item,
            })
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(pos, entry)| (entry.id.clone(), pos))
            .collect();
        Self {
            generation: Uuid::new_v4(),
            entries,
            index,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Identifies this load; changes on every replacement
    pub fn generation(&self) -> Uuid {
        self.generation
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by the id minted for this load
    pub fn get(&self, id: &ItemId) -> Option<&CatalogEntry> {
        self.index.get(id).and_then(|&pos| self.entries.get(pos))
    }

    pub fn items(&self) -> impl Iterator<Item = &ContentItem> {
        self.entries.iter().map(|e| &e.item)
    }
}

/// Fetch and parse a remote catalog
pub async fn fetch_remote<H: Host>(host: &H, url: &str) -> Result<Vec<ContentItem>, SyncError> {
    let failure = |reason| SyncError::FetchFailure {
        url: url.to_string(),
        reason,
    };

    let response = host
        .http_get(url)
        .await
        .map_err(|e| failure(FetchFailure::Transport(e)))?;
    if response.status_code != HTTP_STATUS_OK {
        return Err(failure(FetchFailure::Status(response.status_code)));
    }
    serde_json::from_str(&response.body).map_err(|e| failure(FetchFailure::Parse(e)))
}

/// Owns the current catalog and swaps it atomically
pub struct CatalogStore {
    source: CatalogSource,
    current: ArcSwap<Catalog>,
}

impl CatalogStore {
    /// Create an empty store; [`CatalogStore::install`] populates it
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            current: ArcSwap::from_pointee(Catalog::empty()),
        }
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Current catalog version
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current.load_full()
    }

    /// Resolve the source into a list of items.
    ///
    /// A failed fetch never propagates: it is logged and the items of the
    /// catalog currently held are returned instead (empty if none yet).
    pub async fn load<H: Host>(&self, host: &H) -> Vec<ContentItem> {
        match self.try_load(host).await {
            Ok(items) => items,
            Err(e) => {
                warn!("{}; keeping previous catalog", e);
                self.snapshot().items().cloned().collect()
            }
        }
    }

    async fn try_load<H: Host>(&self, host: &H) -> Result<Vec<ContentItem>, SyncError> {
        match &self.source {
            CatalogSource::Static(items) => Ok(items.clone()),
            CatalogSource::Remote(url) => {
                debug!("Checking content server {}", url);
                fetch_remote(host, url).await
            }
        }
    }

    /// Load the source for a refresh.
    ///
    /// `None` means the fetch failed and the catalog held is untouched. The
    /// swap is left to [`CatalogStore::install`] so callers can order it
    /// against in-flight readers.
    pub async fn fetch<H: Host>(&self, host: &H) -> Option<Vec<ContentItem>> {
        match self.try_load(host).await {
            Ok(items) => Some(items),
            Err(e) => {
                warn!("{}; keeping previous catalog", e);
                None
            }
        }
    }

    /// Replace the catalog wholesale
    pub fn install(&self, items: Vec<ContentItem>) -> Arc<Catalog> {
        let catalog = Arc::new(Catalog::new(items));
        self.current.store(Arc::clone(&catalog));
        info!(
            "Installed catalog {} with {} items",
            catalog.generation(),
            catalog.len()
        );
        catalog
    }
}
