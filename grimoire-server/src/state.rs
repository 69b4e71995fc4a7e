//! Application state

use crate::accounts::{AccountDirectory, ACCOUNTS_DOCUMENT};
use crate::config::ServerConfig;
use anyhow::Result;
use grimoire_core::assets::ImageAssetStore;
use grimoire_core::repository::{DocumentRepository, BOOKS_DOCUMENT};
use grimoire_core::storage::{LocalStorage, StorageProvider};
use grimoire_core::Catalog;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Book lifecycle, ratings and queries
    pub catalog: Catalog,

    /// Registered users
    pub accounts: Arc<AccountDirectory>,

    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create application state backed by the local filesystem
    pub async fn new(config: ServerConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.storage_path).await?;
        tokio::fs::create_dir_all(config.images_path()).await?;

        let storage: Arc<dyn StorageProvider> = Arc::new(LocalStorage::new(&config.storage_path));

        let books = DocumentRepository::open(storage.clone(), BOOKS_DOCUMENT).await?;
        let assets = ImageAssetStore::new(storage.clone(), config.public_url.clone());
        let accounts = AccountDirectory::open(storage, ACCOUNTS_DOCUMENT).await?;

        Ok(Self {
            catalog: Catalog::new(Arc::new(books), Arc::new(assets)),
            accounts: Arc::new(accounts),
            config: Arc::new(config),
        })
    }
}
