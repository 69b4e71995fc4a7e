//! Catalog services: book lifecycle, rating aggregation and read queries
//!
//! Every mutating operation takes the caller's verified identity explicitly.
//! Ownership is checked against the owner recorded at creation and nothing else.

mod lifecycle;
mod query;
mod rating;

pub use query::TOP_RATED_LIMIT;

use crate::assets::AssetStore;
use crate::error::{CatalogError, Result};
use crate::repository::BookRepository;
use crate::types::{AssetRef, Book, UserId};
use std::sync::Arc;

/// Entry point for all book operations
#[derive(Clone)]
pub struct Catalog {
    books: Arc<dyn BookRepository>,
    assets: Arc<dyn AssetStore>,
}

impl Catalog {
    pub fn new(books: Arc<dyn BookRepository>, assets: Arc<dyn AssetStore>) -> Self {
        Self { books, assets }
    }

    /// The asset store covers are uploaded to before a create or update
    pub fn assets(&self) -> &Arc<dyn AssetStore> {
        &self.assets
    }

    fn ensure_owner(book: &Book, caller: &UserId) -> Result<()> {
        if book.is_owned_by(caller) {
            return Ok(());
        }
        tracing::warn!(book_id = %book.id(), user_id = %caller, "rejected change by non-owner");
        Err(CatalogError::Forbidden(format!(
            "user {caller} does not own book {}",
            book.id()
        )))
    }

    /// Delete an asset, logging and swallowing any failure.
    ///
    /// An orphaned image is tolerated; a failed cleanup never changes the
    /// outcome of the operation that triggered it.
    async fn discard_asset(&self, asset: &AssetRef) {
        match self.assets.delete(asset).await {
            Ok(()) => tracing::debug!(asset = %asset, "deleted image asset"),
            Err(e) => tracing::warn!(asset = %asset, error = %e, "failed to delete image asset"),
        }
    }
}
