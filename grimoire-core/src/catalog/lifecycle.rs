//! Create, update and delete, keeping cover images in step with records

use super::Catalog;
use crate::error::Result;
use crate::types::{AssetRef, Book, BookDraft, BookId, NewBook, UserId};

impl Catalog {
    /// Create a book owned by `owner` with an already stored cover.
    ///
    /// If the book cannot be created the cover is discarded again.
    pub async fn create_book(
        &self,
        owner: &UserId,
        draft: BookDraft,
        image: AssetRef,
    ) -> Result<Book> {
        let created = match draft.into_fields() {
            Ok(fields) => {
                self.books
                    .insert(NewBook {
                        owner_id: owner.clone(),
                        fields,
                        image_ref: image.clone(),
                    })
                    .await
            }
            Err(e) => Err(e),
        };

        match created {
            Ok(book) => {
                tracing::info!(book_id = %book.id(), user_id = %owner, "created book");
                Ok(book)
            }
            Err(e) => {
                self.discard_asset(&image).await;
                Err(e)
            }
        }
    }

    /// Update the descriptive fields of a book and optionally replace its cover.
    ///
    /// The replaced cover is deleted only after the record points at the new
    /// one. On failure a newly supplied cover is discarded instead.
    pub async fn update_book(
        &self,
        id: &str,
        caller: &UserId,
        draft: BookDraft,
        new_image: Option<AssetRef>,
    ) -> Result<Book> {
        match self.apply_update(id, caller, draft, new_image.clone()).await {
            Ok((book, replaced)) => {
                tracing::info!(book_id = %book.id(), user_id = %caller, "updated book");
                if let Some(old) = replaced.filter(|old| old != book.image_ref()) {
                    self.discard_asset(&old).await;
                }
                Ok(book)
            }
            Err(e) => {
                if let Some(image) = &new_image {
                    self.discard_asset(image).await;
                }
                Err(e)
            }
        }
    }

    async fn apply_update(
        &self,
        id: &str,
        caller: &UserId,
        draft: BookDraft,
        new_image: Option<AssetRef>,
    ) -> Result<(Book, Option<AssetRef>)> {
        let id = BookId::parse(id)?;
        let mut book = self.books.get(id).await?;
        Self::ensure_owner(&book, caller)?;

        draft.apply_to(&mut book.fields)?;
        let replaced = new_image.map(|image| book.replace_image(image));

        self.books.replace(&book).await?;
        Ok((book, replaced))
    }

    /// Delete a book and then its cover.
    ///
    /// A malformed identifier is rejected before the repository is consulted.
    pub async fn delete_book(&self, id: &str, caller: &UserId) -> Result<()> {
        let id = BookId::parse(id)?;
        let book = self.books.get(id).await?;
        Self::ensure_owner(&book, caller)?;

        self.books.delete(id).await?;
        tracing::info!(book_id = %id, user_id = %caller, "deleted book");

        self.discard_asset(book.image_ref()).await;
        Ok(())
    }
}
