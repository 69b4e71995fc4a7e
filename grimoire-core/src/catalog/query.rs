use super::Catalog;
use crate::error::Result;
use crate::types::{Book, BookId};

/// Number of books returned by [`Catalog::top_rated_books`]
pub const TOP_RATED_LIMIT: usize = 3;

impl Catalog {
    pub async fn list_books(&self) -> Result<Vec<Book>> {
        self.books.list().await
    }

    pub async fn top_rated_books(&self) -> Result<Vec<Book>> {
        self.books.list_top_rated(TOP_RATED_LIMIT).await
    }

    pub async fn get_book(&self, id: &str) -> Result<Book> {
        let id = BookId::parse(id)?;
        self.books.get(id).await
    }
}
