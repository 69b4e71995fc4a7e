//! Rating aggregation

use super::Catalog;
use crate::error::Result;
use crate::types::{Book, BookId, Grade, UserId};

impl Catalog {
    /// Record `caller`'s grade for a book and return the updated book.
    ///
    /// Load and persist are not serialized across requests: two concurrent
    /// ratings of the same book can overwrite each other (last write wins).
    pub async fn rate_book(&self, id: &str, caller: &UserId, grade: f64) -> Result<Book> {
        let grade = Grade::new(grade)?;
        let id = BookId::parse(id)?;

        let mut book = self.books.get(id).await?;
        book.add_rating(caller.clone(), grade)?;
        self.books.replace(&book).await?;

        tracing::info!(
            book_id = %id,
            user_id = %caller,
            grade = grade.value(),
            average = book.average_rating(),
            "rated book"
        );
        Ok(book)
    }
}
