//! Book repository
//!
//! [`DocumentRepository`] holds the collection in memory and persists it as a
//! single JSON document through a [`StorageProvider`] after every mutation.

use crate::error::{CatalogError, Result, StorageError};
use crate::storage::{MemoryStorage, StorageProvider};
use crate::types::{Book, BookId, NewBook};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Default document the collection is persisted to
pub const BOOKS_DOCUMENT: &str = "books.json";

/// CRUD access to book records by identifier.
///
/// Every operation is atomic for the single record it touches.
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn get(&self, id: BookId) -> Result<Book>;

    /// All books in storage order
    async fn list(&self) -> Result<Vec<Book>>;

    /// Up to `limit` books, highest average first, ties kept in storage order
    async fn list_top_rated(&self, limit: usize) -> Result<Vec<Book>>;

    /// Store a new book under a freshly assigned identifier
    async fn insert(&self, book: NewBook) -> Result<Book>;

    /// Replace the stored record with the same identifier
    async fn replace(&self, book: &Book) -> Result<()>;

    async fn delete(&self, id: BookId) -> Result<()>;
}

/// Sort books by average rating, highest first, and keep at most `limit`.
///
/// The sort is stable, so books with equal averages keep their relative order.
pub fn top_rated(mut books: Vec<Book>, limit: usize) -> Vec<Book> {
    books.sort_by(|a, b| b.average_rating().total_cmp(&a.average_rating()));
    books.truncate(limit);
    books
}

#[derive(Debug, Deserialize)]
struct Collection {
    books: Vec<Book>,
}

/// Book repository persisted as one JSON document
pub struct DocumentRepository {
    storage: Arc<dyn StorageProvider>,
    document: String,
    books: RwLock<Vec<Book>>,
}

impl DocumentRepository {
    /// Open the collection stored in `document`, starting empty if it does not exist
    pub async fn open(
        storage: Arc<dyn StorageProvider>,
        document: impl Into<String>,
    ) -> Result<Self> {
        let document = document.into();
        let books = match storage.read(&document).await {
            Ok(data) => {
                let mut collection: Collection = serde_json::from_slice(&data)?;
                collection.books.iter_mut().for_each(Book::normalize);
                collection.books
            }
            Err(StorageError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(document = %document, books = books.len(), "opened book collection");
        Ok(Self {
            storage,
            document,
            books: RwLock::new(books),
        })
    }

    /// A repository backed by volatile memory
    pub fn in_memory() -> Self {
        Self {
            storage: Arc::new(MemoryStorage::new()),
            document: BOOKS_DOCUMENT.to_string(),
            books: RwLock::new(Vec::new()),
        }
    }

    /// Persist a candidate state. Callers only commit it in memory on success.
    async fn persist(&self, books: &[Book]) -> Result<()> {
        #[derive(Serialize)]
        struct CollectionRef<'a> {
            books: &'a [Book],
        }

        let data = serde_json::to_vec_pretty(&CollectionRef { books })?;
        self.storage.write(&self.document, data).await?;
        Ok(())
    }

    fn not_found(id: BookId) -> CatalogError {
        CatalogError::NotFound(format!("book {id}"))
    }
}

#[async_trait]
impl BookRepository for DocumentRepository {
    async fn get(&self, id: BookId) -> Result<Book> {
        self.books
            .read()
            .await
            .iter()
            .find(|b| b.id() == id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn list(&self) -> Result<Vec<Book>> {
        Ok(self.books.read().await.clone())
    }

    async fn list_top_rated(&self, limit: usize) -> Result<Vec<Book>> {
        let books = self.books.read().await.clone();
        Ok(top_rated(books, limit))
    }

    async fn insert(&self, book: NewBook) -> Result<Book> {
        let mut books = self.books.write().await;

        let mut id = BookId::generate();
        while books.iter().any(|b| b.id() == id) {
            id = BookId::generate();
        }
        let book = Book::create(id, book);

        let mut next = books.clone();
        next.push(book.clone());
        self.persist(&next).await?;
        *books = next;

        Ok(book)
    }

    async fn replace(&self, book: &Book) -> Result<()> {
        let mut books = self.books.write().await;
        let index = books
            .iter()
            .position(|b| b.id() == book.id())
            .ok_or_else(|| Self::not_found(book.id()))?;

        let mut next = books.clone();
        next[index] = book.clone();
        self.persist(&next).await?;
        *books = next;

        Ok(())
    }

    async fn delete(&self, id: BookId) -> Result<()> {
        let mut books = self.books.write().await;
        let index = books
            .iter()
            .position(|b| b.id() == id)
            .ok_or_else(|| Self::not_found(id))?;

        let mut next = books.clone();
        next.remove(index);
        self.persist(&next).await?;
        *books = next;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetRef, BookFields, Grade, UserId};

    fn new_book(title: &str) -> NewBook {
        NewBook {
            owner_id: UserId::new("owner"),
            fields: BookFields::new(title, "Author", 2001, "Essay"),
            image_ref: AssetRef::new(format!("http://localhost/images/{title}.jpg")),
        }
    }

    #[tokio::test]
    async fn test_insert_get_delete() {
        let repo = DocumentRepository::in_memory();
        let book = repo.insert(new_book("One")).await.unwrap();

        assert_eq!(repo.get(book.id()).await.unwrap(), book);
        assert_eq!(repo.list().await.unwrap().len(), 1);

        repo.delete(book.id()).await.unwrap();
        assert!(matches!(
            repo.get(book.id()).await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            repo.delete(book.id()).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_replace_unknown_book_fails() {
        let repo = DocumentRepository::in_memory();
        let book = Book::create(BookId::generate(), new_book("Ghost"));
        assert!(matches!(
            repo.replace(&book).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let repo = DocumentRepository::in_memory();
        for title in ["a", "b", "c"] {
            repo.insert(new_book(title)).await.unwrap();
        }
        let titles: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.fields.title)
            .collect();
        assert_eq!(titles, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_top_rated_is_stable() {
        let repo = DocumentRepository::in_memory();
        for (title, grade) in [("low", 1.0), ("first", 4.0), ("second", 4.0), ("top", 5.0)] {
            let mut book = repo.insert(new_book(title)).await.unwrap();
            let grade = Grade::new(grade).unwrap();
            book.add_rating(UserId::new("rater"), grade).unwrap();
            repo.replace(&book).await.unwrap();
        }

        let titles: Vec<_> = repo
            .list_top_rated(3)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.fields.title)
            .collect();
        assert_eq!(titles, ["top", "first", "second"]);
    }

    #[tokio::test]
    async fn test_reopen_restores_collection() {
        let storage: Arc<dyn StorageProvider> = Arc::new(MemoryStorage::new());
        let repo = DocumentRepository::open(storage.clone(), BOOKS_DOCUMENT)
            .await
            .unwrap();
        let book = repo.insert(new_book("Persisted")).await.unwrap();

        let reopened = DocumentRepository::open(storage, BOOKS_DOCUMENT)
            .await
            .unwrap();
        assert_eq!(reopened.get(book.id()).await.unwrap(), book);
    }
}
