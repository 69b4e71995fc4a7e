//! Grimoire Core Library
//!
//! This crate provides the book catalog: book records with their owners, cover
//! images kept in step with those records, and one-rating-per-user aggregates.
//! Storage and image handling sit behind traits so the server can choose the
//! backends.

pub mod assets;
pub mod catalog;
pub mod error;
pub mod repository;
pub mod storage;
pub mod types;

pub use catalog::Catalog;
pub use error::{CatalogError, Result, StorageError};
pub use types::{AssetRef, Book, BookDraft, BookFields, BookId, Grade, NewBook, Rating, UserId};
