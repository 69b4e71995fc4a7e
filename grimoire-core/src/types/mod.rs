//! Core types of the catalog

mod book;
mod fields;
mod ids;
mod rating;

pub use book::{Book, NewBook};
pub use fields::{BookDraft, BookFields};
pub use ids::{AssetRef, BookId, UserId};
pub use rating::{average, Grade, Rating, MAX_GRADE, MIN_GRADE};
