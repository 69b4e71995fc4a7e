//! The Book record - the central catalog entity

use super::{average, AssetRef, BookFields, BookId, Grade, Rating, UserId};
use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};

/// A book that has not been stored yet.
///
/// Carries no identifier and no ratings: the repository assigns the former and
/// a fresh book always starts without the latter.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub owner_id: UserId,
    pub fields: BookFields,
    pub image_ref: AssetRef,
}

/// A stored book record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id")]
    id: BookId,

    #[serde(rename = "userId")]
    owner_id: UserId,

    #[serde(flatten)]
    pub fields: BookFields,

    #[serde(rename = "imageUrl")]
    image_ref: AssetRef,

    ratings: Vec<Rating>,

    average_rating: f64,
}

impl Book {
    /// Materialize a new book under the given identifier
    pub fn create(id: BookId, new: NewBook) -> Self {
        Self {
            id,
            owner_id: new.owner_id,
            fields: new.fields,
            image_ref: new.image_ref,
            ratings: Vec::new(),
            average_rating: 0.0,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn image_ref(&self) -> &AssetRef {
        &self.image_ref
    }

    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn average_rating(&self) -> f64 {
        self.average_rating
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }

    pub fn has_rated(&self, user: &UserId) -> bool {
        self.ratings.iter().any(|r| &r.user_id == user)
    }

    /// Append a rating and recompute the average in the same step
    pub fn add_rating(&mut self, user: UserId, grade: Grade) -> Result<()> {
        if self.has_rated(&user) {
            return Err(CatalogError::Conflict(format!(
                "user {user} already rated book {}",
                self.id
            )));
        }
        self.ratings.push(Rating::new(user, grade));
        self.average_rating = average(&self.ratings);
        Ok(())
    }

    /// Point the book at a new cover, returning the one it replaces
    pub fn replace_image(&mut self, image_ref: AssetRef) -> AssetRef {
        std::mem::replace(&mut self.image_ref, image_ref)
    }

    /// Restore the derived average after loading from storage
    pub(crate) fn normalize(&mut self) {
        self.average_rating = average(&self.ratings);
    }
}
