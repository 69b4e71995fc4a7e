//! Descriptive book fields and the caller-supplied draft they are built from

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

/// Descriptive fields of a book, editable by its owner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookFields {
    /// Book title
    pub title: String,

    /// Author name
    pub author: String,

    /// Publication year
    pub year: i32,

    /// Genre label
    pub genre: String,
}

impl BookFields {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            genre: genre.into(),
        }
    }
}

/// Book fields as received from a caller.
///
/// Only descriptive keys are modelled. Identity, ownership, image and rating
/// keys present in the payload (`_id`, `userId`, `imageUrl`, `ratings`,
/// `averageRating`, ...) are dropped during deserialization and can never
/// reach a stored record.
#[derive(Debug, Clone, Default, Deserialize, Validate, PartialEq)]
pub struct BookDraft {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub author: Option<String>,

    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<i32>,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub genre: Option<String>,
}

impl BookDraft {
    /// Parse a draft from the JSON text sent by a client
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| CatalogError::Validation(format!("malformed book payload: {e}")))
    }

    /// Parse a draft from an already decoded JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| CatalogError::Validation(format!("malformed book payload: {e}")))
    }

    /// Build complete fields, requiring every descriptive key
    pub fn into_fields(self) -> Result<BookFields> {
        self.validate()?;

        let mut missing = Vec::new();
        if self.title.is_none() {
            missing.push("title");
        }
        if self.author.is_none() {
            missing.push("author");
        }
        if self.year.is_none() {
            missing.push("year");
        }
        if self.genre.is_none() {
            missing.push("genre");
        }

        match (self.title, self.author, self.year, self.genre) {
            (Some(title), Some(author), Some(year), Some(genre)) => Ok(BookFields {
                title: title.trim().to_string(),
                author: author.trim().to_string(),
                year,
                genre: genre.trim().to_string(),
            }),
            _ => Err(CatalogError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            ))),
        }
    }

    /// Overwrite the given fields with every key present in this draft
    pub fn apply_to(self, fields: &mut BookFields) -> Result<()> {
        self.validate()?;

        if let Some(title) = self.title {
            fields.title = title.trim().to_string();
        }
        if let Some(author) = self.author {
            fields.author = author.trim().to_string();
        }
        if let Some(year) = self.year {
            fields.year = year;
        }
        if let Some(genre) = self.genre {
            fields.genre = genre.trim().to_string();
        }
        Ok(())
    }
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Accept the year either as a JSON number or as a numeric string
fn lenient_year<'de, D>(deserializer: D) -> std::result::Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Number(i32),
        Text(String),
    }

    match Option::<Year>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Year::Number(year)) => Ok(Some(year)),
        Some(Year::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
