//! Ratings and grades

use super::UserId;
use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};

/// Lowest accepted grade
pub const MIN_GRADE: f64 = 0.0;

/// Highest accepted grade
pub const MAX_GRADE: f64 = 5.0;

/// A grade checked to lie within [`MIN_GRADE`, `MAX_GRADE`]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Grade(f64);

impl Grade {
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && (MIN_GRADE..=MAX_GRADE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CatalogError::Validation(format!(
                "rating must be between {MIN_GRADE} and {MAX_GRADE}, got {value}"
            )))
        }
    }

    /// Interpret an arbitrary JSON value as a grade
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let number = value.as_f64().ok_or_else(|| {
            CatalogError::Validation(format!(
                "rating must be a number between {MIN_GRADE} and {MAX_GRADE}"
            ))
        })?;
        Self::new(number)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// One user's rating of a book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub user_id: UserId,
    pub grade: f64,
}

impl Rating {
    pub fn new(user_id: UserId, grade: Grade) -> Self {
        Self {
            user_id,
            grade: grade.value(),
        }
    }
}

/// Arithmetic mean of the grades, 0 for an empty slice
pub fn average(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let total: f64 = ratings.iter().map(|r| r.grade).sum();
    total / ratings.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_grade_bounds() {
        assert!(Grade::new(0.0).is_ok());
        assert!(Grade::new(5.0).is_ok());
        assert!(Grade::new(2.5).is_ok());
        assert!(Grade::new(-1.0).is_err());
        assert!(Grade::new(5.0001).is_err());
        assert!(Grade::new(f64::NAN).is_err());
        assert!(Grade::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_grade_from_non_numeric_json() {
        assert!(matches!(
            Grade::from_json(&json!("4")),
            Err(CatalogError::Validation(_))
        ));
        assert!(Grade::from_json(&json!(null)).is_err());
        assert_eq!(Grade::from_json(&json!(4)).unwrap().value(), 4.0);
    }

    #[test]
    fn test_average_of_empty_is_zero() {
        assert_eq!(average(&[]), 0.0);
    }
}
