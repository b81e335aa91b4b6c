// Core data models

use serde::{Deserialize, Serialize};

use crate::core::errors::CrewError;

/// Maximum length of a user name, counted in characters
pub const MAX_NAME_LEN: usize = 255;

/// A registered crew member
///
/// `id` is assigned by the store and never changes. `name` is unique across
/// all users and stored exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

/// Body of `POST /register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
}

impl RegisterRequest {
    /// Check the name before it reaches the store
    ///
    /// Rejects empty and whitespace-only names and names longer than
    /// [`MAX_NAME_LEN`] characters. The name itself is not modified.
    pub fn validate(&self) -> Result<(), CrewError> {
        if self.name.trim().is_empty() {
            return Err(CrewError::ValidationFailed("Name is required".to_string()));
        }

        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(CrewError::ValidationFailed(format!(
                "Name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }

        Ok(())
    }
}

/// Body of `POST /login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub name: String,
}
