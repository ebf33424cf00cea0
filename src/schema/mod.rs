use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, FieldError};
use crate::utils::normalize_username;

pub mod admin;
pub mod user;

pub const MIN_PASSWORD_CHARS: usize = 6;

/// Signup/signin body, shared by both roles.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();

        if self.username.trim().is_empty() {
            errors.push(FieldError::new("username", "Username cannot be empty"));
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 6 characters",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }

    pub fn normalized_username(&self) -> String {
        normalize_username(&self.username)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SigninResponse {
    pub token: String,
}
