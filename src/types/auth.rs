use serde::{Deserialize, Serialize};

use super::{Validate, require_text};
use crate::db::models::Role;
use crate::error::RollcallError;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), RollcallError> {
        require_text("username", &self.username, 100)?;
        require_text("password", &self.password, 255)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), RollcallError> {
        require_text("username", &self.username, 100)?;
        if self.password.chars().count() < 6 {
            return Err(RollcallError::Validation(
                "`password` must be at least 6 characters".to_string(),
            ));
        }
        Ok(())
    }
}
