use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use auth_core::domain::entities::member::MAX_PASSWORD_BYTES;
use auth_core::domain::LoginResponse;

/// Length limits count characters; bcrypt counts bytes
fn password_within_limit(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut error = ValidationError::new("length");
        error.message = Some(format!("must be at most {} bytes", MAX_PASSWORD_BYTES).into());
        return Err(error);
    }
    Ok(())
}

#[derive(Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1), custom(function = "password_within_limit"))]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8), custom(function = "password_within_limit"))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: String,
}

/// Body of a login or refresh response; the refresh identifier travels in the cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<&LoginResponse> for TokenResponse {
    fn from(response: &LoginResponse) -> Self {
        Self {
            access_token: response.access_token.clone(),
            token_type: "Bearer".to_string(),
            expires_in: response.access_expires_in,
        }
    }
}
