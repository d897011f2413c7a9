//! Client-related types shared with the backend
//!
//! Request/response DTOs for the auth endpoints plus the claim set the
//! client reads out of the bearer token.

use serde::{Deserialize, Serialize};

// Re-export ApiResponse from response module
pub use crate::response::ApiResponse;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request (`POST /api/auth/login`)
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Register request (`POST /api/auth/register`), same shape as login
pub type RegisterRequest = LoginRequest;

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Password change (`PUT /api/auth/update-password/{id}`)
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdate {
    pub new_password: String,
}

impl std::fmt::Debug for PasswordUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordUpdate { new_password: *** }")
    }
}

// =============================================================================
// Bearer token claims
// =============================================================================

/// One entry of the `groups` claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedAuthority {
    pub authority: String,
}

/// The part of the token payload the client reads.
///
/// Everything else in the payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default)]
    pub groups: Vec<GrantedAuthority>,
}

impl TokenClaims {
    /// Group names in claim order
    pub fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.authority.clone()).collect()
    }
}
