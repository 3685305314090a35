//! `AuthUser` extractor — pulls the JWT from the Authorization header,
//! validates it, and injects the request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use foldergate_core::error::AppError;
use foldergate_core::result::AppResult;
use foldergate_core::traits::access::UserRole;
use foldergate_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims carried by access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// Username.
    pub username: String,
    /// Role at issue time.
    pub role: UserRole,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
}

/// Issue an access token. Used by operators and the test suite; FolderGate
/// itself does not mint user tokens.
pub fn encode_token(
    user_id: Uuid,
    username: &str,
    role: UserRole,
    secret: &str,
    ttl_minutes: u64,
) -> AppResult<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        role,
        exp: (Utc::now() + chrono::Duration::minutes(ttl_minutes as i64)).timestamp(),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
}

/// Decode and validate an access token.
pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::authentication(format!("Invalid token: {e}")))
}

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError(AppError::authentication("Missing Authorization header")))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError(AppError::authentication(
                "Invalid Authorization header format",
            ))
        })?;

        let claims = decode_token(token, &state.config.auth.jwt_secret)?;

        Ok(AuthUser(RequestContext::new(
            claims.sub,
            claims.username,
            claims.role,
        )))
    }
}
