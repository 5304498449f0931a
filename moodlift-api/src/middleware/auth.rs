//! JWT Authentication Middleware
//!
//! Issues and validates bearer tokens, and exposes two middleware layers:
//! `require_auth` (401 on missing/invalid/expired tokens) and
//! `optional_auth` (parse failures are treated as anonymous, not errors).

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HS256
    pub secret: String,
    /// Token lifetime in days
    pub expiry_days: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiry_days: 30,
        }
    }

    /// Read `JWT_SECRET` / `JWT_EXPIRY_DAYS` from the environment, with
    /// development defaults
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "moodlift-dev-secret-change-in-production".to_string());
        let expiry_days = std::env::var("JWT_EXPIRY_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        Self {
            secret,
            expiry_days,
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at (Unix timestamp)
    pub iat: u64,
}

/// Authenticated caller, stored in request extensions by the middleware
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// Issue a bearer token for the given user id
pub fn issue_token(user_id: &str, config: &JwtConfig) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp() as u64,
        exp: (now + Duration::days(config.expiry_days)).timestamp() as u64,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to issue token: {e}")))
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Validate a bearer token and return its claims
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, ApiError> {
    let validation = Validation::new(Algorithm::HS256);
    let key = DecodingKey::from_secret(config.secret.as_bytes());

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        if e.kind() == &jsonwebtoken::errors::ErrorKind::ExpiredSignature {
            ApiError::Unauthorized("Token expired".to_string())
        } else {
            ApiError::Unauthorized("Invalid token".to_string())
        }
    })?;

    Ok(token_data.claims)
}

/// Require a valid bearer token; stores [`AuthUser`] in request extensions
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

    let token = extract_token(auth_header)
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization header".to_string()))?;
    let claims = validate_token(token, &state.jwt)?;

    request.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
    });

    Ok(next.run(request).await)
}

/// Validate the bearer token if present; anonymous otherwise
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(auth_header) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        if let Some(token) = extract_token(auth_header) {
            if let Ok(claims) = validate_token(token, &state.jwt) {
                request.extensions_mut().insert(AuthUser {
                    user_id: claims.sub,
                });
            }
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_token("Basic abc123"), None);
        assert_eq!(extract_token("abc123"), None);
    }

    #[test]
    fn test_issue_and_validate_token() {
        let config = JwtConfig::new("test-secret-for-unit-testing-only");

        let token = issue_token("user_123", &config).unwrap();
        let claims = validate_token(&token, &config).unwrap();

        assert_eq!(claims.sub, "user_123");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token() {
        let mut config = JwtConfig::new("test-secret-for-unit-testing-only");
        config.expiry_days = -1;

        let token = issue_token("user_123", &config).unwrap();
        let result = validate_token(&token, &config);

        assert!(matches!(result, Err(ApiError::Unauthorized(msg)) if msg == "Token expired"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = JwtConfig::new("test-secret-for-unit-testing-only");
        let other = JwtConfig::new("a-completely-different-secret");

        let token = issue_token("user_123", &config).unwrap();
        assert!(validate_token(&token, &other).is_err());
    }
}
