//! JWT validation middleware.
//!
//! Token ISSUANCE is the upstream identity provider's job — this server
//! only validates. A valid `Authorization: Bearer <token>` header yields
//! an authenticated [`Identity`]; no header yields the anonymous
//! identity (read paths degrade gracefully); a malformed or expired
//! token is rejected outright.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use openhome_core::Identity;

/// JWT claims payload expected from the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id.
    pub sub: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// Shared JWT configuration for the middleware.
#[derive(Clone)]
pub struct JwtState {
    pub decoding_key: DecodingKey,
    pub validation: Validation,
}

/// Error type for authentication failures.
#[derive(Debug)]
pub enum AuthError {
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AuthError::InvalidToken(e) => {
                (StatusCode::UNAUTHORIZED, format!("invalid token: {}", e))
            }
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}

/// Middleware resolving the caller identity once per request.
///
/// The resulting [`Identity`] is stored in the request extensions; every
/// handler passes it into the services explicitly. Identity never lives
/// in shared mutable state, so concurrent requests cannot observe each
/// other's caller.
pub async fn auth_middleware(
    State(jwt_state): State<Arc<JwtState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let bearer = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let identity = match bearer {
        None => Identity::anonymous(),
        Some(token) => {
            let token_data = jsonwebtoken::decode::<Claims>(
                &token,
                &jwt_state.decoding_key,
                &jwt_state.validation,
            )
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
            Identity::user(token_data.claims.sub)
        }
    };

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
