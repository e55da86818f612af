use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde::Serialize;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::db::models::Role;
use crate::error::RollcallError;
use crate::router::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    ApiKey,
    BearerToken,
}

/// The authenticated caller. Extracting it is the auth gate for every
/// protected route.
///
/// Accepts, in order:
/// - Header: `x-api-key: <service key>`
/// - Query string: `?key=<service key>`
/// - Header: `Authorization: Bearer <access token>` issued by `/auth/login`
///
/// The service key acts as an admin.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub username: String,
    pub role: Role,
    pub method: AuthMethod,
}

impl Principal {
    pub fn require_admin(&self) -> Result<(), RollcallError> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Teacher => Err(RollcallError::Forbidden("admin role required")),
        }
    }

    fn service() -> Self {
        Self {
            username: "service".to_string(),
            role: Role::Admin,
            method: AuthMethod::ApiKey,
        }
    }
}

fn key_matches(candidate: &str, expected: &str) -> bool {
    bool::from(candidate.as_bytes().ct_eq(expected.as_bytes()))
}

fn api_key_presented(headers: &HeaderMap, query: Option<&str>, expected: &str) -> bool {
    // 1) header: x-api-key
    if let Some(hv) = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
        && key_matches(hv, expected)
    {
        return true;
    }

    // 2) query: key=...
    if let Some(qs) = query {
        for (k, v) in url::form_urlencoded::parse(qs.as_bytes()) {
            if k == "key" && key_matches(&v, expected) {
                return true;
            }
        }
    }
    false
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = RollcallError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if api_key_presented(&parts.headers, parts.uri.query(), &state.api_key) {
            return Ok(Principal::service());
        }

        let Ok(TypedHeader(Authorization(bearer))) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await
        else {
            return Err(RollcallError::Unauthorized("invalid or missing credentials"));
        };

        let claims = state.signer.verify(bearer.token())?;
        let Some(user) = state.storage.find_user(&claims.sub).await? else {
            debug!(username = %claims.sub, "token for unknown user");
            return Err(RollcallError::Unauthorized("user not found"));
        };

        Ok(Principal {
            username: user.username,
            role: user.role,
            method: AuthMethod::BearerToken,
        })
    }
}
