use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::models::AccessToken;

/// Access token taken from an `Authorization: Bearer <token>` header.
/// The scheme name is matched case-insensitively.
pub struct BearerToken(pub AccessToken);

#[axum::async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().split_once(' '))
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim())
            .filter(|token| !token.is_empty())
            .map(|token| BearerToken(AccessToken::new(token)))
            .ok_or_else(|| {
                AppError::Unauthorized("Missing access token. Please authorize first.".to_string())
            })
    }
}
