use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{Category, DisplayMovie, SeedId};

use super::extract::BearerToken;
use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct AuthorizationResponse {
    pub auth_url: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub auth_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub message: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Authorization URL the user has to visit first
pub async fn home(State(state): State<AppState>) -> Json<AuthorizationResponse> {
    Json(AuthorizationResponse {
        auth_url: state.auth.authorization_url(),
    })
}

/// Exchange the code the user pasted for an access token
pub async fn get_token(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let code = request
        .auth_code
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| {
            AppError::InvalidInput("Please enter the authorization code.".to_string())
        })?;

    let token = state.auth.exchange_code(&code).await.map_err(|e| {
        tracing::warn!(request_id = %request_id, error = %e, "Authorization failed");
        e
    })?;

    tracing::info!(request_id = %request_id, "User authorized");

    Ok(Json(TokenResponse {
        access_token: token.as_str().to_string(),
        message: "Welcome".to_string(),
    }))
}

/// Display list for a named category
pub async fn list_movies(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(category): Path<String>,
    BearerToken(token): BearerToken,
) -> AppResult<Json<Vec<DisplayMovie>>> {
    let category: Category = category.parse()?;

    tracing::info!(request_id = %request_id, category = %category, "Building movie list");

    let movies = state
        .aggregator
        .build_display_list(category, &token)
        .await?;

    Ok(Json(movies))
}

/// Related list for an explicit seed movie
pub async fn related_movies(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(seed): Path<String>,
    BearerToken(token): BearerToken,
) -> AppResult<Json<Vec<DisplayMovie>>> {
    let seed = SeedId::parse(&seed)?;

    tracing::info!(request_id = %request_id, seed = %seed, "Building related list");

    let movies = state
        .aggregator
        .build_related_list(&seed, &token)
        .await?;

    Ok(Json(movies))
}
