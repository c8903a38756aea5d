//! Registration HTTP API: a thin axum surface over `sentinel-db`'s
//! repositories. No auth, no validation framework — those are explicitly
//! out of scope; this exists only so the binary family is complete.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use sentinel_core::domain::AlertConfig;
use sentinel_db::Repositories;
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("database error: {0}")]
    Database(#[from] sentinel_core::Error),

    #[error("website {0} not found")]
    WebsiteNotFound(u64),

    #[error("alert config not found for website {0}")]
    AlertConfigNotFound(u64),

    #[error("invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::Database(e) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error", e.to_string()),
            ApiError::WebsiteNotFound(id) => (
                StatusCode::NOT_FOUND,
                "website_not_found",
                format!("website {id} not found"),
            ),
            ApiError::AlertConfigNotFound(id) => (
                StatusCode::NOT_FOUND,
                "alert_config_not_found",
                format!("alert config for website {id} not found"),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });
        (status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateWebsiteRequest {
    pub url: String,
    pub owner_user_id: u64,
}

#[derive(Debug, Serialize)]
pub struct WebsiteResponse {
    pub id: u64,
    pub external_id: String,
    pub url: String,
    pub owner_user_id: u64,
}

impl From<sentinel_core::domain::Website> for WebsiteResponse {
    fn from(w: sentinel_core::domain::Website) -> Self {
        Self {
            id: w.id,
            external_id: w.external_id,
            url: w.url,
            owner_user_id: w.owner_user_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AlertConfigRequest {
    pub failure_threshold: u32,
    pub latency_threshold_ms: u32,
    pub is_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct AlertConfigResponse {
    pub website_id: u64,
    pub failure_threshold: u32,
    pub latency_threshold_ms: u32,
    pub is_enabled: bool,
}

impl From<AlertConfig> for AlertConfigResponse {
    fn from(c: AlertConfig) -> Self {
        Self {
            website_id: c.website_id,
            failure_threshold: c.failure_threshold,
            latency_threshold_ms: c.latency_threshold_ms,
            is_enabled: c.is_enabled,
        }
    }
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn create_website_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateWebsiteRequest>,
) -> Result<Json<WebsiteResponse>, ApiError> {
    if payload.url.trim().is_empty() {
        return Err(ApiError::BadRequest("url cannot be empty".to_string()));
    }

    use sentinel_core::repo::WebsiteRepository;
    let website = state
        .repos
        .websites
        .create(&payload.url, payload.owner_user_id)
        .await?;
    Ok(Json(website.into()))
}

pub async fn get_website_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<WebsiteResponse>, ApiError> {
    use sentinel_core::repo::WebsiteRepository;
    let website = state
        .repos
        .websites
        .find_by_id(id)
        .await?
        .ok_or(ApiError::WebsiteNotFound(id))?;
    Ok(Json(website.into()))
}

pub async fn get_alert_config_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<AlertConfigResponse>, ApiError> {
    use sentinel_core::repo::AlertConfigRepository;
    let config = state
        .repos
        .alert_configs
        .find_by_website_id(id)
        .await?
        .ok_or(ApiError::AlertConfigNotFound(id))?;
    Ok(Json(config.into()))
}

pub async fn put_alert_config_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<AlertConfigRequest>,
) -> Result<Json<AlertConfigResponse>, ApiError> {
    use sentinel_core::repo::AlertConfigRepository;
    let config = AlertConfig {
        id: 0,
        website_id: id,
        failure_threshold: payload.failure_threshold,
        latency_threshold_ms: payload.latency_threshold_ms,
        is_enabled: payload.is_enabled,
    };
    let saved = state.repos.alert_configs.upsert(&config).await?;
    Ok(Json(saved.into()))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/websites", post(create_website_handler))
        .route("/api/v1/websites/{id}", get(get_website_handler))
        .route(
            "/api/v1/websites/{id}/alert-config",
            get(get_alert_config_handler),
        )
        .route(
            "/api/v1/websites/{id}/alert-config",
            put(put_alert_config_handler),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_endpoint_returns_ok_without_touching_the_database() {
        let app = Router::new().route("/api/v1/health", get(health_handler));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
