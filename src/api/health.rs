//! Health check and API version endpoints

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use super::ApiKey;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
}

/// Description of an API version
#[derive(Serialize, ToSchema)]
pub struct ApiVersionResponse {
    pub version: String,
    pub status: String,
    pub message: String,
    /// Capabilities added by this version
    pub features: Vec<String>,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// API v1 status
pub async fn api_v1_info(_key: ApiKey) -> Json<ApiVersionResponse> {
    Json(ApiVersionResponse {
        version: "1.0".to_string(),
        status: "active".to_string(),
        message: "API v1 is running".to_string(),
        features: Vec::new(),
    })
}

/// API v2 status
pub async fn api_v2_info(_key: ApiKey) -> Json<ApiVersionResponse> {
    Json(ApiVersionResponse {
        version: "2.0".to_string(),
        status: "active".to_string(),
        message: "API v2 is running".to_string(),
        features: vec!["delete_operations".to_string()],
    })
}
