//! API handlers and routing for the library REST endpoints
//!
//! Two API versions are served: `/api/v1` reads, creates and updates;
//! `/api/v2` adds the delete operations.

pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extractor rejecting requests without the configured API key.
///
/// The key is read from the `X-API-Key` header, falling back to the
/// `api_key` query parameter.
pub struct ApiKey;

#[derive(Deserialize)]
struct ApiKeyQuery {
    api_key: Option<String>,
}

#[async_trait]
impl FromRequestParts<AppState> for ApiKey {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let from_header = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let provided = from_header.or_else(|| {
            Query::<ApiKeyQuery>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|Query(query)| query.api_key)
        });

        match provided {
            Some(key) if key == state.config.auth.api_key => Ok(ApiKey),
            _ => Err(AppError::Authentication(
                "Invalid or missing API key".to_string(),
            )),
        }
    }
}

/// Routes shared by every API version
fn v1_routes() -> Router<AppState> {
    Router::new()
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/:id", get(books::get_book).put(books::update_book))
        .route("/books/:id/loans", get(loans::get_book_loans))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:id", get(users::get_user).put(users::update_user))
        .route("/users/:id/loans", get(loans::get_user_loans))
        // Loans
        .route("/loans", get(loans::list_loans).post(loans::create_loan))
        .route("/loans/:id", get(loans::get_loan).put(loans::update_loan))
        .route("/loans/:id/return", post(loans::return_loan))
}

/// v1 plus delete operations
fn v2_routes() -> Router<AppState> {
    v1_routes()
        .route("/books/:id", delete(books::delete_book))
        .route("/books/:id/loans", delete(loans::delete_book_loans))
        .route("/users/:id", delete(users::delete_user))
        .route("/users/:id/loans", delete(loans::delete_user_loans))
        .route("/loans/:id", delete(loans::delete_loan))
}

/// Fallback for unknown routes
async fn not_found() -> AppError {
    AppError::NotFound("No such endpoint".to_string())
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = v1_routes().route("/", get(health::api_v1_info));
    let api_v2 = v2_routes().route("/", get(health::api_v2_info));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1)
        .nest("/api/v2", api_v2)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
