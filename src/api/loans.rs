//! Loan (lending ledger) endpoints
//!
//! Loan ids are renumbered after every deletion, so an id obtained before a
//! delete may point at a different loan afterwards.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, LoanRecord, UpdateLoan},
};

use super::ApiKey;

/// Created loan
#[derive(Serialize, ToSchema)]
pub struct LoanResponse {
    /// Loan ID
    pub id: i32,
    /// Status message
    pub message: String,
}

/// Return response with the closed loan
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub status: String,
    pub loan: LoanRecord,
}

/// Result of a bulk deletion
#[derive(Serialize, ToSchema)]
pub struct DeletedResponse {
    /// Number of loans removed
    pub removed: usize,
}

/// List the whole ledger
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("api_key" = [])),
    responses(
        (status = 200, description = "All loans in ledger order", body = Vec<LoanRecord>),
        (status = 401, description = "Missing or invalid API key")
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    _key: ApiKey,
) -> AppResult<Json<Vec<LoanRecord>>> {
    Ok(Json(state.services.loans.list_loans().await))
}

/// Get loan by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    security(("api_key" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan details", body = LoanRecord),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    _key: ApiKey,
    Path(id): Path<i32>,
) -> AppResult<Json<LoanRecord>> {
    let loan = state.services.loans.get_loan(id).await?;
    Ok(Json(loan))
}

/// Get loans for a specific book
#[utoipa::path(
    get,
    path = "/books/{id}/loans",
    tag = "loans",
    security(("api_key" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Loans of the book", body = Vec<LoanRecord>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book_loans(
    State(state): State<crate::AppState>,
    _key: ApiKey,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Vec<LoanRecord>>> {
    let loans = state.services.loans.get_book_loans(book_id).await?;
    Ok(Json(loans))
}

/// Get loans for a specific user
#[utoipa::path(
    get,
    path = "/users/{id}/loans",
    tag = "loans",
    security(("api_key" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Loans of the user", body = Vec<LoanRecord>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_loans(
    State(state): State<crate::AppState>,
    _key: ApiKey,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<LoanRecord>>> {
    let loans = state.services.loans.get_user_loans(user_id).await?;
    Ok(Json(loans))
}

/// Create a new loan (borrow a book)
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("api_key" = [])),
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = LoanResponse),
        (status = 404, description = "Book or user not found")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    _key: ApiKey,
    Json(request): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<LoanResponse>)> {
    let id = state.services.loans.create_loan(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(LoanResponse {
            id,
            message: "Loan created successfully".to_string(),
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    security(("api_key" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan closed", body = ReturnResponse),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    _key: ApiKey,
    Path(id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    let loan = state.services.loans.return_loan(id).await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        loan,
    }))
}

/// Replace a loan record
#[utoipa::path(
    put,
    path = "/loans/{id}",
    tag = "loans",
    security(("api_key" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body = UpdateLoan,
    responses(
        (status = 200, description = "Loan replaced", body = LoanRecord),
        (status = 400, description = "Invalid dates"),
        (status = 404, description = "Loan, book or user not found")
    )
)]
pub async fn update_loan(
    State(state): State<crate::AppState>,
    _key: ApiKey,
    Path(id): Path<i32>,
    Json(request): Json<UpdateLoan>,
) -> AppResult<Json<LoanRecord>> {
    let loan = state.services.loans.update_loan(id, request).await?;
    Ok(Json(loan))
}

/// Delete a loan (v2)
#[utoipa::path(
    delete,
    path = "/loans/{id}",
    tag = "loans",
    security(("api_key" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 204, description = "Loan deleted, remaining loans renumbered"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn delete_loan(
    State(state): State<crate::AppState>,
    _key: ApiKey,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.loans.delete_loan(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete all loans of a book (v2)
#[utoipa::path(
    delete,
    path = "/books/{id}/loans",
    tag = "loans",
    security(("api_key" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Loans deleted", body = DeletedResponse)
    )
)]
pub async fn delete_book_loans(
    State(state): State<crate::AppState>,
    _key: ApiKey,
    Path(book_id): Path<i32>,
) -> AppResult<Json<DeletedResponse>> {
    let removed = state.services.loans.delete_book_loans(book_id).await?;
    Ok(Json(DeletedResponse { removed }))
}

/// Delete all loans of a user (v2)
#[utoipa::path(
    delete,
    path = "/users/{id}/loans",
    tag = "loans",
    security(("api_key" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Loans deleted", body = DeletedResponse)
    )
)]
pub async fn delete_user_loans(
    State(state): State<crate::AppState>,
    _key: ApiKey,
    Path(user_id): Path<i32>,
) -> AppResult<Json<DeletedResponse>> {
    let removed = state.services.loans.delete_user_loans(user_id).await?;
    Ok(Json(DeletedResponse { removed }))
}
