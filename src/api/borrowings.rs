//! Borrowing (peminjaman) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;

use crate::{
    error::{AppResult, ResultExt},
    models::borrowing::{BorrowInput, Borrowing},
    AppState,
};

use super::{ApiListResponse, ApiResponse, AuthenticatedUser, ValidatedJsonOrDefault};

/// Borrow a book
#[utoipa::path(
    post,
    path = "/buku/{id}/peminjaman",
    tag = "peminjaman",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body(content = BorrowInput, description = "Both dates are optional; the body may be omitted"),
    responses(
        (status = 201, description = "Borrowing recorded", body = ApiResponse<Borrowing>),
        (status = 401, description = "Not authenticated or account not verified", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 422, description = "Invalid dates", body = ErrorResponse)
    )
)]
pub async fn store(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(buku_id): Path<i32>,
    ValidatedJsonOrDefault(input): ValidatedJsonOrDefault<BorrowInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Borrowing>>)> {
    let today = Local::now().date_naive();

    let borrowing = state
        .services
        .borrowings
        .borrow(&claims, buku_id, &input, today)
        .await
        .context("gagal meminjam buku")?;

    Ok((StatusCode::CREATED, ApiResponse::new("berhasil meminjam buku", borrowing)))
}

/// List borrowings (all for petugas, own otherwise)
#[utoipa::path(
    get,
    path = "/peminjaman",
    tag = "peminjaman",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrowing list", body = ApiListResponse<Borrowing>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn index(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiListResponse<Borrowing>>> {
    let borrowings = state
        .services
        .borrowings
        .list(&claims)
        .await
        .context("gagal mengambil data peminjaman")?;

    Ok(ApiListResponse::new("berhasil mengambil data peminjaman", borrowings))
}

/// Get one borrowing
#[utoipa::path(
    get,
    path = "/peminjaman/{id}",
    tag = "peminjaman",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrowing ID")),
    responses(
        (status = 200, description = "Borrowing", body = ApiResponse<Borrowing>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Borrowing not found", body = ErrorResponse)
    )
)]
pub async fn show(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Borrowing>>> {
    let borrowing = state
        .services
        .borrowings
        .get(&claims, id)
        .await
        .context("gagal mengambil data peminjaman")?;

    Ok(ApiResponse::new("berhasil mengambil data peminjaman", borrowing))
}
