//! Book (buku) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppResult, ResultExt},
    models::book::{Book, BookDetails, BookInput},
    AppState,
};

use super::{ApiListResponse, ApiResponse, MessageResponse, ValidatedJson};

/// Add a book (petugas only)
#[utoipa::path(
    post,
    path = "/buku",
    tag = "buku",
    security(("bearer_auth" = [])),
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = ApiResponse<Book>),
        (status = 401, description = "Not authenticated or not petugas", body = ErrorResponse),
        (status = 422, description = "Invalid input or unknown category", body = ErrorResponse),
        (status = 502, description = "Creation failed", body = ErrorResponse)
    )
)]
pub async fn store(
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<BookInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Book>>)> {
    let book = state
        .services
        .catalog
        .create_book(&data)
        .await
        .context("gagal membuat buku")?;

    Ok((StatusCode::CREATED, ApiResponse::new("sukses membuat buku", book)))
}

/// List all books
#[utoipa::path(
    get,
    path = "/buku",
    tag = "buku",
    responses(
        (status = 200, description = "Book list", body = ApiListResponse<Book>),
        (status = 502, description = "Listing failed", body = ErrorResponse)
    )
)]
pub async fn index(State(state): State<AppState>) -> AppResult<Json<ApiListResponse<Book>>> {
    let books = state
        .services
        .catalog
        .list_books()
        .await
        .context("gagal mengambil data buku")?;

    Ok(ApiListResponse::new("berhasil mengambil data buku", books))
}

/// Get a book with its category
#[utoipa::path(
    get,
    path = "/buku/{id}",
    tag = "buku",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = ApiResponse<BookDetails>),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 502, description = "Lookup failed", body = ErrorResponse)
    )
)]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<BookDetails>>> {
    let book = state
        .services
        .catalog
        .get_book(id)
        .await
        .context("gagal mengambil data buku")?;

    Ok(ApiResponse::new("berhasil mengambil data buku", book))
}

/// Update a book (petugas only)
#[utoipa::path(
    put,
    path = "/buku/{id}",
    tag = "buku",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = ApiResponse<Book>),
        (status = 401, description = "Not authenticated or not petugas", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 422, description = "Invalid input or unknown category", body = ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(data): ValidatedJson<BookInput>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let book = state
        .services
        .catalog
        .update_book(id, &data)
        .await
        .context("gagal update data buku")?;

    Ok(ApiResponse::new("berhasil update buku", book))
}

/// Delete a book (petugas only)
#[utoipa::path(
    delete,
    path = "/buku/{id}",
    tag = "buku",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated or not petugas", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    let book = state
        .services
        .catalog
        .delete_book(id)
        .await
        .context("gagal menghapus data buku")?;

    Ok(MessageResponse::new(format!("berhasil menghapus buku {}", book.judul)))
}
