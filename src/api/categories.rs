//! Category (kategori) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppResult, ResultExt},
    models::category::{Category, CategoryInput, CategoryWithBooks},
    AppState,
};

use super::{ApiListResponse, ApiResponse, MessageResponse, ValidatedJson};

/// Create a category (petugas only)
#[utoipa::path(
    post,
    path = "/kategori",
    tag = "kategori",
    security(("bearer_auth" = [])),
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Category>),
        (status = 401, description = "Not authenticated or not petugas", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse),
        (status = 502, description = "Creation failed", body = ErrorResponse)
    )
)]
pub async fn store(
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<CategoryInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let category = state
        .services
        .catalog
        .create_category(&data)
        .await
        .context("gagal membuat kategori")?;

    Ok((StatusCode::CREATED, ApiResponse::new("sukses membuat kategori", category)))
}

/// List all categories
#[utoipa::path(
    get,
    path = "/kategori",
    tag = "kategori",
    responses(
        (status = 200, description = "Category list", body = ApiListResponse<Category>),
        (status = 502, description = "Listing failed", body = ErrorResponse)
    )
)]
pub async fn index(State(state): State<AppState>) -> AppResult<Json<ApiListResponse<Category>>> {
    let categories = state
        .services
        .catalog
        .list_categories()
        .await
        .context("gagal mengambil data kategori")?;

    Ok(ApiListResponse::new("berhasil mengambil data kategori", categories))
}

/// Get a category with its books
#[utoipa::path(
    get,
    path = "/kategori/{id}",
    tag = "kategori",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category with books", body = ApiResponse<CategoryWithBooks>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 502, description = "Lookup failed", body = ErrorResponse)
    )
)]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<CategoryWithBooks>>> {
    let category = state
        .services
        .catalog
        .get_category(id)
        .await
        .context("gagal mengambil data kategori")?;

    Ok(ApiResponse::new("berhasil mengambil data kategori", category))
}

/// Rename a category (petugas only)
#[utoipa::path(
    put,
    path = "/kategori/{id}",
    tag = "kategori",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Category>),
        (status = 401, description = "Not authenticated or not petugas", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 502, description = "Update failed", body = ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(data): ValidatedJson<CategoryInput>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = state
        .services
        .catalog
        .update_category(id, &data)
        .await
        .context("gagal update data kategori")?;

    Ok(ApiResponse::new("berhasil update kategori", category))
}

/// Delete a category and its books (petugas only)
#[utoipa::path(
    delete,
    path = "/kategori/{id}",
    tag = "kategori",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated or not petugas", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 502, description = "Deletion failed", body = ErrorResponse)
    )
)]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    let category = state
        .services
        .catalog
        .delete_category(id)
        .await
        .context("gagal menghapus data kategori")?;

    Ok(MessageResponse::new(format!("berhasil menghapus kategori {}", category.nama)))
}
