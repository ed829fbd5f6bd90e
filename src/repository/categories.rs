//! Categories repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::category::{Category, CategoryInput},
};

#[derive(Clone)]
pub struct CategoriesRepository {
    pool: Pool<Postgres>,
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("kategori dengan id {} tidak ditemukan", id))
}

impl CategoriesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Category> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn create(&self, data: &CategoryInput) -> AppResult<Category> {
        let row = sqlx::query_as::<_, Category>("INSERT INTO categories (nama) VALUES ($1) RETURNING *")
            .bind(&data.nama)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Rename a category and bump `updated_at`
    pub async fn update(&self, id: i32, data: &CategoryInput) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET nama = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(&data.nama)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    /// Delete a category (its books go with it) and return the removed row
    pub async fn delete(&self, id: i32) -> AppResult<Category> {
        sqlx::query_as::<_, Category>("DELETE FROM categories WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }
}
