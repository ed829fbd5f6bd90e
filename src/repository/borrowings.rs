//! Borrowings repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::borrowing::{BorrowPeriod, Borrowing},
};

#[derive(Clone)]
pub struct BorrowingsRepository {
    pool: Pool<Postgres>,
}

impl BorrowingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: i32, buku_id: i32, period: BorrowPeriod) -> AppResult<Borrowing> {
        let row = sqlx::query_as::<_, Borrowing>(
            r#"
            INSERT INTO borrowings (user_id, buku_id, tanggal_pinjam, tanggal_kembali)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(buku_id)
        .bind(period.tanggal_pinjam)
        .bind(period.tanggal_kembali)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// List borrowings, optionally restricted to one borrower
    pub async fn list(&self, user_id: Option<i32>) -> AppResult<Vec<Borrowing>> {
        let rows = sqlx::query_as::<_, Borrowing>(
            "SELECT * FROM borrowings WHERE ($1::INTEGER IS NULL OR user_id = $1) ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrowing> {
        sqlx::query_as::<_, Borrowing>("SELECT * FROM borrowings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("peminjaman dengan id {} tidak ditemukan", id)))
    }
}
