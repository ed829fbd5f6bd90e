//! Borrowing service

use chrono::NaiveDate;

use crate::{
    config::BorrowingConfig,
    error::{AppError, AppResult},
    models::{
        borrowing::{BorrowInput, Borrowing},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowingsService {
    repository: Repository,
    config: BorrowingConfig,
}

impl BorrowingsService {
    pub fn new(repository: Repository, config: BorrowingConfig) -> Self {
        Self { repository, config }
    }

    /// Borrow a book. Only verified accounts may borrow.
    pub async fn borrow(
        &self,
        claims: &UserClaims,
        buku_id: i32,
        input: &BorrowInput,
        today: NaiveDate,
    ) -> AppResult<Borrowing> {
        let period = input.period(today, self.config.default_duration_days)?;

        let user = self.repository.users.get_by_id(claims.user_id).await?;
        if !user.is_verified {
            return Err(AppError::Authorization(
                "akun belum diverifikasi, silakan verifikasi email anda".to_string(),
            ));
        }

        self.repository.books.get_by_id(buku_id).await?;

        let borrowing = self.repository.borrowings.create(user.id, buku_id, period).await?;
        tracing::info!(
            "User {} borrowed book {} until {}",
            user.id,
            buku_id,
            borrowing.tanggal_kembali
        );
        Ok(borrowing)
    }

    /// Staff see every borrowing, other users only their own
    pub async fn list(&self, claims: &UserClaims) -> AppResult<Vec<Borrowing>> {
        let owner = if claims.is_petugas() { None } else { Some(claims.user_id) };
        self.repository.borrowings.list(owner).await
    }

    pub async fn get(&self, claims: &UserClaims, id: i32) -> AppResult<Borrowing> {
        let borrowing = self.repository.borrowings.get_by_id(id).await?;
        if !claims.is_petugas() && borrowing.user_id != claims.user_id {
            return Err(AppError::NotFound(format!("peminjaman dengan id {} tidak ditemukan", id)));
        }
        Ok(borrowing)
    }
}
