//! Users repository: accounts, OTPs and profiles

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{Otp, Profile, RegisterUser, Role, UpsertProfile, User},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user dengan id {} tidak ditemukan", id)))
    }

    /// Get user by email (case-insensitive)
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Insert a user together with its OTP row, atomically
    pub async fn create_with_otp(
        &self,
        user: &RegisterUser,
        password_hash: &str,
        role: Role,
        otp: i32,
    ) -> AppResult<User> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (nama, email, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&user.nama)
        .bind(&user.email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&mut *tx)
        .await
        .map_err(duplicate_email)?;

        sqlx::query("INSERT INTO otps (otp, user_id) VALUES ($1, $2)")
            .bind(otp)
            .bind(created.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    /// Latest OTP issued to a user
    pub async fn latest_otp(&self, user_id: i32) -> AppResult<Option<Otp>> {
        let otp = sqlx::query_as::<_, Otp>(
            "SELECT * FROM otps WHERE user_id = $1 ORDER BY id DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(otp)
    }

    /// Flag the account as verified. Returns false when it already was.
    pub async fn mark_verified(&self, user_id: i32) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET is_verified = TRUE, updated_at = NOW() WHERE id = $1 AND is_verified = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_profile(&self, user_id: i32) -> AppResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    /// Create the profile of a user or overwrite the existing one
    pub async fn upsert_profile(&self, user_id: i32, profile: &UpsertProfile) -> AppResult<Profile> {
        let row = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, alamat, bio)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET alamat = EXCLUDED.alamat, bio = EXCLUDED.bio, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&profile.alamat)
        .bind(&profile.bio)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}

/// A concurrent registration can pass `email_exists` and still hit the
/// unique index on `LOWER(email)`
fn duplicate_email(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return AppError::field("email", "email sudah terdaftar");
        }
    }
    AppError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::{error::Error as StdError, fmt};

    #[derive(Debug)]
    struct FakeDbError {
        unique: bool,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "fake database error")
        }
    }

    impl StdError for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "fake database error"
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::Other
            }
        }
    }

    #[test]
    fn test_unique_violation_is_email_field_error() {
        let err = duplicate_email(sqlx::Error::Database(Box::new(FakeDbError {
            unique: true,
        })));
        match err {
            AppError::Validation(fields) => {
                assert_eq!(fields["email"], vec!["email sudah terdaftar".to_string()])
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_other_database_errors_stay_server_errors() {
        let err = duplicate_email(sqlx::Error::Database(Box::new(FakeDbError { unique: false })));
        assert!(matches!(err, AppError::Database(_)));
        assert!(matches!(duplicate_email(sqlx::Error::RowNotFound), AppError::Database(_)));
    }
}
