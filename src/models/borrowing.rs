//! Borrowing (peminjaman) model

use chrono::{DateTime, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^20[0-9][0-9]-(0[1-9]|1[0-2])-(0[1-9]|[1-2][0-9]|3[0-1])$").unwrap()
});

/// Borrowing record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrowing {
    pub id: i32,
    pub user_id: i32,
    pub buku_id: i32,
    pub tanggal_pinjam: NaiveDate,
    pub tanggal_kembali: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Borrow request; both dates optional
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct BorrowInput {
    /// Start date (YYYY-MM-DD), defaults to today
    #[validate(regex(path = *DATE_RE, message = "format tanggal_pinjam harus YYYY-MM-DD"))]
    pub tanggal_pinjam: Option<String>,
    /// Return date (YYYY-MM-DD), defaults to start date plus the configured duration
    #[validate(regex(path = *DATE_RE, message = "format tanggal_kembali harus YYYY-MM-DD"))]
    pub tanggal_kembali: Option<String>,
}

/// Dates of a borrowing after defaults are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorrowPeriod {
    pub tanggal_pinjam: NaiveDate,
    pub tanggal_kembali: NaiveDate,
}

impl BorrowInput {
    /// Resolve the borrowing period. The regex admits dates such as 2024-02-31,
    /// so each date is also checked against the calendar.
    pub fn period(&self, today: NaiveDate, default_days: i64) -> AppResult<BorrowPeriod> {
        let tanggal_pinjam = match &self.tanggal_pinjam {
            Some(s) => parse_date("tanggal_pinjam", s)?,
            None => today,
        };
        let tanggal_kembali = match &self.tanggal_kembali {
            Some(s) => parse_date("tanggal_kembali", s)?,
            None => tanggal_pinjam + Duration::days(default_days),
        };

        if tanggal_kembali < tanggal_pinjam {
            return Err(AppError::field(
                "tanggal_kembali",
                "tanggal_kembali tidak boleh sebelum tanggal_pinjam",
            ));
        }

        Ok(BorrowPeriod {
            tanggal_pinjam,
            tanggal_kembali,
        })
    }
}

fn parse_date(field: &str, value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::field(field, format!("{} bukan tanggal yang valid", field)))
}
