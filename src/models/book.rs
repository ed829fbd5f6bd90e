//! Book (buku) model

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::category::Category;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").unwrap());

/// Book record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub judul: String,
    pub ringkasan: Option<String>,
    /// Publication year, four digits
    pub tahun_terbit: String,
    /// Page count
    pub halaman: i32,
    pub kategori_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book with its category
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub kategori: Category,
}

/// Create or update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(length(min = 1, max = 255, message = "judul wajib diisi (maksimal 255 karakter)"))]
    pub judul: String,
    pub ringkasan: Option<String>,
    #[validate(regex(path = *YEAR_RE, message = "format tahun_terbit harus YYYY"))]
    pub tahun_terbit: String,
    #[validate(range(min = 1, message = "halaman minimal 1"))]
    pub halaman: i32,
    pub kategori_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> BookInput {
        BookInput {
            judul: "Laskar Pelangi".into(),
            ringkasan: None,
            tahun_terbit: "2005".into(),
            halaman: 529,
            kategori_id: 1,
        }
    }

    #[test]
    fn test_valid_book() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_bad_year_and_pages() {
        let book = BookInput {
            tahun_terbit: "05".into(),
            halaman: 0,
            ..input()
        };
        let errors = book.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("tahun_terbit"));
        assert!(fields.contains_key("halaman"));
    }
}
