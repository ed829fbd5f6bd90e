//! Category (kategori) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::Book;

/// Category record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    pub nama: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category with the books filed under it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryWithBooks {
    #[serde(flatten)]
    pub category: Category,
    pub books: Vec<Book>,
}

/// Create or update category request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 255, message = "nama wajib diisi (maksimal 255 karakter)"))]
    pub nama: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_with_books_is_flat() {
        let now = Utc::now();
        let value = serde_json::to_value(CategoryWithBooks {
            category: Category {
                id: 3,
                nama: "Sejarah".into(),
                created_at: now,
                updated_at: now,
            },
            books: vec![],
        })
        .unwrap();

        assert_eq!(value["id"], 3);
        assert_eq!(value["nama"], "Sejarah");
        assert!(value["books"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(CategoryInput { nama: String::new() }.validate().is_err());
        assert!(CategoryInput { nama: "Fiksi".into() }.validate().is_ok());
    }
}
