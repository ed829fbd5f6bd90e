//! Catalog service: categories and books

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookDetails, BookInput},
        category::{Category, CategoryInput, CategoryWithBooks},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.categories.list().await
    }

    /// Get a category with the books filed under it
    pub async fn get_category(&self, id: i32) -> AppResult<CategoryWithBooks> {
        let category = self.repository.categories.get_by_id(id).await?;
        let books = self.repository.books.list_by_category(id).await?;
        Ok(CategoryWithBooks { category, books })
    }

    pub async fn create_category(&self, data: &CategoryInput) -> AppResult<Category> {
        let category = self.repository.categories.create(data).await?;
        tracing::info!("Created category {} ({})", category.id, category.nama);
        Ok(category)
    }

    pub async fn update_category(&self, id: i32, data: &CategoryInput) -> AppResult<Category> {
        self.repository.categories.update(id, data).await
    }

    pub async fn delete_category(&self, id: i32) -> AppResult<Category> {
        let category = self.repository.categories.delete(id).await?;
        tracing::info!("Deleted category {} ({})", category.id, category.nama);
        Ok(category)
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Get a book with its category
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;
        let kategori = self.repository.categories.get_by_id(book.kategori_id).await?;
        Ok(BookDetails { book, kategori })
    }

    pub async fn create_book(&self, data: &BookInput) -> AppResult<Book> {
        self.ensure_category(data.kategori_id).await?;
        let book = self.repository.books.create(data).await?;
        tracing::info!("Created book {} ({})", book.id, book.judul);
        Ok(book)
    }

    pub async fn update_book(&self, id: i32, data: &BookInput) -> AppResult<Book> {
        self.ensure_category(data.kategori_id).await?;
        self.repository.books.update(id, data).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<Book> {
        let book = self.repository.books.delete(id).await?;
        tracing::info!("Deleted book {} ({})", book.id, book.judul);
        Ok(book)
    }

    /// A book must reference an existing category
    async fn ensure_category(&self, kategori_id: i32) -> AppResult<()> {
        if !self.repository.categories.exists(kategori_id).await? {
            return Err(AppError::field(
                "kategori_id",
                format!("kategori dengan id {} tidak ditemukan", kategori_id),
            ));
        }
        Ok(())
    }
}
