//! Data models for Perpus

pub mod book;
pub mod borrowing;
pub mod category;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookDetails};
pub use borrowing::Borrowing;
pub use category::{Category, CategoryWithBooks};
pub use user::{Otp, Profile, Role, User, UserClaims};
