//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, borrowings, categories, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Perpus API",
        version = "0.1.0",
        description = "Library Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::otp_confirmation,
        auth::login,
        auth::logout,
        auth::profile,
        auth::me,
        // Categories
        categories::index,
        categories::show,
        categories::store,
        categories::update,
        categories::destroy,
        // Books
        books::index,
        books::show,
        books::store,
        books::update,
        books::destroy,
        // Borrowings
        borrowings::store,
        borrowings::index,
        borrowings::show,
    ),
    components(
        schemas(
            // Auth
            auth::RegisteredUser,
            auth::RegisterResponse,
            crate::models::user::Role,
            crate::models::user::User,
            crate::models::user::Profile,
            crate::models::user::RegisterUser,
            crate::models::user::LoginRequest,
            crate::models::user::OtpConfirmation,
            crate::models::user::UpsertProfile,
            crate::services::users::LoginToken,
            crate::services::users::UserWithProfile,
            // Catalog
            crate::models::category::Category,
            crate::models::category::CategoryInput,
            crate::models::category::CategoryWithBooks,
            crate::models::book::Book,
            crate::models::book::BookInput,
            crate::models::book::BookDetails,
            // Borrowings
            crate::models::borrowing::Borrowing,
            crate::models::borrowing::BorrowInput,
            // Envelopes
            crate::api::MessageResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, OTP verification and sessions"),
        (name = "kategori", description = "Book categories"),
        (name = "buku", description = "Books"),
        (name = "peminjaman", description = "Borrowings")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by secured endpoints
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/auth/otp-confirmation"));
        assert!(paths.iter().any(|p| p.as_str() == "/kategori/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/buku/{id}/peminjaman"));
        assert!(doc
            .components
            .as_ref()
            .map(|c| c.security_schemes.contains_key("bearer_auth"))
            .unwrap_or(false));
    }
}
