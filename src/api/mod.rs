//! API handlers for Perpus REST endpoints

pub mod auth;
pub mod books;
pub mod borrowings;
pub mod categories;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request, State},
    http::{request::Parts, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::{de::DeserializeOwned, Serialize};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::user::{Role, UserClaims},
    AppState,
};

/// Response envelope carrying a payload
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            message: message.into(),
            data,
        })
    }
}

/// Response envelope carrying a list
#[derive(Serialize, ToSchema)]
pub struct ApiListResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub message: String,
    pub data: Vec<T>,
}

impl<T> ApiListResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(message: impl Into<String>, data: Vec<T>) -> Json<Self> {
        Json(Self {
            message: message.into(),
            data,
        })
    }
}

/// Message-only response
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// JSON body that has passed its `validator` rules
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Like [`ValidatedJson`], but an empty body stands for `T::default()`
pub struct ValidatedJsonOrDefault<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJsonOrDefault<T>
where
    T: DeserializeOwned + Validate + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ValidatedJsonOrDefault(T::default()));
        }

        let Json(value) = Json::<T>::from_bytes(&bytes).map_err(json_rejection)?;

        value.validate()?;
        Ok(ValidatedJsonOrDefault(value))
    }
}

/// Well-formed JSON of the wrong shape is a validation failure, anything else a bad request
fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => {
            let mut errors = FieldErrors::new();
            errors.insert("body".to_string(), vec![e.body_text()]);
            AppError::Validation(errors)
        }
        other => AppError::BadRequest(other.body_text()),
    }
}

/// Read and verify the bearer token of a request (signature and expiry only)
async fn bearer_claims(parts: &mut Parts, state: &AppState) -> AppResult<UserClaims> {
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Authentication("login diperlukan".to_string()))?;

    state.services.users.decode_token(bearer.token())
}

/// Extractor for the authenticated user of a request
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Already checked by `require_role`
        if let Some(claims) = parts.extensions.get::<UserClaims>() {
            return Ok(AuthenticatedUser(claims.clone()));
        }

        let claims = bearer_claims(parts, state).await?;
        state.services.users.ensure_not_revoked(&claims).await?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Human description of a mutating request, e.g. "membuat kategori"
fn describe_action(method: &Method, path: &str) -> String {
    let verb = match *method {
        Method::POST => "membuat",
        Method::PUT | Method::PATCH => "mengubah",
        Method::DELETE => "menghapus",
        _ => "mengakses",
    };
    let resource = path
        .split('/')
        .find(|segment| !segment.is_empty() && *segment != "api" && *segment != "v1")
        .unwrap_or("resource");

    format!("{} {}", verb, resource)
}

/// Route layer admitting only bearers of the role in its state.
///
/// The role is compared before the revocation lookup, so callers with the
/// wrong role are turned away without a Redis round-trip.
pub async fn require_role(
    State((state, role)): State<(AppState, Role)>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let action = describe_action(request.method(), request.uri().path());
    let (mut parts, body) = request.into_parts();

    let claims = bearer_claims(&mut parts, &state).await?;
    claims.require_role(role, &action)?;
    state.services.users.ensure_not_revoked(&claims).await?;

    parts.extensions.insert(claims);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let petugas_only = middleware::from_fn_with_state((state.clone(), Role::Petugas), require_role);

    // Catalog mutations are reserved to staff
    let staff = Router::new()
        .route("/kategori", post(categories::store))
        .route("/kategori/:id", put(categories::update).delete(categories::destroy))
        .route("/buku", post(books::store))
        .route("/buku/:id", put(books::update).delete(books::destroy))
        .route_layer(petugas_only);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/register/user", post(auth::register))
        .route("/auth/register/petugas", post(auth::register))
        .route("/auth/otp-confirmation", post(auth::otp_confirmation))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", get(auth::logout))
        .route("/auth/profile", post(auth::profile))
        .route("/auth/me", get(auth::me))
        // Catalog
        .route("/kategori", get(categories::index))
        .route("/kategori/:id", get(categories::show))
        .route("/buku", get(books::index))
        .route("/buku/:id", get(books::show))
        // Borrowings
        .route("/buku/:id/peminjaman", post(borrowings::store))
        .route("/peminjaman", get(borrowings::index))
        .route("/peminjaman/:id", get(borrowings::show))
        .merge(staff)
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
