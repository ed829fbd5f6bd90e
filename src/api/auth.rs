//! Authentication endpoints: registration, OTP confirmation, login, logout and profile

use axum::{extract::State, http::Uri, Json};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult, ResultExt},
    models::user::{LoginRequest, OtpConfirmation, Profile, RegisterUser, Role, UpsertProfile},
    services::users::{LoginToken, UserWithProfile},
    AppState,
};

use super::{ApiResponse, AuthenticatedUser, MessageResponse, ValidatedJson};

/// Shown next to the OTP when it is echoed back
const OTP_SANDBOX_NOTE: &str = "otp juga dikirim ke response supaya user dapat melakukan verifikasi, \
karena pengiriman email hanya berjalan di sandbox";

/// Registered account summary
#[derive(Serialize, ToSchema)]
pub struct RegisteredUser {
    pub nama: String,
    pub email: String,
    pub role: Role,
    /// Present only when the server is configured to expose OTPs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub data: RegisteredUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Role requested by a registration route, taken from its last path segment
fn role_from_path(path: &str) -> AppResult<Role> {
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .and_then(|segment| segment.parse().ok())
        .ok_or_else(|| AppError::BadRequest("role tidak dikenal".to_string()))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/register/{role}",
    tag = "auth",
    params(
        ("role" = Role, Path, description = "Account role: user or petugas")
    ),
    request_body = RegisterUser,
    responses(
        (status = 200, description = "Account created, OTP sent by email", body = RegisterResponse),
        (status = 422, description = "Invalid input or email already registered", body = ErrorResponse),
        (status = 502, description = "Registration failed", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    uri: Uri,
    ValidatedJson(input): ValidatedJson<RegisterUser>,
) -> AppResult<Json<RegisterResponse>> {
    let role = role_from_path(uri.path())?;

    let registration = state
        .services
        .users
        .register(input, role)
        .await
        .context("register gagal")?;

    let expose = state.config.otp.expose_in_response;

    Ok(Json(RegisterResponse {
        message: "registrasi berhasil, silakan verifikasi email anda".to_string(),
        data: RegisteredUser {
            nama: registration.user.nama,
            email: registration.user.email,
            role: registration.user.role,
            otp: expose.then_some(registration.otp),
        },
        note: expose.then(|| OTP_SANDBOX_NOTE.to_string()),
    }))
}

/// Confirm the OTP received by email
#[utoipa::path(
    post,
    path = "/auth/otp-confirmation",
    tag = "auth",
    request_body = OtpConfirmation,
    responses(
        (status = 200, description = "Account verified", body = MessageResponse),
        (status = 400, description = "Wrong OTP", body = ErrorResponse),
        (status = 502, description = "Unknown account or no OTP issued", body = ErrorResponse)
    )
)]
pub async fn otp_confirmation(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<OtpConfirmation>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .users
        .confirm_otp(&input)
        .await
        .context("gagal verifikasi akun")?;

    Ok(MessageResponse::new("berhasil verifikasi akun"))
}

/// Log in and obtain a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<LoginToken>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginToken>>> {
    let token = state
        .services
        .users
        .login(&input)
        .await
        .context("login gagal")?;

    Ok(ApiResponse::new("berhasil login", token))
}

/// Revoke the presented token
#[utoipa::path(
    get,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Json<MessageResponse> {
    // Invalid or expired tokens have nothing left to revoke
    let claims = bearer.and_then(|TypedHeader(Authorization(bearer))| {
        state.services.users.decode_token(bearer.token()).ok()
    });

    if let Some(claims) = claims {
        if let Err(e) = state.services.users.logout(&claims).await {
            tracing::warn!("Failed to revoke token of user {}: {}", claims.user_id, e);
        }
    }

    MessageResponse::new("berhasil logout")
}

/// Create or update own profile
#[utoipa::path(
    post,
    path = "/auth/profile",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = UpsertProfile,
    responses(
        (status = 200, description = "Profile saved", body = ApiResponse<Profile>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse),
        (status = 502, description = "Profile could not be saved", body = ErrorResponse)
    )
)]
pub async fn profile(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    body: Result<ValidatedJson<UpsertProfile>, AppError>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or_else(|| {
        AppError::Authentication("login diperlukan untuk mengubah profile".to_string())
    })?;
    let claims = state.services.users.decode_token(bearer.token())?;
    state.services.users.ensure_not_revoked(&claims).await?;

    let ValidatedJson(input) = body?;

    let profile = state
        .services
        .users
        .upsert_profile(claims.user_id, &input)
        .await
        .context("gagal mengubah data profile")?;

    Ok(ApiResponse::new("berhasil mengubah data profile", profile))
}

/// Current user with profile
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserWithProfile>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<UserWithProfile>>> {
    let user = state
        .services
        .users
        .me(claims.user_id)
        .await
        .context("gagal mengambil data user")?;

    Ok(ApiResponse::new("berhasil mengambil data user", user))
}
