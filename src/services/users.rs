//! Registration, OTP verification, authentication and profile service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{LoginRequest, OtpConfirmation, Profile, RegisterUser, Role, UpsertProfile, User, UserClaims},
    repository::Repository,
    services::{email::EmailService, redis::RedisService},
};

/// Smallest and largest six-digit OTP
pub const OTP_MIN: i32 = 100_000;
pub const OTP_MAX: i32 = 999_999;

/// Draw a six-digit OTP uniformly
pub fn generate_otp() -> i32 {
    rand::thread_rng().gen_range(OTP_MIN..=OTP_MAX)
}

/// Result of a successful registration
#[derive(Debug)]
pub struct Registration {
    pub user: User,
    pub otp: i32,
}

/// Issued bearer token
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginToken {
    /// Always "bearer"
    #[serde(rename = "type")]
    pub token_type: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Current user with profile
#[derive(Debug, Serialize, ToSchema)]
pub struct UserWithProfile {
    #[serde(flatten)]
    pub user: User,
    pub profile: Option<Profile>,
}

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
    email: EmailService,
    redis: RedisService,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig, email: EmailService, redis: RedisService) -> Self {
        Self {
            repository,
            config,
            email,
            redis,
        }
    }

    /// Create the account and its OTP, then mail the OTP in the background
    pub async fn register(&self, input: RegisterUser, role: Role) -> AppResult<Registration> {
        if self.repository.users.email_exists(&input.email).await? {
            return Err(AppError::field("email", "email sudah terdaftar"));
        }

        let password_hash = hash_password(&input.password)?;
        let otp = generate_otp();

        let user = self
            .repository
            .users
            .create_with_otp(&input, &password_hash, role, otp)
            .await?;

        tracing::info!("Registered user {} with role {}", user.id, role);

        self.email.queue_otp(user.email.clone(), otp);

        Ok(Registration { user, otp })
    }

    /// Check the OTP sent at registration and verify the account
    pub async fn confirm_otp(&self, input: &OtpConfirmation) -> AppResult<()> {
        let user = self
            .repository
            .users
            .get_by_email(&input.email)
            .await?
            .ok_or_else(|| AppError::Failed("gagal verifikasi akun".to_string()))?;

        let otp = self
            .repository
            .users
            .latest_otp(user.id)
            .await?
            .ok_or_else(|| AppError::Failed("gagal verifikasi akun".to_string()))?;

        if otp.otp != input.otp {
            return Err(AppError::BadRequest("otp yang dimasukan salah".to_string()));
        }

        if self.repository.users.mark_verified(user.id).await? {
            tracing::info!("User {} verified", user.id);
        }

        Ok(())
    }

    /// Check credentials and issue a bearer token
    pub async fn login(&self, input: &LoginRequest) -> AppResult<LoginToken> {
        let user = self
            .repository
            .users
            .get_by_email(&input.email)
            .await?
            .ok_or_else(|| AppError::Authentication("password salah".to_string()))?;

        if !verify_password(&user.password, &input.password)? {
            return Err(AppError::Authentication("password salah".to_string()));
        }

        self.issue_token(&user)
    }

    fn issue_token(&self, user: &User) -> AppResult<LoginToken> {
        let now = Utc::now();
        let expires_at = now + Duration::days(self.config.token_expiration_days);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            jti: uuid::Uuid::new_v4().to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok(LoginToken {
            token_type: "bearer".to_string(),
            token,
            expires_at,
        })
    }

    /// Verify signature and expiry of a bearer token
    pub fn decode_token(&self, token: &str) -> AppResult<UserClaims> {
        UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(format!("token tidak valid: {}", e)))
    }

    /// Reject tokens revoked by logout
    pub async fn ensure_not_revoked(&self, claims: &UserClaims) -> AppResult<()> {
        if self.redis.is_token_revoked(&claims.jti).await? {
            return Err(AppError::Authentication("token sudah tidak berlaku".to_string()));
        }
        Ok(())
    }

    /// Revoke a token for the rest of its lifetime
    pub async fn logout(&self, claims: &UserClaims) -> AppResult<()> {
        let remaining = (claims.exp - Utc::now().timestamp()).max(0) as u64;
        self.redis.revoke_token(&claims.jti, remaining).await?;

        tracing::debug!("Revoked token {} of user {}", claims.jti, claims.user_id);
        Ok(())
    }

    pub async fn me(&self, user_id: i32) -> AppResult<UserWithProfile> {
        let user = self.repository.users.get_by_id(user_id).await?;
        let profile = self.repository.users.get_profile(user_id).await?;
        Ok(UserWithProfile { user, profile })
    }

    pub async fn upsert_profile(&self, user_id: i32, profile: &UpsertProfile) -> AppResult<Profile> {
        self.repository.users.upsert_profile(user_id, profile).await
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
