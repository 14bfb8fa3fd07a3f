use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::infrastructure::config::JwtSettings;
use crate::infrastructure::security::{generate_token, hash_password, verify_password};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_settings: JwtSettings,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_settings: JwtSettings) -> Self {
        Self {
            user_repository,
            jwt_settings,
        }
    }

    /// Registers a new user. Does not log the caller in; no token is issued.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: RegisterRequest) -> Result<User> {
        req.validate()?;

        // Email uniqueness is case-insensitive
        if self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .is_some()
        {
            warn!("Registration rejected, email already taken");
            return Err(DomainError::DuplicateEmail.into());
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {e}"))
        })?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: req.name.trim().to_string(),
            email: req.email,
            password_hash,
            created_at: Utc::now(),
        };

        self.user_repository.save_user(user.clone()).await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Authenticates a login attempt. Unknown email and wrong password fail
    /// identically so callers cannot probe which emails are registered.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<(String, User)> {
        let user = self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed, unknown email");
                DomainError::InvalidCredentials
            })?;

        let is_valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {e}"))
        })?;

        if !is_valid {
            warn!(user_id = %user.id, "Login failed, wrong password");
            return Err(DomainError::InvalidCredentials.into());
        }

        let token = generate_token(&user, &self.jwt_settings).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {e}"))
        })?;

        info!(user_id = %user.id, "Login successful");
        Ok((token, user))
    }
}
