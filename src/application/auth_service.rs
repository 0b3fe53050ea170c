use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{
    AuthenticatedUser, CreateUser, LoginRequest, NewUser, Role, UpdatePassword, User,
};
use crate::domain::validation::{
    normalize_email, validate_login, validate_password_change, validate_user,
};
use crate::infrastructure::security::{generate_token, hash_password, validate_token, verify_password};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Who is creating an account; only administrators may hand out the admin role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registrar {
    Public,
    Admin,
}

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
    token_ttl_seconds: u64,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String, token_ttl_seconds: u64) -> Self {
        Self {
            user_repository,
            jwt_secret,
            token_ttl_seconds,
        }
    }

    /// Public sign-up.
    pub async fn register_user(&self, req: CreateUser) -> Result<User> {
        self.create_user(req, Registrar::Public).await
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn create_user(&self, req: CreateUser, registrar: Registrar) -> Result<User> {
        trace!("Starting user creation");

        let (errors, role) = validate_user(&req);
        DomainError::check(errors)?;
        let role = role.unwrap_or(Role::User);

        if role == Role::Admin && registrar == Registrar::Public {
            warn!("Public registration attempted to claim the admin role");
            return Err(DomainError::Forbidden(
                "Only administrators can create admin accounts".to_string(),
            )
            .into());
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        let address = req
            .address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        let user = self
            .user_repository
            .create_user(NewUser {
                name: req.name.trim().to_string(),
                email: normalize_email(&req.email),
                password_hash,
                address,
                role,
            })
            .await?;

        info!(user_id = user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Checks credentials and returns a fresh token with the user it was issued for.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<(String, User)> {
        trace!("Starting login");
        DomainError::check(validate_login(&req))?;

        let user = self
            .user_repository
            .find_user_by_email(&normalize_email(&req.email))
            .await?
            .ok_or_else(|| {
                warn!("User not found during login");
                DomainError::Unauthorized(INVALID_CREDENTIALS.to_string())
            })?;

        let is_valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;

        if !is_valid {
            warn!(user_id = user.id, "Invalid password during login");
            return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.to_string()).into());
        }

        let token = self.issue_token(&user)?;
        info!(user_id = user.id, role = %user.role, "Login successful");
        Ok((token, user))
    }

    fn issue_token(&self, user: &User) -> Result<String> {
        generate_token(user, &self.jwt_secret, self.token_ttl_seconds).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {}", e)).into()
        })
    }

    /// Resolves a bearer token to the current state of its user.
    ///
    /// The role comes from storage, not from the claims, so a token outlives
    /// neither its user nor a role change.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser> {
        let claims = validate_token(token, &self.jwt_secret).map_err(|e| {
            debug!(error = %e, "Token rejected");
            DomainError::Unauthorized("Invalid token".to_string())
        })?;

        let user_id = claims
            .user_id()
            .ok_or_else(|| DomainError::Unauthorized("Invalid token".to_string()))?;

        let user = self
            .user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id, "Token refers to a user that no longer exists");
                DomainError::Unauthorized("Invalid token".to_string())
            })?;

        trace!(user_id, role = %user.role, "Token accepted");
        Ok(AuthenticatedUser::from(&user))
    }

    #[instrument(skip(self, req))]
    pub async fn update_password(&self, user_id: u32, req: UpdatePassword) -> Result<()> {
        DomainError::check(validate_password_change(&req))?;

        let user = self
            .user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))?;

        let matches = verify_password(&req.old_password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;
        if !matches {
            warn!(user_id, "Old password mismatch");
            return Err(DomainError::BadRequest("Old password is incorrect".to_string()).into());
        }

        let password_hash = hash_password(&req.new_password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        if !self
            .user_repository
            .update_password(user_id, password_hash)
            .await?
        {
            return Err(DomainError::NotFound("User not found".to_string()).into());
        }

        info!(user_id, "Password updated");
        Ok(())
    }
}
