use crate::application::auth_service::{AuthService, Registrar};
use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{CreateUser, Role};
use crate::infrastructure::config::AdminSeed;
use anyhow::Result;
use tracing::info;

/// Creates the configured administrator unless an account with that email exists.
///
/// Returns whether an account was created.
pub async fn seed_admin<R: UserRepository>(auth_service: &AuthService<R>, seed: &AdminSeed) -> Result<bool> {
    let req = CreateUser {
        name: seed.name.clone(),
        email: seed.email.clone(),
        password: seed.password.clone(),
        address: None,
        role: Some(Role::Admin.to_string()),
    };

    match auth_service.create_user(req, Registrar::Admin).await {
        Ok(user) => {
            info!(user_id = user.id, "Seeded administrator account");
            Ok(true)
        }
        Err(e) if matches!(e.downcast_ref::<DomainError>(), Some(DomainError::Conflict(_))) => {
            info!("Administrator account already present");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::user_repository::InMemoryUserRepository;
    use crate::domain::user::LoginRequest;
    use std::sync::Arc;

    fn seed() -> AdminSeed {
        AdminSeed {
            name: "System Administrator Account".to_string(),
            email: "root@example.com".to_string(),
            password: "Adm1n#Pass".to_string(),
        }
    }

    #[tokio::test]
    async fn test_seed_admin_is_idempotent() {
        let auth = AuthService::new(Arc::new(InMemoryUserRepository::new()), "s".to_string(), 60);

        assert!(seed_admin(&auth, &seed()).await.unwrap());
        assert!(!seed_admin(&auth, &seed()).await.unwrap());

        let (_, user) = auth
            .login(LoginRequest {
                email: "root@example.com".to_string(),
                password: "Adm1n#Pass".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_seed_admin_rejects_weak_password() {
        let auth = AuthService::new(Arc::new(InMemoryUserRepository::new()), "s".to_string(), 60);
        let mut weak = seed();
        weak.password = "password".to_string();

        let err = seed_admin(&auth, &weak).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Validation(_))
        ));
    }
}
