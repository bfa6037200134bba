//! User management service — application-layer orchestration
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use metrics::counter;
use tracing::info;

use crate::auth::jwt::{create_token, JwtConfig};
use crate::auth::password::{hash_password, verify_password};
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, PaginatedResult, UpdateUserDto, User,
    UserRepositoryInterface,
};

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// User service — orchestrates identity and user-management use-cases.
///
/// Generic over `R: UserRepositoryInterface` so it stays decoupled from
/// the concrete persistence layer.
pub struct UserService<R: UserRepositoryInterface> {
    repo: Arc<R>,
    jwt_config: JwtConfig,
}

impl<R: UserRepositoryInterface> UserService<R> {
    pub fn new(repo: Arc<R>, jwt_config: JwtConfig) -> Self {
        Self { repo, jwt_config }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by username + password and return a JWT.
    ///
    /// The access window is not checked here: the middleware applies it to
    /// every subsequent request, so a token obtained outside the window is
    /// unusable anyway.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AuthResult> {
        let user = self.repo.find_by_username(username).await?;

        let Some(user) = user else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        self.repo.record_login(&user.id).await?;

        let token = create_token(&user.id, &user.username, user.role, &self.jwt_config)
            .map_err(|e| DomainError::Validation(format!("Failed to create token: {}", e)))?;

        counter!("logins_total").increment(1);
        info!(username = %user.username, "Login successful");

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    // ── Administration ──────────────────────────────────────────

    /// Create a user (admin operation and first-run bootstrap).
    pub async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        if dto.username.len() < 3 || dto.username.len() > 50 {
            return Err(DomainError::Validation(
                "Username must be 3-50 characters".into(),
            ));
        }
        if dto.password.len() < 8 {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".into(),
            ));
        }

        // No pre-check race protection: the unique constraint is the authority.
        let user = self.repo.create(dto).await?;

        info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    pub async fn list_users(
        &self,
        page: u32,
        page_size: u32,
    ) -> DomainResult<PaginatedResult<User>> {
        self.repo.list(page, page_size).await
    }

    pub async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        self.repo.find_by_id(id).await
    }

    /// Overwrite role and access window (admin edit form semantics).
    pub async fn update_access(&self, id: &str, dto: UpdateUserDto) -> DomainResult<Option<User>> {
        self.repo.update_access(id, dto).await
    }

    /// Delete a user. Self-deletion is disallowed.
    pub async fn delete_user(&self, id: &str, acting_user_id: &str) -> DomainResult<()> {
        if id == acting_user_id {
            return Err(DomainError::Forbidden(
                "You cannot delete your own account".into(),
            ));
        }

        self.repo.delete(id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Record the stored filename of a freshly uploaded profile image.
    pub async fn set_profile_image(&self, user_id: &str, filename: &str) -> DomainResult<()> {
        self.repo.update_profile_image(user_id, filename).await
    }

    // ── Password changes ────────────────────────────────────────

    /// Set a new password after checking the confirmation. Used both for
    /// self-service change and the admin reset (neither requires the
    /// current password).
    pub async fn set_password(
        &self,
        user_id: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> DomainResult<()> {
        if new_password != confirm_password {
            return Err(DomainError::Validation(
                "New password and confirmation do not match".into(),
            ));
        }
        if new_password.len() < 8 {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".into(),
            ));
        }

        let new_hash = hash_password(new_password)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))?;

        self.repo.update_password_hash(user_id, &new_hash).await?;

        info!(user_id, "Password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::repositories::UserRepository;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    async fn service() -> UserService<UserRepository> {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        UserService::new(Arc::new(UserRepository::new(db)), JwtConfig::default())
    }

    fn dto(username: &str, role: UserRole) -> CreateUserDto {
        CreateUserDto {
            username: username.to_string(),
            password: "segredo123".to_string(),
            role,
            access_start: None,
            access_end: None,
        }
    }

    #[tokio::test]
    async fn login_round_trip() {
        let svc = service().await;
        svc.create_user(dto("porteiro", UserRole::User)).await.unwrap();

        let auth = svc.login("porteiro", "segredo123").await.unwrap();
        assert_eq!(auth.token_type, "Bearer");
        assert!(!auth.token.is_empty());

        let err = svc.login("porteiro", "senha-errada").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let err = svc.login("ninguem", "segredo123").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn self_deletion_is_forbidden() {
        let svc = service().await;
        let admin = svc.create_user(dto("chefe", UserRole::Admin)).await.unwrap();

        let err = svc.delete_user(&admin.id, &admin.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        // Still present
        assert!(svc.get_user_by_id(&admin.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn password_confirmation_must_match() {
        let svc = service().await;
        let user = svc.create_user(dto("joao", UserRole::User)).await.unwrap();

        let err = svc
            .set_password(&user.id, "nova-senha-1", "nova-senha-2")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        svc.set_password(&user.id, "nova-senha-1", "nova-senha-1")
            .await
            .unwrap();
        assert!(svc.login("joao", "nova-senha-1").await.is_ok());
    }

    #[tokio::test]
    async fn short_usernames_and_passwords_are_rejected() {
        let svc = service().await;

        let err = svc.create_user(dto("ab", UserRole::User)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut short = dto("carlos", UserRole::User);
        short.password = "curta".to_string();
        let err = svc.create_user(short).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
