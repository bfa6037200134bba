use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::auth::password::hash_password;
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, PaginatedResult, UpdateUserDto, User,
    UserRepositoryInterface,
};
use crate::infrastructure::database::entities::user;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

fn unique_or_db_err(e: sea_orm::DbErr) -> DomainError {
    if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
        DomainError::Conflict("Username already exists".to_string())
    } else {
        db_err(e)
    }
}

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();

        let password_hash = hash_password(&dto.password)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))?;

        let new_user = user::ActiveModel {
            id: Set(id),
            username: Set(dto.username),
            password_hash: Set(password_hash),
            role: Set(dto.role.into()),
            access_start: Set(dto.access_start),
            access_end: Set(dto.access_end),
            profile_image: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
        };

        let model = new_user.insert(&self.db).await.map_err(unique_or_db_err)?;

        Ok(model.into())
    }

    async fn list(&self, page: u32, page_size: u32) -> DomainResult<PaginatedResult<User>> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);

        let query = user::Entity::find().order_by_asc(user::Column::Username);

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let offset = (page as u64 - 1) * page_size as u64;
        let models = query
            .offset(offset)
            .limit(page_size as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items: Vec<User> = models.into_iter().map(User::from).collect();

        Ok(PaginatedResult::new(items, total, page, page_size))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(User::from))
    }

    async fn count(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn update_access(&self, id: &str, dto: UpdateUserDto) -> DomainResult<Option<User>> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();
        active.role = Set(dto.role.into());
        active.access_start = Set(dto.access_start);
        active.access_end = Set(dto.access_end);
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(db_err)?;

        Ok(Some(updated.into()))
    }

    async fn update_password_hash(&self, id: &str, password_hash: &str) -> DomainResult<()> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "User",
                id: id.to_string(),
            });
        };

        let mut active: user::ActiveModel = existing.into();
        active.password_hash = Set(password_hash.to_string());
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;

        Ok(())
    }

    async fn update_profile_image(&self, id: &str, filename: &str) -> DomainResult<()> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "User",
                id: id.to_string(),
            });
        };

        let mut active: user::ActiveModel = existing.into();
        active.profile_image = Set(Some(filename.to_string()));
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;

        Ok(())
    }

    async fn record_login(&self, id: &str) -> DomainResult<()> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if let Some(existing) = existing {
            let mut active: user::ActiveModel = existing.into();
            active.last_login_at = Set(Some(Utc::now()));
            active.update(&self.db).await.map_err(db_err)?;
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "User",
                id: id.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infrastructure::database::migrator::Migrator;
    use chrono::NaiveTime;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    async fn repo() -> UserRepository {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        UserRepository::new(db)
    }

    fn dto(username: &str) -> CreateUserDto {
        CreateUserDto {
            username: username.to_string(),
            password: "segredo123".to_string(),
            role: UserRole::User,
            access_start: None,
            access_end: None,
        }
    }

    #[tokio::test]
    async fn create_and_find_user() {
        let repo = repo().await;
        let created = repo.create(dto("joao")).await.unwrap();
        assert_eq!(created.role, UserRole::User);

        let found = repo.find_by_username("joao").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(found.access_window().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let repo = repo().await;
        repo.create(dto("joao")).await.unwrap();

        let err = repo.create(dto("joao")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_access_overwrites_role_and_window() {
        let repo = repo().await;
        let created = repo.create(dto("maria")).await.unwrap();

        let start = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        let updated = repo
            .update_access(
                &created.id,
                UpdateUserDto {
                    role: UserRole::Admin,
                    access_start: Some(start),
                    access_end: Some(end),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, UserRole::Admin);
        assert_eq!(updated.access_start, Some(start));

        // Clearing the window works the same way
        let cleared = repo
            .update_access(
                &created.id,
                UpdateUserDto {
                    role: UserRole::User,
                    access_start: None,
                    access_end: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(cleared.access_window().is_none());
    }

    #[tokio::test]
    async fn far_out_of_range_page_is_just_empty() {
        let repo = repo().await;
        repo.create(dto("joao")).await.unwrap();

        // Offset arithmetic must not overflow u32
        let page = repo.list(50_000_000, 100).await.unwrap();
        assert_eq!(page.total, 1);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let repo = repo().await;
        let err = repo.delete("no-such-id").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
