use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
    Set,
};

use crate::domain::{
    DomainError, DomainResult, LogEntry, LogRepositoryInterface, NewLogEntry, PaginatedResult,
};
use crate::infrastructure::database::entities::log_entry;

/// Append-only audit log store. No update or delete paths exist on purpose.
pub struct LogRepository {
    db: DatabaseConnection,
}

impl LogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

#[async_trait]
impl LogRepositoryInterface for LogRepository {
    async fn append(&self, entry: NewLogEntry) -> DomainResult<LogEntry> {
        let model = log_entry::ActiveModel {
            user_id: Set(entry.user_id),
            username: Set(entry.username),
            command: Set(entry.command),
            timestamp: Set(Utc::now()),
            ..Default::default()
        };

        let inserted = model.insert(&self.db).await.map_err(db_err)?;

        Ok(inserted.into())
    }

    async fn list(&self, page: u32, page_size: u32) -> DomainResult<PaginatedResult<LogEntry>> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);

        let query = log_entry::Entity::find()
            .order_by_desc(log_entry::Column::Timestamp)
            .order_by_desc(log_entry::Column::Id);

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let offset = (page as u64 - 1) * page_size as u64;
        let models = query
            .offset(offset)
            .limit(page_size as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items: Vec<LogEntry> = models.into_iter().map(LogEntry::from).collect();

        Ok(PaginatedResult::new(items, total, page, page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::migrator::Migrator;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    async fn repo() -> LogRepository {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        LogRepository::new(db)
    }

    fn entry(command: &str) -> NewLogEntry {
        NewLogEntry {
            user_id: "u1".to_string(),
            username: "joao".to_string(),
            command: command.to_string(),
        }
    }

    #[tokio::test]
    async fn append_preserves_user_reference() {
        let repo = repo().await;
        let stored = repo.append(entry("Gate externo open")).await.unwrap();

        assert_eq!(stored.user_id, "u1");
        assert_eq!(stored.username, "joao");
        assert_eq!(stored.command, "Gate externo open");
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paginated() {
        let repo = repo().await;
        for i in 0..5 {
            repo.append(entry(&format!("cmd-{}", i))).await.unwrap();
        }

        let page1 = repo.list(1, 2).await.unwrap();
        assert_eq!(page1.total, 5);
        assert_eq!(page1.items.len(), 2);
        assert_eq!(page1.items[0].command, "cmd-4");
        assert_eq!(page1.items[1].command, "cmd-3");

        let page3 = repo.list(3, 2).await.unwrap();
        assert_eq!(page3.items.len(), 1);
        assert_eq!(page3.items[0].command, "cmd-0");
    }
}
