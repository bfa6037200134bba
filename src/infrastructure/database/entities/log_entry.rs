//! Audit log entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain;

/// Audit log model. Rows are inserted once and never updated or deleted by
/// the application.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "log_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub username: String,
    pub command: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for domain::LogEntry {
    fn from(model: Model) -> Self {
        domain::LogEntry {
            id: model.id,
            user_id: model.user_id,
            username: model.username,
            command: model.command,
            timestamp: model.timestamp,
        }
    }
}
