//! Create log_entries table migration
//!
//! No foreign key to users: entries keep a denormalized username and must
//! survive user deletion.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LogEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LogEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LogEntries::UserId).string().not_null())
                    .col(
                        ColumnDef::new(LogEntries::Username)
                            .string_len(80)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LogEntries::Command)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LogEntries::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing is always newest-first
        manager
            .create_index(
                Index::create()
                    .name("idx_log_entries_timestamp")
                    .table(LogEntries::Table)
                    .col(LogEntries::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LogEntries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum LogEntries {
    Table,
    Id,
    UserId,
    Username,
    Command,
    Timestamp,
}
