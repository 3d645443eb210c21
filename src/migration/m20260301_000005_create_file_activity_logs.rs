//! Migration: Create file_activity_logs table.
//!
//! Append-only audit trail of upload/download actions per milestone record.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE file_activity_logs (
                    id UUID PRIMARY KEY,
                    milestone_record_id UUID NOT NULL
                        REFERENCES milestone_records(id) ON DELETE CASCADE,
                    document_file_id UUID
                        REFERENCES document_files(id) ON DELETE SET NULL,
                    action VARCHAR(10) NOT NULL
                        CHECK (action IN ('upload', 'download')),
                    actor VARCHAR(100) NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for the last-N activity view, newest first
                CREATE INDEX idx_file_activity_logs_milestone
                    ON file_activity_logs(milestone_record_id, created_at DESC);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS file_activity_logs CASCADE;")
            .await?;

        Ok(())
    }
}
