//! Migration: Create document_files table.
//!
//! Attachments uploaded against a milestone record; the bytes live in S3.

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
                CREATE TABLE document_files (
                    id UUID PRIMARY KEY,
                    milestone_record_id UUID NOT NULL
                        REFERENCES milestone_records(id) ON DELETE CASCADE,
                    file_name VARCHAR(255) NOT NULL,
                    file_path VARCHAR(512) NOT NULL,
                    file_type VARCHAR(100),
                    file_size BIGINT,
                    uploaded_by VARCHAR(100) NOT NULL,
                    uploaded_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for per-milestone listing, newest first
                CREATE INDEX idx_document_files_milestone
                    ON document_files(milestone_record_id, uploaded_at DESC);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS document_files CASCADE;")
            .await?;

        Ok(())
    }
}
