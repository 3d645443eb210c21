//! Migration: Create documents table.
//!
//! One row per tracked document. Header fields shared by the three milestone
//! stages live here, so header edits touch a single row.

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
                CREATE TABLE documents (
                    id UUID PRIMARY KEY,
                    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                    field VARCHAR(20) NOT NULL
                        CHECK (field IN ('Limau', 'OK-RT', 'Prabumulih')),
                    file_name VARCHAR(255) NOT NULL,
                    document_number VARCHAR(50),
                    pic VARCHAR(100),
                    discipline VARCHAR(100),

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                    -- A file name identifies a document within its project
                    CONSTRAINT uq_documents_project_file_name UNIQUE (project_id, file_name)
                );

                -- Index for per-project listing
                CREATE INDEX idx_documents_project_id ON documents(project_id);

                -- Index for the field filter
                CREATE INDEX idx_documents_field ON documents(field);

                -- Index for the PIC filter and sort
                CREATE INDEX idx_documents_pic ON documents(pic);

                -- Trigger to update updated_at
                CREATE TRIGGER update_documents_updated_at
                    BEFORE UPDATE ON documents
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_documents_updated_at ON documents;
                DROP TABLE IF EXISTS documents CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
