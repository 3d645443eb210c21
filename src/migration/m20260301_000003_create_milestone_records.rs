//! Migration: Create milestone_records table.
//!
//! One row per (document, stage). The escalation sweep's bulk update runs
//! against the partial index on Start rows.

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
                CREATE TABLE milestone_records (
                    id UUID PRIMARY KEY,
                    document_id UUID NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
                    stage VARCHAR(3) NOT NULL
                        CHECK (stage IN ('IFR', 'IFA', 'IFB')),
                    status_description VARCHAR(20) NOT NULL DEFAULT 'Not Yet'
                        CHECK (status_description IN ('Not Yet', 'Start', 'In-Progress', 'Complete')),

                    target_start TIMESTAMPTZ,
                    actual_start TIMESTAMPTZ,
                    target_submit TIMESTAMPTZ,
                    actual_submit TIMESTAMPTZ,

                    approval_status VARCHAR(20) NOT NULL DEFAULT 'Pending'
                        CHECK (approval_status IN ('Pending', 'Approved', 'Denied', 'Denied with Comment')),
                    approval_comment VARCHAR(1000),

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                    -- Exactly one record per (document, stage)
                    CONSTRAINT uq_milestone_records_document_stage UNIQUE (document_id, stage),

                    -- Comment present exactly when denied with comment
                    CONSTRAINT ck_milestone_records_comment CHECK (
                        (approval_status = 'Denied with Comment') = (approval_comment IS NOT NULL)
                    )
                );

                -- Index for per-document lookup
                CREATE INDEX idx_milestone_records_document_id ON milestone_records(document_id);

                -- Partial index backing the escalation sweep predicate
                CREATE INDEX idx_milestone_records_stale_start
                    ON milestone_records(stage, actual_start)
                    WHERE status_description = 'Start';

                -- Trigger to update updated_at
                CREATE TRIGGER update_milestone_records_updated_at
                    BEFORE UPDATE ON milestone_records
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
                DROP TRIGGER IF EXISTS update_milestone_records_updated_at ON milestone_records;
                DROP TABLE IF EXISTS milestone_records CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
