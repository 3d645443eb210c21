//! Migration: Create projects table and shared trigger function.
//!
//! Projects group the tracked documents of one engineering effort.
//! Also creates the shared updated_at trigger function.

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
                -- Shared trigger function for updated_at
                CREATE OR REPLACE FUNCTION update_updated_at_column()
                RETURNS TRIGGER AS $$
                BEGIN
                    NEW.updated_at = NOW();
                    RETURN NEW;
                END;
                $$ LANGUAGE plpgsql;

                CREATE TABLE projects (
                    id UUID PRIMARY KEY,
                    name VARCHAR(255) NOT NULL,
                    description VARCHAR(1000),
                    status VARCHAR(20) NOT NULL DEFAULT 'Active'
                        CHECK (status IN ('Active', 'On Hold', 'Completed', 'Cancelled')),

                    -- Set exactly while status = 'Completed'
                    finished_at TIMESTAMPTZ,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for listing by status
                CREATE INDEX idx_projects_status ON projects(status);

                -- Index for listing by creation date
                CREATE INDEX idx_projects_created_at ON projects(created_at);

                -- Trigger to update updated_at
                CREATE TRIGGER update_projects_updated_at
                    BEFORE UPDATE ON projects
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
                DROP TRIGGER IF EXISTS update_projects_updated_at ON projects;
                DROP TABLE IF EXISTS projects CASCADE;
                DROP FUNCTION IF EXISTS update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }
}
