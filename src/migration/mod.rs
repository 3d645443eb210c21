//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_projects;
mod m20260301_000002_create_documents;
mod m20260301_000003_create_milestone_records;
mod m20260301_000004_create_document_files;
mod m20260301_000005_create_file_activity_logs;
mod m20260301_000006_create_api_keys;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_projects::Migration),
            Box::new(m20260301_000002_create_documents::Migration),
            Box::new(m20260301_000003_create_milestone_records::Migration),
            Box::new(m20260301_000004_create_document_files::Migration),
            Box::new(m20260301_000005_create_file_activity_logs::Migration),
            Box::new(m20260301_000006_create_api_keys::Migration),
        ]
    }
}
