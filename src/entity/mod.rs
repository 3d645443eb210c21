//! SeaORM entity definitions for PostgreSQL database.

pub mod api_key;
pub mod document;
pub mod document_file;
pub mod file_activity_log;
pub mod milestone_record;
pub mod project;
