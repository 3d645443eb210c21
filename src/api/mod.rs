//! API endpoint modules.

pub mod documents;
pub mod escalation;
pub mod files;
pub mod health;
pub mod openapi;
pub mod projects;

pub use documents::configure_routes as configure_document_routes;
pub use escalation::configure_routes as configure_escalation_routes;
pub use files::configure_routes as configure_file_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use projects::configure_routes as configure_project_routes;
