//! Business logic services.

pub mod api_key;
pub mod auth_admin;
pub mod escalation;
pub mod grouping;
pub mod storage;
pub mod validation;
pub mod workflow;

pub use auth_admin::configure_routes as configure_auth_routes;
pub use escalation::{start_escalation_task, EscalationConfig, SweepSummary};
pub use storage::Storage;
