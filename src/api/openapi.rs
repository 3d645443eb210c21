//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models, services};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Document Tracking Server",
        version = "0.3.0",
        description = "API server for engineering document tracking across IFR/IFA/IFB submission milestones, with role-gated status and approval workflows"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Project endpoints
        api::projects::list_projects,
        api::projects::get_project,
        api::projects::create_project,
        api::projects::update_project,
        api::projects::delete_project,
        // Document endpoints
        api::documents::create_document,
        api::documents::list_documents,
        api::documents::recap_documents,
        api::documents::list_pics,
        api::documents::update_document_info,
        api::documents::delete_document,
        // Milestone endpoints
        api::documents::edit_milestone_status,
        api::documents::start_milestone,
        api::documents::edit_milestone_approval,
        // File endpoints
        api::files::upload_files,
        api::files::list_files,
        api::files::download_file,
        api::files::delete_file,
        api::files::file_activity,
        // Escalation
        api::escalation::run_escalation,
        // Auth endpoints
        services::auth_admin::create_api_key,
        services::auth_admin::list_api_keys,
        services::auth_admin::get_api_key,
        services::auth_admin::revoke_api_key,
        services::auth_admin::restore_api_key,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Projects
            models::ProjectStatus,
            models::CreateProjectRequest,
            models::UpdateProjectRequest,
            models::ProjectResponse,
            models::ProjectListResponse,
            // Documents
            models::FieldArea,
            models::StageTargets,
            models::CreateDocumentRequest,
            models::UpdateDocumentInfoRequest,
            models::DocumentHeader,
            models::DocumentGroup,
            models::DocumentListResponse,
            models::RecapRow,
            models::RecapResponse,
            models::PicListResponse,
            models::StageFilter,
            models::ListDocumentsQuery,
            // Milestones
            models::Stage,
            models::WorkStatus,
            models::ApprovalStatus,
            models::SubmitExplanation,
            models::MilestoneView,
            models::EditStatusRequest,
            models::EditApprovalRequest,
            // Files
            models::DocumentFileResponse,
            models::RejectedFile,
            models::UploadFilesResponse,
            models::FileListResponse,
            models::FileActivityEntry,
            models::FileActivityResponse,
            // Escalation
            services::SweepSummary,
            // Auth
            models::ApiKeyCreateResponse,
            models::ApiKeyListItem,
            models::CreateApiKeyRequest,
            services::auth_admin::ListApiKeysResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Projects", description = "Project management"),
        (name = "Documents", description = "Document tracking and grouped views"),
        (name = "Milestones", description = "Per-stage status and approval workflow"),
        (name = "Files", description = "Attachments and activity log"),
        (name = "Escalation", description = "Stale-ticket promotion sweep"),
        (name = "Auth", description = "API key management")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add API key security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new("X-API-Key"),
                    ),
                ),
            );
        }
    }
}
