//! Document and milestone API handlers.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    Action, CreateDocumentRequest, DocumentListResponse, EditApprovalRequest, EditStatusRequest,
    ListDocumentsQuery, PicListResponse, RecapResponse, UpdateDocumentInfoRequest, WorkStatus,
};
use crate::services::{Storage, grouping, validation, workflow};

/// Create a document with its three milestone records.
///
/// All stages start as Not Yet / Pending; target dates may be supplied per
/// stage.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/documents",
    tag = "Documents",
    params(("id" = Uuid, Path, description = "Project UUID")),
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document created", body = crate::models::DocumentGroup),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[post("/projects/{id}/documents")]
pub async fn create_document(
    auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
    body: web::Json<CreateDocumentRequest>,
) -> AppResult<HttpResponse> {
    if !Action::AddDocument.allowed_for(auth.caller.role) {
        return Err(AppError::Forbidden(
            "Admin or reviewer role required to add documents".to_string(),
        ));
    }

    let project_id = path.into_inner();
    pool.get_project_by_id(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {}", project_id)))?;

    let mut req = body.into_inner();
    validation::normalize_create_document(&mut req)?;

    let (doc, milestones) = pool.insert_document(project_id, &req).await?;

    info!(
        "Document created: id={}, file_name={}, project={}",
        doc.id, doc.file_name, project_id
    );

    let rows = vec![(doc, milestones)];
    let group = grouping::group_documents(&rows, &ListDocumentsQuery::default())
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Database("Created document did not group".to_string()))?;

    Ok(HttpResponse::Created().json(group))
}

/// Grouped document listing with filters.
///
/// `fields` is a comma-separated field list ("all" disables the filter),
/// `pic` matches one PIC exactly, and `stage` restricts which milestone
/// slots are populated without dropping groups.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/documents",
    tag = "Documents",
    params(
        ("id" = Uuid, Path, description = "Project UUID"),
        ("fields" = Option<String>, Query, description = "Comma-separated field areas or 'all'"),
        ("pic" = Option<String>, Query, description = "PIC name or 'all'"),
        ("stage" = Option<String>, Query, description = "ALL | IFR | IFA | IFB"),
    ),
    responses(
        (status = 200, description = "Grouped documents", body = DocumentListResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[get("/projects/{id}/documents")]
pub async fn list_documents(
    _auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
    query: web::Query<ListDocumentsQuery>,
) -> AppResult<HttpResponse> {
    let project_id = path.into_inner();
    let rows = pool.list_documents_with_milestones(project_id).await?;
    let documents = grouping::group_documents(&rows, &query);
    let total = documents.len();

    Ok(HttpResponse::Ok().json(DocumentListResponse { documents, total }))
}

/// Recap view: one row per document, print/export ordering.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/documents/recap",
    tag = "Documents",
    params(("id" = Uuid, Path, description = "Project UUID")),
    responses(
        (status = 200, description = "Recap rows", body = RecapResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[get("/projects/{id}/documents/recap")]
pub async fn recap_documents(
    _auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let project_id = path.into_inner();
    let rows = pool.list_documents_with_milestones(project_id).await?;

    Ok(HttpResponse::Ok().json(RecapResponse {
        rows: grouping::recap(&rows),
    }))
}

/// Distinct PIC names within a project.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/pics",
    tag = "Documents",
    params(("id" = Uuid, Path, description = "Project UUID")),
    responses(
        (status = 200, description = "PIC names", body = PicListResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[get("/projects/{id}/pics")]
pub async fn list_pics(
    _auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let project_id = path.into_inner();
    let pics = pool.distinct_pics(project_id).await?;

    Ok(HttpResponse::Ok().json(PicListResponse { pics }))
}

/// Edit a document's header info and optionally one stage's target dates.
///
/// The header lives on the document row, so the change is observed from all
/// three milestone views at once.
#[utoipa::path(
    put,
    path = "/api/v1/documents/{id}/info",
    tag = "Documents",
    params(("id" = Uuid, Path, description = "Document UUID")),
    request_body = UpdateDocumentInfoRequest,
    responses(
        (status = 200, description = "Document updated", body = crate::models::DocumentGroup),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[put("/documents/{id}/info")]
pub async fn update_document_info(
    auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
    body: web::Json<UpdateDocumentInfoRequest>,
) -> AppResult<HttpResponse> {
    if !Action::EditFileInfo.allowed_for(auth.caller.role) {
        return Err(AppError::Forbidden(
            "Admin or reviewer role required to edit file information".to_string(),
        ));
    }

    let id = path.into_inner();
    let mut req = body.into_inner();
    validation::normalize_update_document(&mut req)?;

    let doc = pool.update_document_info(id, &req).await?;
    let rows = pool.list_documents_with_milestones(doc.project_id).await?;
    let group = grouping::group_documents(&rows, &ListDocumentsQuery::default())
        .into_iter()
        .find(|g| g.header.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Document {}", id)))?;

    Ok(HttpResponse::Ok().json(group))
}

/// Direct status edit on one milestone record.
///
/// Moving to Not Yet clears both actual dates. Date ordering is not
/// re-validated; the submit explanation stays advisory.
#[utoipa::path(
    put,
    path = "/api/v1/milestones/{id}/status",
    tag = "Milestones",
    params(("id" = Uuid, Path, description = "Milestone record UUID")),
    request_body = EditStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = crate::models::MilestoneView),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[put("/milestones/{id}/status")]
pub async fn edit_milestone_status(
    auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
    body: web::Json<EditStatusRequest>,
) -> AppResult<HttpResponse> {
    if !Action::EditStatus.allowed_for(auth.caller.role) {
        return Err(AppError::Forbidden(
            "Admin or user role required to edit status".to_string(),
        ));
    }

    let id = path.into_inner();
    let record = pool
        .get_milestone_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Milestone record {}", id)))?;

    let fields = workflow::apply_status_edit(record.actual_start, &body);
    let updated = pool.update_milestone_status(id, fields).await?;

    Ok(HttpResponse::Ok().json(grouping::milestone_view(&updated)))
}

/// The "Start Ticket" transition: Not Yet -> Start, stamping actual_start.
#[utoipa::path(
    post,
    path = "/api/v1/milestones/{id}/start",
    tag = "Milestones",
    params(("id" = Uuid, Path, description = "Milestone record UUID")),
    responses(
        (status = 200, description = "Ticket started", body = crate::models::MilestoneView),
        (status = 400, description = "Ticket not in Not Yet", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[post("/milestones/{id}/start")]
pub async fn start_milestone(
    auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    if !Action::EditStatus.allowed_for(auth.caller.role) {
        return Err(AppError::Forbidden(
            "Admin or user role required to start a ticket".to_string(),
        ));
    }

    let id = path.into_inner();
    let record = pool
        .get_milestone_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Milestone record {}", id)))?;

    let current = WorkStatus::parse(&record.status_description).unwrap_or_default();
    let fields = workflow::start_ticket(current, Utc::now())?;
    let updated = pool.update_milestone_status(id, fields).await?;

    info!("Ticket started: milestone={}, stage={}", id, updated.stage);

    Ok(HttpResponse::Ok().json(grouping::milestone_view(&updated)))
}

/// Set a milestone's approval state.
///
/// Denied with Comment requires a non-empty comment; any other status clears
/// the stored comment.
#[utoipa::path(
    put,
    path = "/api/v1/milestones/{id}/approval",
    tag = "Milestones",
    params(("id" = Uuid, Path, description = "Milestone record UUID")),
    request_body = EditApprovalRequest,
    responses(
        (status = 200, description = "Approval updated", body = crate::models::MilestoneView),
        (status = 400, description = "Missing comment", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[put("/milestones/{id}/approval")]
pub async fn edit_milestone_approval(
    auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
    body: web::Json<EditApprovalRequest>,
) -> AppResult<HttpResponse> {
    if !Action::Approve.allowed_for(auth.caller.role) {
        return Err(AppError::Forbidden(
            "Admin or approver role required to update approval".to_string(),
        ));
    }

    let id = path.into_inner();
    let mut req = body.into_inner();
    req.approval_comment = validation::approval_comment(req.approval_comment.as_deref())?;

    let fields = workflow::apply_approval_edit(&req)?;
    let updated = pool.update_milestone_approval(id, fields).await?;

    Ok(HttpResponse::Ok().json(grouping::milestone_view(&updated)))
}

/// Delete a document: all three milestone records, attachments, and activity
/// logs go with it. S3 objects are removed best-effort after the row delete.
#[utoipa::path(
    delete,
    path = "/api/v1/documents/{id}",
    tag = "Documents",
    params(("id" = Uuid, Path, description = "Document UUID")),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[delete("/documents/{id}")]
pub async fn delete_document(
    auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
) -> AppResult<HttpResponse> {
    if !Action::DeleteDocument.allowed_for(auth.caller.role) {
        return Err(AppError::Forbidden(
            "Admin role required to delete documents".to_string(),
        ));
    }

    let id = path.into_inner();

    // Collect attachment keys before the cascade removes the rows
    let file_paths = pool.list_file_paths_for_document(id).await?;

    let affected = pool.delete_document(id).await?;
    if affected == 0 {
        return Err(AppError::NotFound(format!("Document {}", id)));
    }

    for key in &file_paths {
        if let Err(e) = storage.remove(key).await {
            warn!("Failed to delete attachment {} from storage: {}", key, e);
        }
    }

    info!(
        "Document deleted: id={}, attachments_removed={}",
        id,
        file_paths.len()
    );

    Ok(HttpResponse::NoContent().finish())
}

/// Configure document and milestone routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_document)
        .service(list_documents)
        .service(recap_documents)
        .service(list_pics)
        .service(update_document_info)
        .service(edit_milestone_status)
        .service(start_milestone)
        .service(edit_milestone_approval)
        .service(delete_document);
}
