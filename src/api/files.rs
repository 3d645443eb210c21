//! Attachment API handlers.
//!
//! Uploads stream through the server into S3; the per-file size cap is
//! enforced before any byte reaches storage. Each upload and download is
//! appended to the milestone's activity log.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, delete, get, post, web};
use futures_util::StreamExt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::entity::{document_file, file_activity_log};
use crate::error::{AppError, AppResult};
use crate::models::{
    Action, DocumentFileResponse, FileActivityEntry, FileActivityResponse, FileListResponse,
    RejectedFile, Stage, UploadFilesResponse,
};
use crate::services::Storage;

fn file_response(model: &document_file::Model, stage: Stage) -> DocumentFileResponse {
    DocumentFileResponse {
        id: model.id,
        milestone_record_id: model.milestone_record_id,
        stage,
        file_name: model.file_name.clone(),
        file_type: model.file_type.clone(),
        file_size: model.file_size,
        uploaded_by: model.uploaded_by.clone(),
        uploaded_at: model.uploaded_at,
    }
}

fn activity_entry(model: &file_activity_log::Model) -> FileActivityEntry {
    FileActivityEntry {
        id: model.id,
        action: model.action.clone(),
        actor: model.actor.clone(),
        created_at: model.created_at,
    }
}

/// Upload one or more attachments to a milestone record.
///
/// Files over the size cap are rejected individually; the rest of the batch
/// still goes through.
#[utoipa::path(
    post,
    path = "/api/v1/milestones/{id}/files",
    tag = "Files",
    params(("id" = Uuid, Path, description = "Milestone record UUID")),
    responses(
        (status = 200, description = "Per-file outcome", body = UploadFilesResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Milestone not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[post("/milestones/{id}/files")]
pub async fn upload_files(
    auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    mut payload: Multipart,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    max_upload_size: web::Data<usize>,
) -> AppResult<HttpResponse> {
    if !Action::UploadFile.allowed_for(auth.caller.role) {
        return Err(AppError::Forbidden(
            "Viewer role cannot upload files".to_string(),
        ));
    }

    let milestone_id = path.into_inner();
    let (record, _doc) = pool
        .get_milestone_with_document(milestone_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Milestone record {}", milestone_id)))?;
    let stage = Stage::parse(&record.stage).unwrap_or(Stage::Ifr);

    let max_size = **max_upload_size;
    let mut files_accepted = Vec::new();
    let mut files_rejected: Vec<RejectedFile> = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let Some(filename) = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|f| f.to_string())
        else {
            // Non-file form fields are ignored
            continue;
        };
        let content_type = field.content_type().map(|m| m.to_string());

        // Stream the field into memory, bailing out as soon as the cap is hit
        let mut data: Vec<u8> = Vec::new();
        let mut oversized = false;
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            if data.len() + chunk.len() > max_size {
                oversized = true;
                break;
            }
            data.extend_from_slice(&chunk);
        }

        if oversized {
            // Drain the rest of the field so the multipart stream stays usable
            while let Some(chunk) = field.next().await {
                if chunk.is_err() {
                    break;
                }
            }
            files_rejected.push(RejectedFile {
                file: filename,
                reason: format!("Exceeds {}MB limit", max_size / 1024 / 1024),
            });
            continue;
        }

        let file_id = Uuid::now_v7();
        let key = Storage::attachment_key(milestone_id, file_id, &filename);
        let size = data.len() as i64;

        if let Err(e) = storage.put(&key, data, content_type.as_deref()).await {
            warn!("Failed to upload {} to storage: {}", filename, e);
            files_rejected.push(RejectedFile {
                file: filename,
                reason: "Storage upload failed".to_string(),
            });
            continue;
        }

        let model = pool
            .insert_document_file(
                file_id,
                milestone_id,
                &filename,
                &key,
                content_type.as_deref(),
                Some(size),
                &auth.caller.name,
            )
            .await?;

        pool.insert_file_activity(milestone_id, Some(file_id), "upload", &auth.caller.name)
            .await?;

        files_accepted.push(file_response(&model, stage));
    }

    info!(
        "Upload to milestone {}: {} accepted, {} rejected",
        milestone_id,
        files_accepted.len(),
        files_rejected.len()
    );

    Ok(HttpResponse::Ok().json(UploadFilesResponse {
        files_accepted,
        files_rejected,
    }))
}

/// List a milestone record's attachments, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/milestones/{id}/files",
    tag = "Files",
    params(("id" = Uuid, Path, description = "Milestone record UUID")),
    responses(
        (status = 200, description = "Attachments", body = FileListResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Milestone not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[get("/milestones/{id}/files")]
pub async fn list_files(
    _auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let milestone_id = path.into_inner();
    let record = pool
        .get_milestone_by_id(milestone_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Milestone record {}", milestone_id)))?;
    let stage = Stage::parse(&record.stage).unwrap_or(Stage::Ifr);

    let files = pool.list_document_files(milestone_id).await?;

    Ok(HttpResponse::Ok().json(FileListResponse {
        files: files.iter().map(|f| file_response(f, stage)).collect(),
    }))
}

/// Download an attachment, logging the access.
#[utoipa::path(
    get,
    path = "/api/v1/files/{id}/content",
    tag = "Files",
    params(("id" = Uuid, Path, description = "Attachment UUID")),
    responses(
        (status = 200, description = "File bytes"),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[get("/files/{id}/content")]
pub async fn download_file(
    auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let file = pool
        .get_document_file_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Attachment {}", id)))?;

    let (data, content_type) = storage.get(&file.file_path).await?;

    pool.insert_file_activity(
        file.milestone_record_id,
        Some(file.id),
        "download",
        &auth.caller.name,
    )
    .await?;

    let content_type = content_type.or(file.file_type).unwrap_or_else(|| {
        let ext = file.file_name.rsplit('.').next().unwrap_or("");
        Storage::content_type_for_extension(ext).to_string()
    });

    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file.file_name),
        ))
        .body(data))
}

/// Delete an attachment from the database and storage.
#[utoipa::path(
    delete,
    path = "/api/v1/files/{id}",
    tag = "Files",
    params(("id" = Uuid, Path, description = "Attachment UUID")),
    responses(
        (status = 204, description = "Attachment deleted"),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[delete("/files/{id}")]
pub async fn delete_file(
    auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
) -> AppResult<HttpResponse> {
    if !Action::DeleteFile.allowed_for(auth.caller.role) {
        return Err(AppError::Forbidden(
            "Admin or reviewer role required to delete files".to_string(),
        ));
    }

    let id = path.into_inner();
    let file = pool
        .get_document_file_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Attachment {}", id)))?;

    pool.delete_document_file(id).await?;

    if let Err(e) = storage.remove(&file.file_path).await {
        warn!("Failed to delete {} from storage: {}", file.file_path, e);
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Last activity entries (uploads/downloads) for a milestone record.
#[utoipa::path(
    get,
    path = "/api/v1/milestones/{id}/files/activity",
    tag = "Files",
    params(("id" = Uuid, Path, description = "Milestone record UUID")),
    responses(
        (status = 200, description = "Activity entries, newest first", body = FileActivityResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[get("/milestones/{id}/files/activity")]
pub async fn file_activity(
    _auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let milestone_id = path.into_inner();
    let entries = pool.list_file_activity(milestone_id).await?;

    Ok(HttpResponse::Ok().json(FileActivityResponse {
        entries: entries.iter().map(activity_entry).collect(),
    }))
}

/// Configure attachment routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(upload_files)
        .service(list_files)
        .service(file_activity)
        .service(download_file)
        .service(delete_file);
}
