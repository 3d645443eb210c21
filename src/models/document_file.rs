//! Attachment and activity-log DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::milestone::Stage;

/// One uploaded attachment.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DocumentFileResponse {
    /// Attachment UUID.
    pub id: Uuid,
    /// Owning milestone record.
    pub milestone_record_id: Uuid,
    /// Stage the attachment belongs to.
    pub stage: Stage,
    /// Original file name.
    pub file_name: String,
    /// MIME type as reported at upload.
    pub file_type: Option<String>,
    /// Size in bytes.
    pub file_size: Option<i64>,
    /// Name of the uploader.
    pub uploaded_by: String,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

/// A file that was rejected during upload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RejectedFile {
    pub file: String,
    pub reason: String,
}

/// Upload response: per-file accept/reject outcome.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadFilesResponse {
    pub files_accepted: Vec<DocumentFileResponse>,
    pub files_rejected: Vec<RejectedFile>,
}

/// Attachment list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileListResponse {
    pub files: Vec<DocumentFileResponse>,
}

/// One entry of the append-only upload/download audit trail.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileActivityEntry {
    pub id: Uuid,
    /// "upload" or "download".
    pub action: String,
    /// Name of the acting caller.
    pub actor: String,
    pub created_at: DateTime<Utc>,
}

/// Activity log response (most recent first).
#[derive(Debug, Serialize, ToSchema)]
pub struct FileActivityResponse {
    pub entries: Vec<FileActivityEntry>,
}
