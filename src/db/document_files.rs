//! Database queries for attachments and their activity log.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};
use uuid::Uuid;

use crate::entity::{document_file, file_activity_log, milestone_record};
use crate::error::{AppError, AppResult};

use super::DbPool;

/// How many activity entries the API surfaces per milestone record.
pub const ACTIVITY_LOG_LIMIT: u64 = 10;

impl DbPool {
    /// Insert an attachment row. The caller supplies the ID because it is
    /// baked into the S3 key.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_document_file(
        &self,
        id: Uuid,
        milestone_record_id: Uuid,
        file_name: &str,
        file_path: &str,
        file_type: Option<&str>,
        file_size: Option<i64>,
        uploaded_by: &str,
    ) -> AppResult<document_file::Model> {
        let model = document_file::ActiveModel {
            id: Set(id),
            milestone_record_id: Set(milestone_record_id),
            file_name: Set(file_name.to_string()),
            file_path: Set(file_path.to_string()),
            file_type: Set(file_type.map(|s| s.to_string())),
            file_size: Set(file_size),
            uploaded_by: Set(uploaded_by.to_string()),
            uploaded_at: Set(Utc::now()),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert attachment: {}", e)))?;

        Ok(result)
    }

    /// Get an attachment by ID.
    pub async fn get_document_file_by_id(
        &self,
        id: Uuid,
    ) -> AppResult<Option<document_file::Model>> {
        let result = document_file::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get attachment: {}", e)))?;

        Ok(result)
    }

    /// List a milestone record's attachments, newest first.
    pub async fn list_document_files(
        &self,
        milestone_record_id: Uuid,
    ) -> AppResult<Vec<document_file::Model>> {
        let results = document_file::Entity::find()
            .filter(document_file::Column::MilestoneRecordId.eq(milestone_record_id))
            .order_by_desc(document_file::Column::UploadedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list attachments: {}", e)))?;

        Ok(results)
    }

    /// Delete an attachment row.
    pub async fn delete_document_file(&self, id: Uuid) -> AppResult<u64> {
        let result = document_file::Entity::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete attachment: {}", e)))?;

        Ok(result.rows_affected)
    }

    /// S3 keys of every attachment under a document, for cleanup before a
    /// cascade delete.
    pub async fn list_file_paths_for_document(&self, document_id: Uuid) -> AppResult<Vec<String>> {
        let paths: Vec<String> = document_file::Entity::find()
            .select_only()
            .column(document_file::Column::FilePath)
            .join(
                JoinType::InnerJoin,
                document_file::Relation::MilestoneRecord.def(),
            )
            .filter(milestone_record::Column::DocumentId.eq(document_id))
            .into_tuple()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list attachment paths: {}", e)))?;

        Ok(paths)
    }

    /// Append an activity log entry.
    pub async fn insert_file_activity(
        &self,
        milestone_record_id: Uuid,
        document_file_id: Option<Uuid>,
        action: &str,
        actor: &str,
    ) -> AppResult<()> {
        let model = file_activity_log::ActiveModel {
            id: Set(Uuid::now_v7()),
            milestone_record_id: Set(milestone_record_id),
            document_file_id: Set(document_file_id),
            action: Set(action.to_string()),
            actor: Set(actor.to_string()),
            created_at: Set(Utc::now()),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to log file activity: {}", e)))?;

        Ok(())
    }

    /// Most recent activity entries for a milestone record.
    pub async fn list_file_activity(
        &self,
        milestone_record_id: Uuid,
    ) -> AppResult<Vec<file_activity_log::Model>> {
        let results = file_activity_log::Entity::find()
            .filter(file_activity_log::Column::MilestoneRecordId.eq(milestone_record_id))
            .order_by_desc(file_activity_log::Column::CreatedAt)
            .limit(ACTIVITY_LOG_LIMIT)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list file activity: {}", e)))?;

        Ok(results)
    }
}
