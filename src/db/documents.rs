//! Database queries for documents and their milestone records.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entity::{document, milestone_record};
use crate::error::{AppError, AppResult};
use crate::models::{
    ApprovalStatus, CreateDocumentRequest, Stage, UpdateDocumentInfoRequest, WorkStatus,
};

use super::DbPool;

impl DbPool {
    /// Create a document together with its three milestone records in one
    /// transaction. All stages start as Not Yet / Pending.
    pub async fn insert_document(
        &self,
        project_id: Uuid,
        req: &CreateDocumentRequest,
    ) -> AppResult<(document::Model, Vec<milestone_record::Model>)> {
        let now = Utc::now();
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let doc = document::ActiveModel {
            id: Set(Uuid::now_v7()),
            project_id: Set(project_id),
            field: Set(req.field.as_str().to_string()),
            file_name: Set(req.file_name.clone()),
            document_number: Set(req.document_number.clone()),
            pic: Set(req.pic.clone()),
            discipline: Set(req.discipline.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let doc = doc.insert(&txn).await.map_err(|e| {
            AppError::Database(format!("Failed to insert document: {}", e))
        })?;

        let mut milestones = Vec::with_capacity(Stage::ALL.len());
        for stage in Stage::ALL {
            let targets = req.targets(stage);
            let record = milestone_record::ActiveModel {
                id: Set(Uuid::now_v7()),
                document_id: Set(doc.id),
                stage: Set(stage.as_str().to_string()),
                status_description: Set(WorkStatus::NotYet.as_str().to_string()),
                target_start: Set(targets.target_start),
                actual_start: Set(None),
                target_submit: Set(targets.target_submit),
                actual_submit: Set(None),
                approval_status: Set(ApprovalStatus::Pending.as_str().to_string()),
                approval_comment: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            };
            let record = record.insert(&txn).await.map_err(|e| {
                AppError::Database(format!("Failed to insert {} record: {}", stage, e))
            })?;
            milestones.push(record);
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit document: {}", e)))?;

        Ok((doc, milestones))
    }

    /// Get a document by ID.
    pub async fn get_document_by_id(&self, id: Uuid) -> AppResult<Option<document::Model>> {
        let result = document::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get document: {}", e)))?;

        Ok(result)
    }

    /// List a project's documents with their milestone records, in creation order.
    pub async fn list_documents_with_milestones(
        &self,
        project_id: Uuid,
    ) -> AppResult<Vec<(document::Model, Vec<milestone_record::Model>)>> {
        let results = document::Entity::find()
            .filter(document::Column::ProjectId.eq(project_id))
            .order_by_asc(document::Column::CreatedAt)
            .find_with_related(milestone_record::Entity)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list documents: {}", e)))?;

        Ok(results)
    }

    /// Update a document's header info, and optionally one stage's target dates.
    pub async fn update_document_info(
        &self,
        id: Uuid,
        req: &UpdateDocumentInfoRequest,
    ) -> AppResult<document::Model> {
        let existing = self
            .get_document_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document {}", id)))?;

        let mut active: document::ActiveModel = existing.into();
        active.field = Set(req.field.as_str().to_string());
        active.file_name = Set(req.file_name.clone());
        active.document_number = Set(req.document_number.clone());
        active.pic = Set(req.pic.clone());
        active.discipline = Set(req.discipline.clone());

        let doc = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update document: {}", e)))?;

        if let Some(stage) = req.stage {
            let record = milestone_record::Entity::find()
                .filter(milestone_record::Column::DocumentId.eq(id))
                .filter(milestone_record::Column::Stage.eq(stage.as_str()))
                .one(self.connection())
                .await
                .map_err(|e| AppError::Database(format!("Failed to get {} record: {}", stage, e)))?
                .ok_or_else(|| AppError::NotFound(format!("{} record for document {}", stage, id)))?;

            let mut active: milestone_record::ActiveModel = record.into();
            active.target_start = Set(req.target_start);
            active.target_submit = Set(req.target_submit);
            active
                .update(self.connection())
                .await
                .map_err(|e| {
                    AppError::Database(format!("Failed to update {} targets: {}", stage, e))
                })?;
        }

        Ok(doc)
    }

    /// Delete a document. Milestone records, attachments, and activity logs
    /// go with it via foreign-key cascade.
    pub async fn delete_document(&self, id: Uuid) -> AppResult<u64> {
        let result = document::Entity::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete document: {}", e)))?;

        Ok(result.rows_affected)
    }

    /// Distinct PIC names within a project, for the filter dropdown.
    pub async fn distinct_pics(&self, project_id: Uuid) -> AppResult<Vec<String>> {
        let mut pics: Vec<String> = document::Entity::find()
            .select_only()
            .column(document::Column::Pic)
            .filter(document::Column::ProjectId.eq(project_id))
            .filter(document::Column::Pic.is_not_null())
            .distinct()
            .into_tuple()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list PICs: {}", e)))?;

        pics.sort();
        Ok(pics)
    }
}
