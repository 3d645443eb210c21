//! Database queries for milestone records.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entity::{document, milestone_record};
use crate::error::{AppError, AppResult};
use crate::models::{Stage, WorkStatus};
use crate::services::workflow::{ApprovalFields, StatusFields};

use super::DbPool;

impl DbPool {
    /// Get a milestone record by ID.
    pub async fn get_milestone_by_id(
        &self,
        id: Uuid,
    ) -> AppResult<Option<milestone_record::Model>> {
        let result = milestone_record::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get milestone record: {}", e)))?;

        Ok(result)
    }

    /// Get a milestone record together with its owning document.
    pub async fn get_milestone_with_document(
        &self,
        id: Uuid,
    ) -> AppResult<Option<(milestone_record::Model, document::Model)>> {
        let result = milestone_record::Entity::find_by_id(id)
            .find_also_related(document::Entity)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get milestone record: {}", e)))?;

        match result {
            Some((record, Some(doc))) => Ok(Some((record, doc))),
            Some((record, None)) => Err(AppError::Database(format!(
                "Milestone record {} has no owning document",
                record.id
            ))),
            None => Ok(None),
        }
    }

    /// Persist resolved status fields (from the workflow write boundary).
    pub async fn update_milestone_status(
        &self,
        id: Uuid,
        fields: StatusFields,
    ) -> AppResult<milestone_record::Model> {
        let record = self
            .get_milestone_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Milestone record {}", id)))?;

        let mut active: milestone_record::ActiveModel = record.into();
        active.status_description = Set(fields.status.as_str().to_string());
        active.actual_start = Set(fields.actual_start);
        active.actual_submit = Set(fields.actual_submit);

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update status: {}", e)))?;

        Ok(result)
    }

    /// Persist resolved approval fields (from the workflow write boundary).
    pub async fn update_milestone_approval(
        &self,
        id: Uuid,
        fields: ApprovalFields,
    ) -> AppResult<milestone_record::Model> {
        let record = self
            .get_milestone_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Milestone record {}", id)))?;

        let mut active: milestone_record::ActiveModel = record.into();
        active.approval_status = Set(fields.status.as_str().to_string());
        active.approval_comment = Set(fields.comment);

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update approval: {}", e)))?;

        Ok(result)
    }

    /// Promote every Start record of one stage whose actual_start predates the
    /// cutoff. Idempotent: promoted rows no longer match the predicate.
    pub async fn promote_stale_milestones(
        &self,
        stage: Stage,
        cutoff: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = milestone_record::Entity::update_many()
            .col_expr(
                milestone_record::Column::StatusDescription,
                Expr::value(WorkStatus::InProgress.as_str()),
            )
            .filter(milestone_record::Column::Stage.eq(stage.as_str()))
            .filter(
                milestone_record::Column::StatusDescription.eq(WorkStatus::Start.as_str()),
            )
            .filter(milestone_record::Column::ActualStart.lt(cutoff))
            .exec(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to promote {} records: {}", stage, e))
            })?;

        Ok(result.rows_affected)
    }
}
