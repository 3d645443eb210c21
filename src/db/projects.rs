//! Database queries for projects.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::project::{self, ActiveModel, Entity as Project};
use crate::error::{AppError, AppResult};
use crate::models::{CreateProjectRequest, ProjectStatus, UpdateProjectRequest};
use crate::services::workflow;

use super::DbPool;

impl DbPool {
    /// Insert a new project.
    pub async fn insert_project(&self, req: &CreateProjectRequest) -> AppResult<project::Model> {
        let now = Utc::now();

        // A project created directly as Completed gets its finish stamp immediately
        let finished_at = workflow::project_finished_at(
            ProjectStatus::Active,
            req.status,
            None,
            now,
        );

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(req.name.clone()),
            description: Set(req.description.clone()),
            status: Set(req.status.as_str().to_string()),
            finished_at: Set(finished_at),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert project: {}", e)))?;

        Ok(result)
    }

    /// Get a project by ID.
    pub async fn get_project_by_id(&self, id: Uuid) -> AppResult<Option<project::Model>> {
        let result = Project::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get project: {}", e)))?;

        Ok(result)
    }

    /// List all projects, oldest first.
    pub async fn list_projects(&self) -> AppResult<Vec<project::Model>> {
        let results = Project::find()
            .order_by_asc(project::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list projects: {}", e)))?;

        Ok(results)
    }

    /// Update a project, applying the finished_at transition rule.
    pub async fn update_project(
        &self,
        id: Uuid,
        req: &UpdateProjectRequest,
    ) -> AppResult<project::Model> {
        let existing = self
            .get_project_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {}", id)))?;

        let previous_status =
            ProjectStatus::parse(&existing.status).unwrap_or(ProjectStatus::Active);
        let finished_at = workflow::project_finished_at(
            previous_status,
            req.status,
            existing.finished_at,
            Utc::now(),
        );

        let mut active: ActiveModel = existing.into();
        active.name = Set(req.name.clone());
        active.description = Set(req.description.clone());
        active.status = Set(req.status.as_str().to_string());
        active.finished_at = Set(finished_at);

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update project: {}", e)))?;

        Ok(result)
    }

    /// Delete a project. Documents, milestone records, attachments, and
    /// activity logs go with it via foreign-key cascade.
    pub async fn delete_project(&self, id: Uuid) -> AppResult<u64> {
        let result = Project::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete project: {}", e)))?;

        Ok(result.rows_affected)
    }
}
