//! Project API handlers.

use actix_web::{HttpResponse, delete, get, post, put, web};
use tracing::info;
use uuid::Uuid;

use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::entity::project;
use crate::error::{AppError, AppResult};
use crate::models::{
    Action, CreateProjectRequest, ProjectListResponse, ProjectResponse, ProjectStatus,
    UpdateProjectRequest,
};
use crate::services::validation;

fn project_response(model: project::Model) -> ProjectResponse {
    ProjectResponse {
        id: model.id,
        name: model.name,
        description: model.description,
        status: ProjectStatus::parse(&model.status).unwrap_or_default(),
        finished_at: model.finished_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// List all projects.
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    tag = "Projects",
    responses(
        (status = 200, description = "Projects", body = ProjectListResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[get("/projects")]
pub async fn list_projects(_auth: ApiKeyAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let projects = pool.list_projects().await?;

    Ok(HttpResponse::Ok().json(ProjectListResponse {
        projects: projects.into_iter().map(project_response).collect(),
    }))
}

/// Get a single project.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project UUID")),
    responses(
        (status = 200, description = "Project", body = ProjectResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[get("/projects/{id}")]
pub async fn get_project(
    _auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let project = pool
        .get_project_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {}", id)))?;

    Ok(HttpResponse::Ok().json(project_response(project)))
}

/// Create a project.
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    tag = "Projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[post("/projects")]
pub async fn create_project(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateProjectRequest>,
) -> AppResult<HttpResponse> {
    if !Action::ManageProjects.allowed_for(auth.caller.role) {
        return Err(AppError::Forbidden(
            "Admin or reviewer role required to create projects".to_string(),
        ));
    }

    let mut req = body.into_inner();
    req.name = validation::project_name(&req.name)?;
    req.description = validation::description(req.description.as_deref())?;

    let project = pool.insert_project(&req).await?;

    info!("Project created: id={}, name={}", project.id, project.name);

    Ok(HttpResponse::Created().json(project_response(project)))
}

/// Update a project.
///
/// Transitioning to Completed stamps finished_at; leaving Completed clears it.
#[utoipa::path(
    put,
    path = "/api/v1/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project UUID")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[put("/projects/{id}")]
pub async fn update_project(
    auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
    body: web::Json<UpdateProjectRequest>,
) -> AppResult<HttpResponse> {
    if !Action::ManageProjects.allowed_for(auth.caller.role) {
        return Err(AppError::Forbidden(
            "Admin or reviewer role required to edit projects".to_string(),
        ));
    }

    let id = path.into_inner();
    let mut req = body.into_inner();
    req.name = validation::project_name(&req.name)?;
    req.description = validation::description(req.description.as_deref())?;

    let project = pool.update_project(id, &req).await?;

    Ok(HttpResponse::Ok().json(project_response(project)))
}

/// Delete a project and everything under it.
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project UUID")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[delete("/projects/{id}")]
pub async fn delete_project(
    auth: ApiKeyAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    if !Action::DeleteProject.allowed_for(auth.caller.role) {
        return Err(AppError::Forbidden(
            "Admin role required to delete projects".to_string(),
        ));
    }

    let id = path.into_inner();
    let affected = pool.delete_project(id).await?;
    if affected == 0 {
        return Err(AppError::NotFound(format!("Project {}", id)));
    }

    info!("Project deleted: id={}", id);

    Ok(HttpResponse::NoContent().finish())
}

/// Configure project routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_projects)
        .service(get_project)
        .service(create_project)
        .service(update_project)
        .service(delete_project);
}
