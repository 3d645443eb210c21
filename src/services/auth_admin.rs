//! API Key management endpoints.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    Action, ApiKeyCreateResponse, ApiKeyListItem, CreateApiKeyRequest, UserRole,
};
use crate::services::api_key;

/// Configure auth admin routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_api_key)
        .service(list_api_keys)
        .service(get_api_key)
        .service(revoke_api_key)
        .service(restore_api_key);
}

fn require_key_management(auth: &ApiKeyAuth) -> AppResult<()> {
    if !Action::ManageKeys.allowed_for(auth.caller.role) {
        return Err(AppError::Unauthorized(
            "Admin role required to manage API keys".to_string(),
        ));
    }
    Ok(())
}

/// Create a new API key.
///
/// POST /api/v1/auth/keys
/// Authorization: X-API-Key (admin role) or X-Admin-Key (bootstrap)
#[utoipa::path(
    post,
    path = "/api/v1/auth/keys",
    tag = "Auth",
    request_body = CreateApiKeyRequest,
    responses(
        (status = 201, description = "API key created", body = ApiKeyCreateResponse),
        (status = 401, description = "Unauthorized - admin role required"),
        (status = 400, description = "Invalid input")
    ),
    security(
        ("api_key" = [])
    )
)]
#[post("/auth/keys")]
pub async fn create_api_key(
    auth: ApiKeyAuth,
    body: web::Json<CreateApiKeyRequest>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    require_key_management(&auth)?;

    // Validate name
    if body.name.trim().is_empty() {
        return Err(AppError::InvalidInput("Name is required".to_string()));
    }

    // Parse role
    let role = body
        .role
        .as_ref()
        .and_then(|r| UserRole::parse(r))
        .unwrap_or_default();

    // Create the key
    let (full_key, api_key) =
        api_key::create_key(pool.get_ref(), &body.name, role, body.expires_in.as_deref()).await?;

    Ok(HttpResponse::Created().json(ApiKeyCreateResponse {
        id: api_key.id,
        key: full_key,
        name: api_key.name,
        role: api_key.role,
        expires_at: api_key.expires_at.map(|d| d.to_rfc3339()),
        created_at: api_key.created_at.to_rfc3339(),
    }))
}

/// Response for listing API keys.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListApiKeysResponse {
    pub keys: Vec<ApiKeyListItem>,
}

/// List all API keys.
///
/// GET /api/v1/auth/keys
/// Authorization: X-API-Key (admin role) or X-Admin-Key
#[utoipa::path(
    get,
    path = "/api/v1/auth/keys",
    tag = "Auth",
    responses(
        (status = 200, description = "List of API keys", body = ListApiKeysResponse),
        (status = 401, description = "Unauthorized - admin role required")
    ),
    security(
        ("api_key" = [])
    )
)]
#[get("/auth/keys")]
pub async fn list_api_keys(auth: ApiKeyAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    require_key_management(&auth)?;

    let keys = api_key::list_keys(pool.get_ref()).await?;
    let items: Vec<ApiKeyListItem> = keys.into_iter().map(ApiKeyListItem::from).collect();

    Ok(HttpResponse::Ok().json(ListApiKeysResponse { keys: items }))
}

/// Get a single API key by ID.
///
/// GET /api/v1/auth/keys/{id}
#[utoipa::path(
    get,
    path = "/api/v1/auth/keys/{id}",
    tag = "Auth",
    params(
        ("id" = String, Path, description = "API key UUID")
    ),
    responses(
        (status = 200, description = "API key details", body = ApiKeyListItem),
        (status = 401, description = "Unauthorized - admin role required"),
        (status = 404, description = "API key not found")
    ),
    security(
        ("api_key" = [])
    )
)]
#[get("/auth/keys/{id}")]
pub async fn get_api_key(
    auth: ApiKeyAuth,
    path: web::Path<String>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    require_key_management(&auth)?;

    let id = path.into_inner();
    let key = api_key::get_key(pool.get_ref(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("API key {}", id)))?;

    Ok(HttpResponse::Ok().json(ApiKeyListItem::from(key)))
}

/// Revoke an API key.
///
/// DELETE /api/v1/auth/keys/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/auth/keys/{id}",
    tag = "Auth",
    params(
        ("id" = String, Path, description = "API key UUID")
    ),
    responses(
        (status = 204, description = "API key revoked"),
        (status = 401, description = "Unauthorized - admin role required"),
        (status = 404, description = "API key not found or already revoked")
    ),
    security(
        ("api_key" = [])
    )
)]
#[delete("/auth/keys/{id}")]
pub async fn revoke_api_key(
    auth: ApiKeyAuth,
    path: web::Path<String>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    require_key_management(&auth)?;

    let id = path.into_inner();
    let revoked = api_key::revoke_key(pool.get_ref(), &id).await?;

    if revoked {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::NotFound(format!(
            "API key {} (or already revoked)",
            id
        )))
    }
}

/// Restore a revoked API key.
///
/// POST /api/v1/auth/keys/{id}/restore
#[utoipa::path(
    post,
    path = "/api/v1/auth/keys/{id}/restore",
    tag = "Auth",
    params(
        ("id" = String, Path, description = "API key UUID")
    ),
    responses(
        (status = 204, description = "API key restored"),
        (status = 401, description = "Unauthorized - admin role required"),
        (status = 404, description = "API key not found or not revoked")
    ),
    security(
        ("api_key" = [])
    )
)]
#[post("/auth/keys/{id}/restore")]
pub async fn restore_api_key(
    auth: ApiKeyAuth,
    path: web::Path<String>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    require_key_management(&auth)?;

    let id = path.into_inner();
    let restored = api_key::restore_key(pool.get_ref(), &id).await?;

    if restored {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::NotFound(format!(
            "API key {} (or not revoked)",
            id
        )))
    }
}
