//! Role/permission administration endpoints. These are the two mutations
//! that must keep the permission cache coherent: editing what a role
//! grants flushes everyone, reassigning one user's roles flushes that
//! user.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::principal::Principal;
use crate::auth::registry::ops;
use crate::auth::require;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PermissionGrant {
    pub function_id: String,
    pub command_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceRolePermissionsRequest {
    pub role_id: String,
    pub permissions: Vec<PermissionGrant>,
}

#[derive(Debug, Serialize)]
pub struct ReplaceRolePermissionsResponse {
    pub role_id: String,
    pub granted: usize,
}

/// PUT /api/permissions
/// Replaces a role's permission matrix wholesale, then invalidates every
/// cached user: role-level edits are invisible to per-user cache keys.
pub async fn handle_replace_role_permissions(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<ReplaceRolePermissionsRequest>,
) -> Result<Json<ReplaceRolePermissionsResponse>, AppError> {
    require(&state, &principal, ops::REPLACE_ROLE_PERMISSIONS).await?;

    if req.role_id.trim().is_empty() {
        return Err(AppError::Validation("role_id must not be empty".to_string()));
    }

    let mut tx = state.db.begin().await?;

    sqlx::query("DELETE FROM permissions WHERE role_id = $1")
        .bind(&req.role_id)
        .execute(&mut *tx)
        .await?;

    for grant in &req.permissions {
        sqlx::query(
            "INSERT INTO permissions (function_id, role_id, command_id) VALUES ($1, $2, $3)",
        )
        .bind(&grant.function_id)
        .bind(&req.role_id)
        .bind(&grant.command_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    state.permission_cache.invalidate_all();
    info!(role_id = %req.role_id, granted = req.permissions.len(), "role permissions replaced, cache flushed");

    Ok(Json(ReplaceRolePermissionsResponse {
        role_id: req.role_id,
        granted: req.permissions.len(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ReplaceUserRolesRequest {
    pub role_ids: Vec<String>,
}

/// PUT /api/users/:id/roles
/// Reassigns one user's roles and evicts exactly that user's cache entry.
pub async fn handle_replace_user_roles(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
    Json(req): Json<ReplaceUserRolesRequest>,
) -> Result<StatusCode, AppError> {
    require(&state, &principal, ops::REPLACE_USER_ROLES).await?;

    let mut tx = state.db.begin().await?;

    sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
        .bind(&user_id)
        .execute(&mut *tx)
        .await?;

    for role_id in &req.role_ids {
        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(&user_id)
            .bind(role_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    state.permission_cache.invalidate_user(&user_id);
    info!(%user_id, roles = req.role_ids.len(), "user roles replaced, cache entry evicted");

    Ok(StatusCode::NO_CONTENT)
}
