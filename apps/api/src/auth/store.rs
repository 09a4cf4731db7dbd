//! PostgreSQL-backed permission store.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::cache::{PermissionStore, PermissionTuple};
use crate::errors::AppError;

pub struct PgPermissionStore {
    pool: PgPool,
}

impl PgPermissionStore {
    pub fn new(pool: PgPool) -> Self {
        PgPermissionStore { pool }
    }
}

#[async_trait]
impl PermissionStore for PgPermissionStore {
    async fn list_role_ids_for_user(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let role_ids = sqlx::query_scalar::<_, String>(
            "SELECT role_id FROM user_roles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(role_ids)
    }

    async fn list_permissions_for_roles(
        &self,
        role_ids: &[String],
    ) -> Result<Vec<PermissionTuple>, AppError> {
        let rows = sqlx::query_as::<_, (String, String, String)>(
            "SELECT function_id, role_id, command_id FROM permissions WHERE role_id = ANY($1)",
        )
        .bind(role_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(function_id, role_id, command_id)| PermissionTuple {
                function_id,
                role_id,
                command_id,
            })
            .collect())
    }
}
