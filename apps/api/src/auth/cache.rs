//! Per-user permission cache between the relational permission store and
//! high-frequency authorization checks.
//!
//! Entries live under a sliding idle timeout capped by an absolute expiry.
//! The map mutex is held only for map reads/writes; store recomputation
//! runs outside the lock, so concurrent misses for one key may both
//! recompute. That race is benign: both compute from the same source of
//! truth and the last writer wins.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;

/// One grantable permission: a protected resource area plus an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionKey {
    pub function_id: String,
    pub command_id: String,
}

impl PermissionKey {
    pub fn new(function_id: impl Into<String>, command_id: impl Into<String>) -> Self {
        PermissionKey {
            function_id: function_id.into(),
            command_id: command_id.into(),
        }
    }
}

/// A `(function, role, command)` grant row from the permission store.
#[derive(Debug, Clone)]
pub struct PermissionTuple {
    pub function_id: String,
    pub role_id: String,
    pub command_id: String,
}

/// Port to the relational permission store.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn list_role_ids_for_user(&self, user_id: &str) -> Result<Vec<String>, AppError>;

    async fn list_permissions_for_roles(
        &self,
        role_ids: &[String],
    ) -> Result<Vec<PermissionTuple>, AppError>;
}

/// Cache TTLs. The idle timeout slides on access; the absolute ttl is a
/// hard ceiling that access never extends.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub idle_ttl: Duration,
    pub absolute_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            idle_ttl: Duration::from_secs(10 * 60),
            absolute_ttl: Duration::from_secs(60 * 60),
        }
    }
}

struct CacheEntry {
    permissions: Arc<HashSet<PermissionKey>>,
    last_access: Instant,
    inserted_at: Instant,
}

impl CacheEntry {
    fn is_valid(&self, now: Instant, config: &CacheConfig) -> bool {
        now.duration_since(self.inserted_at) < config.absolute_ttl
            && now.duration_since(self.last_access) < config.idle_ttl
    }
}

/// In-process cache of resolved user permission sets.
pub struct PermissionCache {
    store: Arc<dyn PermissionStore>,
    config: CacheConfig,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl PermissionCache {
    pub fn new(store: Arc<dyn PermissionStore>, config: CacheConfig) -> Self {
        PermissionCache {
            store,
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the user's resolved permission set, recomputing from the
    /// store on miss or expiry. A valid hit refreshes the sliding timer.
    pub async fn get_user_permissions(
        &self,
        user_id: &str,
    ) -> Result<Arc<HashSet<PermissionKey>>, AppError> {
        self.get_at(user_id, Instant::now()).await
    }

    async fn get_at(
        &self,
        user_id: &str,
        now: Instant,
    ) -> Result<Arc<HashSet<PermissionKey>>, AppError> {
        {
            let mut entries = self.entries.lock().expect("permission cache poisoned");
            if let Some(entry) = entries.get_mut(user_id) {
                if entry.is_valid(now, &self.config) {
                    entry.last_access = now;
                    return Ok(Arc::clone(&entry.permissions));
                }
                entries.remove(user_id);
            }
        }

        // Miss or expired: recompute outside the lock.
        let permissions = Arc::new(self.resolve_from_store(user_id).await?);
        debug!(user_id, count = permissions.len(), "permission cache refilled");

        let mut entries = self.entries.lock().expect("permission cache poisoned");
        entries.insert(
            user_id.to_string(),
            CacheEntry {
                permissions: Arc::clone(&permissions),
                last_access: now,
                inserted_at: now,
            },
        );
        Ok(permissions)
    }

    /// Union of every permission granted to any role the user holds.
    async fn resolve_from_store(&self, user_id: &str) -> Result<HashSet<PermissionKey>, AppError> {
        let role_ids = self.store.list_role_ids_for_user(user_id).await?;
        if role_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let tuples = self.store.list_permissions_for_roles(&role_ids).await?;
        Ok(tuples
            .into_iter()
            .map(|t| PermissionKey::new(t.function_id, t.command_id))
            .collect())
    }

    /// Drops one user's entry. Called after any event that can change an
    /// individual's effective permissions (role reassignment, deactivation).
    pub fn invalidate_user(&self, user_id: &str) {
        let mut entries = self.entries.lock().expect("permission cache poisoned");
        entries.remove(user_id);
    }

    /// Drops every entry. Called when a role's grants change, since
    /// role-level edits are invisible to per-user keys.
    pub fn invalidate_all(&self) {
        let mut entries = self.entries.lock().expect("permission cache poisoned");
        entries.clear();
    }

    #[cfg(test)]
    fn cached_user_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}
