use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::cache::PermissionCache;
use crate::auth::registry::PermissionRegistry;
use crate::config::Config;
use crate::screening::extract::TextExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// In-process cache of resolved user permission sets.
    pub permission_cache: Arc<PermissionCache>,
    /// Startup-built table of operation id -> required permission.
    pub registry: Arc<PermissionRegistry>,
    /// Pluggable CV text extraction. Default: `FileTextExtractor`.
    pub extractor: Arc<dyn TextExtractor>,
}
