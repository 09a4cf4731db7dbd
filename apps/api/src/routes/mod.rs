pub mod health;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::auth::handlers as auth_handlers;
use crate::auth::middleware::{path_permission_guard, principal_middleware};
use crate::screening::handlers as screening_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Recruitment screening
        .route(
            "/api/screening/:application_id",
            post(screening_handlers::handle_screen_one),
        )
        .route(
            "/api/screening/batch/:jd_id",
            post(screening_handlers::handle_screen_batch),
        )
        .route(
            "/api/screening/ranking/:jd_id",
            get(screening_handlers::handle_ranking),
        )
        .route(
            "/api/applications/:id",
            get(screening_handlers::handle_application_detail),
        )
        .route(
            "/api/applications/:id/cv",
            post(screening_handlers::handle_upload_cv),
        )
        // RBAC administration
        .route(
            "/api/permissions",
            put(auth_handlers::handle_replace_role_permissions),
        )
        .route(
            "/api/users/:id/roles",
            put(auth_handlers::handle_replace_user_roles),
        )
        // Outermost layer runs first: principal extraction, then the
        // path-pattern guard, then the route handler's own guard.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            path_permission_guard,
        ))
        .layer(middleware::from_fn(principal_middleware))
        .with_state(state)
}
