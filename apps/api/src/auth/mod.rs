//! Role-based access control: permission cache, decision point, and the
//! two guard integration points (route-level and path-pattern).

pub mod cache;
pub mod decision;
pub mod handlers;
pub mod middleware;
pub mod principal;
pub mod registry;
pub mod store;

use crate::errors::AppError;
use crate::state::AppState;
use decision::authorize;
use principal::Principal;

/// Route-level guard: resolves the operation's declared requirement from
/// the registry and runs the shared decision function. Handlers call this
/// before touching any data.
pub async fn require(
    state: &AppState,
    principal: &Principal,
    operation: &str,
) -> Result<(), AppError> {
    let required = state.registry.required_for(operation);
    authorize(&state.permission_cache, principal, required)
        .await?
        .into_result()
}
