//! The authorization decision point.
//!
//! One decision function serves both integration points (the per-route
//! guard and the path-pattern middleware) so a request can never get two
//! different answers depending on which layer asked.

use crate::auth::cache::{PermissionCache, PermissionKey};
use crate::auth::principal::Principal;
use crate::errors::AppError;

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    NotAuthenticated,
    /// Authenticated but carries no resolvable user id.
    UnknownIdentity,
    MissingPermission(PermissionKey),
}

impl Decision {
    /// Maps a denial to the corresponding terminal request error.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::NotAuthenticated) => Err(AppError::NotAuthenticated),
            Decision::Deny(DenyReason::UnknownIdentity) => Err(AppError::UnknownIdentity),
            Decision::Deny(DenyReason::MissingPermission(key)) => Err(AppError::PermissionDenied {
                function_id: key.function_id,
                command_id: key.command_id,
            }),
        }
    }
}

/// Decides allow/deny for a principal and an optional required permission.
///
/// Rules, in order: unauthenticated callers are denied; privileged roles
/// bypass unconditionally; operations with no declared requirement are
/// un-gated; callers without a user id cannot be checked and are denied;
/// otherwise membership in the cached permission set decides.
pub async fn authorize(
    cache: &PermissionCache,
    principal: &Principal,
    required: Option<&PermissionKey>,
) -> Result<Decision, AppError> {
    if !principal.authenticated {
        return Ok(Decision::Deny(DenyReason::NotAuthenticated));
    }

    if principal.is_privileged() {
        return Ok(Decision::Allow);
    }

    let Some(required) = required else {
        return Ok(Decision::Allow);
    };

    let Some(user_id) = principal.user_id.as_deref() else {
        return Ok(Decision::Deny(DenyReason::UnknownIdentity));
    };

    let permissions = cache.get_user_permissions(user_id).await?;
    if permissions.contains(required) {
        Ok(Decision::Allow)
    } else {
        Ok(Decision::Deny(DenyReason::MissingPermission(required.clone())))
    }
}
