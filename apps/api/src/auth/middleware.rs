//! Principal extraction and the path-pattern authorization guard.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::auth::cache::PermissionKey;
use crate::auth::decision::authorize;
use crate::auth::principal::{Principal, Role};
use crate::auth::registry::{command_for_method, function_for_path, is_public_path};
use crate::errors::AppError;
use crate::state::AppState;

/// Builds the request principal from the identity headers set by the
/// authenticating gateway and stashes it in request extensions. Token
/// verification already happened upstream; absent headers mean an
/// anonymous caller.
pub async fn principal_middleware(mut req: Request<Body>, next: Next) -> Response {
    let principal = principal_from_headers(req.headers());
    req.extensions_mut().insert(principal);
    next.run(req).await
}

fn principal_from_headers(headers: &HeaderMap) -> Principal {
    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let roles: Vec<Role> = headers
        .get("x-user-roles")
        .and_then(|v| v.to_str().ok())
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(Role::parse)
                .collect()
        })
        .unwrap_or_default();

    let authenticated = user_id.is_some() || !roles.is_empty();
    Principal {
        authenticated,
        user_id,
        roles,
    }
}

/// Path-pattern guard: infers the required permission from URL + verb via
/// the fixed mapping tables and consults the shared decision function.
/// Public prefixes and unmapped paths pass through un-gated.
pub async fn path_permission_guard(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_string();

    if is_public_path(&path) {
        return Ok(next.run(req).await);
    }

    let Some(function_id) = function_for_path(&path) else {
        return Ok(next.run(req).await);
    };
    let required = PermissionKey::new(function_id, command_for_method(req.method()));

    let principal = req
        .extensions()
        .get::<Principal>()
        .cloned()
        .unwrap_or_else(Principal::anonymous);

    let decision = authorize(&state.permission_cache, &principal, Some(&required)).await?;
    debug!(%path, function_id, command_id = required.command_id, ?decision, "path guard");
    decision.into_result()?;

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(
                axum::http::HeaderName::from_bytes(k.as_bytes()).unwrap(),
                HeaderValue::from_str(v).unwrap(),
            );
        }
        map
    }

    #[test]
    fn missing_headers_yield_anonymous_principal() {
        let p = principal_from_headers(&HeaderMap::new());
        assert!(!p.authenticated);
        assert!(p.user_id.is_none());
        assert!(p.roles.is_empty());
    }

    #[test]
    fn identity_headers_yield_authenticated_principal() {
        let p = principal_from_headers(&headers(&[
            ("x-user-id", "u-42"),
            ("x-user-roles", "HR, Intern"),
        ]));
        assert!(p.authenticated);
        assert_eq!(p.user_id.as_deref(), Some("u-42"));
        assert_eq!(p.roles, vec![Role::Hr, Role::Intern]);
    }

    #[test]
    fn roles_without_user_id_still_authenticate() {
        let p = principal_from_headers(&headers(&[("x-user-roles", "HR")]));
        assert!(p.authenticated);
        assert!(p.user_id.is_none());
    }

    #[test]
    fn blank_user_id_header_is_ignored() {
        let p = principal_from_headers(&headers(&[("x-user-id", "  ")]));
        assert!(!p.authenticated);
        assert!(p.user_id.is_none());
    }
}
