//! Declared permission requirements and the middleware mapping tables.
//!
//! Route handlers consult an explicit registration table built at startup
//! (operation id -> required permission) instead of reading metadata off
//! the matched route. The path-pattern middleware uses the fixed
//! method->command and path-fragment->function tables below; both layers
//! feed the same decision function.

use std::collections::HashMap;

use axum::http::Method;

use crate::auth::cache::PermissionKey;

/// Operation identifiers for guarded handlers.
pub mod ops {
    pub const SCREEN_ONE: &str = "screening.screen_one";
    pub const SCREEN_BATCH: &str = "screening.screen_batch";
    pub const SCREENING_RANKING: &str = "screening.ranking";
    pub const UPLOAD_CV: &str = "applications.upload_cv";
    pub const VIEW_APPLICATION: &str = "applications.view_one";
    pub const REPLACE_ROLE_PERMISSIONS: &str = "permissions.replace_for_role";
    pub const REPLACE_USER_ROLES: &str = "users.replace_roles";
}

/// Startup-built table of operation id -> required permission.
/// Operations absent from the table are un-gated by design.
pub struct PermissionRegistry {
    required: HashMap<&'static str, PermissionKey>,
}

impl PermissionRegistry {
    pub fn new() -> Self {
        PermissionRegistry {
            required: HashMap::new(),
        }
    }

    /// The registrations for every guarded operation this service exposes.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ops::SCREEN_ONE, PermissionKey::new("RECRUITMENT_CV", "CREATE"));
        registry.register(ops::SCREEN_BATCH, PermissionKey::new("RECRUITMENT_CV", "CREATE"));
        registry.register(ops::SCREENING_RANKING, PermissionKey::new("RECRUITMENT_CV", "VIEW"));
        registry.register(ops::UPLOAD_CV, PermissionKey::new("RECRUITMENT_CV", "CREATE"));
        registry.register(ops::VIEW_APPLICATION, PermissionKey::new("RECRUITMENT_CV", "VIEW"));
        registry.register(
            ops::REPLACE_ROLE_PERMISSIONS,
            PermissionKey::new("SYSTEM_PERMISSION", "UPDATE"),
        );
        registry.register(ops::REPLACE_USER_ROLES, PermissionKey::new("SYSTEM_USER", "UPDATE"));
        registry
    }

    pub fn register(&mut self, operation: &'static str, key: PermissionKey) {
        self.required.insert(operation, key);
    }

    pub fn required_for(&self, operation: &str) -> Option<&PermissionKey> {
        self.required.get(operation)
    }
}

impl Default for PermissionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Paths that bypass authorization entirely, authenticated or not.
const PUBLIC_PREFIXES: &[&str] = &["/api/auth/login", "/api/auth/register", "/health", "/docs"];

pub fn is_public_path(path: &str) -> bool {
    let lowered = path.to_ascii_lowercase();
    PUBLIC_PREFIXES.iter().any(|p| lowered.starts_with(p))
}

/// HTTP method -> command id for the path-pattern guard.
pub fn command_for_method(method: &Method) -> &'static str {
    match *method {
        Method::GET => "VIEW",
        Method::POST => "CREATE",
        Method::PUT => "UPDATE",
        Method::PATCH => "UPDATE",
        Method::DELETE => "DELETE",
        _ => "VIEW",
    }
}

/// URL path fragment -> function id. Paths with no mapping are un-gated.
pub fn function_for_path(path: &str) -> Option<&'static str> {
    let lowered = path.to_ascii_lowercase();

    const TABLE: &[(&str, &str)] = &[
        ("/api/roles", "SYSTEM_ROLE"),
        ("/api/users", "SYSTEM_USER"),
        ("/api/permissions", "SYSTEM_PERMISSION"),
        ("/api/functions", "SYSTEM_PERMISSION"),
        ("/api/jobdescriptions", "RECRUITMENT_JD"),
        ("/api/applications", "RECRUITMENT_CV"),
        ("/api/screening", "RECRUITMENT_CV"),
    ];

    TABLE
        .iter()
        .find(|(fragment, _)| lowered.contains(fragment))
        .map(|(_, function_id)| *function_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_mapping_matches_the_fixed_table() {
        assert_eq!(command_for_method(&Method::GET), "VIEW");
        assert_eq!(command_for_method(&Method::POST), "CREATE");
        assert_eq!(command_for_method(&Method::PUT), "UPDATE");
        assert_eq!(command_for_method(&Method::PATCH), "UPDATE");
        assert_eq!(command_for_method(&Method::DELETE), "DELETE");
        assert_eq!(command_for_method(&Method::HEAD), "VIEW");
    }

    #[test]
    fn path_fragments_map_to_functions() {
        assert_eq!(function_for_path("/api/roles/3"), Some("SYSTEM_ROLE"));
        assert_eq!(function_for_path("/api/users"), Some("SYSTEM_USER"));
        assert_eq!(function_for_path("/api/functions/X"), Some("SYSTEM_PERMISSION"));
        assert_eq!(
            function_for_path("/api/jobdescriptions/12"),
            Some("RECRUITMENT_JD")
        );
        assert_eq!(function_for_path("/api/screening/batch/4"), Some("RECRUITMENT_CV"));
    }

    #[test]
    fn unmapped_paths_are_ungated() {
        assert_eq!(function_for_path("/api/metrics"), None);
        assert_eq!(function_for_path("/internal/queue"), None);
    }

    #[test]
    fn path_mapping_is_case_insensitive() {
        assert_eq!(function_for_path("/API/Roles"), Some("SYSTEM_ROLE"));
    }

    #[test]
    fn public_prefixes_bypass_authorization() {
        assert!(is_public_path("/health"));
        assert!(is_public_path("/api/auth/login"));
        assert!(is_public_path("/api/auth/register"));
        assert!(!is_public_path("/api/screening/1"));
    }

    #[test]
    fn route_guard_and_path_guard_agree_on_screening_requests() {
        // Both integration points must reach the same answer for the
        // same request: declared registration vs inferred from URL+verb.
        let registry = PermissionRegistry::with_defaults();

        let declared = registry.required_for(ops::SCREEN_ONE).unwrap();
        let inferred = PermissionKey::new(
            function_for_path("/api/screening/7").unwrap(),
            command_for_method(&Method::POST),
        );
        assert_eq!(declared, &inferred);

        let declared = registry.required_for(ops::SCREENING_RANKING).unwrap();
        let inferred = PermissionKey::new(
            function_for_path("/api/screening/ranking/7").unwrap(),
            command_for_method(&Method::GET),
        );
        assert_eq!(declared, &inferred);
    }

    #[test]
    fn default_registry_declares_the_guarded_operations() {
        let registry = PermissionRegistry::with_defaults();
        assert_eq!(
            registry.required_for(ops::SCREEN_ONE),
            Some(&PermissionKey::new("RECRUITMENT_CV", "CREATE"))
        );
        assert_eq!(
            registry.required_for(ops::REPLACE_ROLE_PERMISSIONS),
            Some(&PermissionKey::new("SYSTEM_PERMISSION", "UPDATE"))
        );
        assert!(registry.required_for("unregistered.op").is_none());
    }
}
