//! Request principal and role model.

use serde::{Deserialize, Serialize};

/// Role membership as asserted by the authenticating gateway. Open set:
/// unknown role names are carried through as `Other` and grant nothing
/// special.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Hr,
    Manager,
    Intern,
    Other(String),
}

impl Role {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "hr" => Role::Hr,
            "manager" => Role::Manager,
            "intern" => Role::Intern,
            _ => Role::Other(name.trim().to_string()),
        }
    }

    /// Privileged roles bypass permission checks entirely.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The authenticated (or not) caller of the current request. Token
/// verification happens upstream; this layer only consumes its result.
#[derive(Debug, Clone)]
pub struct Principal {
    pub authenticated: bool,
    /// May be absent even for authenticated callers (e.g. service tokens);
    /// permission checks then deny with an identity error.
    pub user_id: Option<String>,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn anonymous() -> Self {
        Principal {
            authenticated: false,
            user_id: None,
            roles: Vec::new(),
        }
    }

    pub fn is_privileged(&self) -> bool {
        self.roles.iter().any(Role::is_privileged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_is_case_insensitive() {
        assert_eq!(Role::parse("ADMIN"), Role::Admin);
        assert_eq!(Role::parse("hr"), Role::Hr);
        assert_eq!(Role::parse(" Manager "), Role::Manager);
    }

    #[test]
    fn unknown_roles_are_carried_as_other() {
        let role = Role::parse("auditor");
        assert_eq!(role, Role::Other("auditor".to_string()));
        assert!(!role.is_privileged());
    }

    #[test]
    fn only_admin_is_privileged() {
        assert!(Role::Admin.is_privileged());
        assert!(!Role::Hr.is_privileged());
        assert!(!Role::Intern.is_privileged());
    }

    #[test]
    fn anonymous_principal_is_unauthenticated() {
        let p = Principal::anonymous();
        assert!(!p.authenticated);
        assert!(p.user_id.is_none());
        assert!(!p.is_privileged());
    }
}
