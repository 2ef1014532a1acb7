//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000002_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_FARMER: &str = "farmer";
pub const ROLE_EXPERT: &str = "expert";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER, ROLE_FARMER, ROLE_EXPERT];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_roles_accepted() {
        for role in VALID_ROLES {
            assert!(validate_role(role).is_ok());
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result = validate_role("superuser");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid role"));
    }
}
