//! Policy checks against token claims.

use super::PolicyTable;
use crate::Claims;
use workforce_core::{Policy, Role, WorkforceError, WorkforceResult};

/// Extension trait for Claims to check permissions.
pub trait ClaimsExt {
    /// Requires a specific role.
    ///
    /// # Errors
    /// `Forbidden` when the role is not held.
    fn require_role(&self, role: Role) -> WorkforceResult<()>;

    /// Requires the caller to satisfy a policy.
    ///
    /// # Errors
    /// `Forbidden` when no held role is admitted by the policy.
    fn require_policy(&self, table: &PolicyTable, policy: Policy) -> WorkforceResult<()>;
}

impl ClaimsExt for Claims {
    fn require_role(&self, role: Role) -> WorkforceResult<()> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(WorkforceError::Forbidden(format!("Required role: {role}")))
        }
    }

    fn require_policy(&self, table: &PolicyTable, policy: Policy) -> WorkforceResult<()> {
        if table.is_satisfied_by(policy, &self.role_set()) {
            Ok(())
        } else {
            Err(WorkforceError::Forbidden(format!(
                "Policy {policy} not satisfied by roles [{}]",
                self.roles.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(roles: &[Role]) -> Claims {
        Claims::new("tester", roles, None, None, 3600)
    }

    #[test]
    fn test_require_role() {
        let admin = claims(&[Role::Admin]);
        assert!(admin.require_role(Role::Admin).is_ok());
        assert!(admin.require_role(Role::Manager).is_err());
    }

    #[test]
    fn test_require_policy() {
        let table = PolicyTable::standard();

        let employee = claims(&[Role::Employee]);
        assert!(employee.require_policy(&table, Policy::ReadEmployees).is_ok());
        let err = employee.require_policy(&table, Policy::CreateEmployees).unwrap_err();
        assert!(matches!(err, WorkforceError::Forbidden(_)));
        assert_eq!(err.status_code(), 403);

        let manager = claims(&[Role::Manager]);
        assert!(manager.require_policy(&table, Policy::UpdateEmployees).is_ok());
        assert!(manager.require_policy(&table, Policy::DeleteEmployees).is_err());
    }

    #[test]
    fn test_unknown_roles_grant_nothing() {
        let table = PolicyTable::standard();
        let mut forged = claims(&[]);
        forged.roles = vec!["SuperAdmin".to_string(), "admin".to_string()];

        for policy in Policy::all() {
            assert!(forged.require_policy(&table, policy).is_err());
        }
    }
}
