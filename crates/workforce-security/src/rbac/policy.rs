//! Static policy table.

use std::collections::HashMap;
use tracing::debug;
use workforce_core::{Policy, Role};

/// Binds each named policy to the fixed set of roles allowed through it.
///
/// Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    bindings: HashMap<Policy, Vec<Role>>,
}

impl PolicyTable {
    /// The standard bindings.
    #[must_use]
    pub fn standard() -> Self {
        use Role::{Admin, Employee, Manager};

        let bindings = HashMap::from([
            (Policy::ReadEmployees, vec![Admin, Manager, Employee]),
            (Policy::CreateEmployees, vec![Admin, Manager]),
            (Policy::UpdateEmployees, vec![Admin, Manager]),
            (Policy::DeleteEmployees, vec![Admin]),
            (Policy::AdminOnly, vec![Admin]),
            (Policy::ManagerOnly, vec![Manager, Admin]),
        ]);
        Self { bindings }
    }

    /// Roles the policy admits; empty for an unbound policy.
    #[must_use]
    pub fn allowed_roles(&self, policy: Policy) -> &[Role] {
        self.bindings.get(&policy).map(Vec::as_slice).unwrap_or_default()
    }

    /// True iff any held role is among the policy's allowed roles.
    #[must_use]
    pub fn is_satisfied_by(&self, policy: Policy, held: &[Role]) -> bool {
        let allowed = self.allowed_roles(policy);
        let granted = held.iter().any(|role| allowed.contains(role));
        debug!(policy = %policy, ?held, granted, "Policy evaluated");
        granted
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}
