//! Role and policy value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of roles a caller can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Role {
    /// Full access.
    Admin,
    /// Manages employee records.
    Manager,
    /// Reads employee records.
    Employee,
    /// Authenticated but holds no employee permissions.
    ReadOnly,
}

impl Role {
    /// Returns all available roles.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Admin, Self::Manager, Self::Employee, Self::ReadOnly]
    }

    /// The claim value carried in tokens for this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Employee => "Employee",
            Self::ReadOnly => "ReadOnly",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    /// Claim values are matched exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a claim names a role outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Named authorization policies checked at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    ReadEmployees,
    CreateEmployees,
    UpdateEmployees,
    DeleteEmployees,
    AdminOnly,
    ManagerOnly,
}

impl Policy {
    /// Returns all policies.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::ReadEmployees,
            Self::CreateEmployees,
            Self::UpdateEmployees,
            Self::DeleteEmployees,
            Self::AdminOnly,
            Self::ManagerOnly,
        ]
    }

    /// The registered policy name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ReadEmployees => "RequireReadEmployeesPermission",
            Self::CreateEmployees => "RequireCreateEmployeesPermission",
            Self::UpdateEmployees => "RequireUpdateEmployeesPermission",
            Self::DeleteEmployees => "RequireDeleteEmployeesPermission",
            Self::AdminOnly => "RequireAdminRole",
            Self::ManagerOnly => "RequireManagerRole",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
