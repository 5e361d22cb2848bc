//! Core traits shared across layers.

use crate::{Field, Value};
use async_trait::async_trait;
use std::fmt::Display;

/// Trait for entities with a unique identifier and addressable fields.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Identity type.
    type Id: Clone + Display + Into<Value> + Send + Sync;

    /// Field enumeration used in predicates.
    type Field: Field;

    /// Resource name used in logs and error messages.
    const NAME: &'static str;

    /// The identity field.
    const KEY: Self::Field;

    /// Secondary unique keys as `(index name, field)`. `NULL`s never clash.
    const UNIQUE: &'static [(&'static str, Self::Field)];

    /// Returns the entity's unique identifier.
    fn id(&self) -> Self::Id;

    /// Returns the current value of a field.
    fn value_of(&self, field: Self::Field) -> Value;

    /// Every field with its value, in column order.
    fn values(&self) -> Vec<(Self::Field, Value)> {
        <Self::Field as Field>::ALL
            .iter()
            .map(|field| (*field, self.value_of(*field)))
            .collect()
    }
}

/// Trait for health checks.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Returns the name of this health check.
    fn name(&self) -> &str;

    /// Performs the health check.
    async fn check(&self) -> HealthStatus;
}

/// Health check status.
#[derive(Debug, Clone)]
pub enum HealthStatus {
    /// The component is healthy.
    Healthy,
    /// The component is degraded but functional.
    Degraded(String),
    /// The component is unhealthy.
    Unhealthy(String),
}

impl HealthStatus {
    /// Returns true if the status is healthy.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Returns true if the status is unhealthy.
    #[must_use]
    pub const fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy(_))
    }

    /// Short label for responses.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Healthy => "UP",
            Self::Degraded(_) => "DEGRADED",
            Self::Unhealthy(_) => "DOWN",
        }
    }
}
