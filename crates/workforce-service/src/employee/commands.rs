//! Employee command handlers.
//!
//! Each command opens its own repository scope, stages its change and
//! commits it. Nothing here touches the cache.

use crate::dto::{CreateEmployeeCommand, DeleteEmployeeCommand, EmployeeResponse, UpdateEmployeeCommand};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use workforce_core::messaging::{ensure_active, until_cancelled, CancellationToken, CommandHandler};
use workforce_core::{Employee, EmployeeField, Predicate, ValidateExt, WorkforceError, WorkforceResult};
use workforce_repository::{ReadRepository, RepositoryFactory, RepositoryScope};

/// Store errors raised by unique keys become conflicts.
fn map_duplicate(error: WorkforceError) -> WorkforceError {
    match error {
        WorkforceError::Database(message) if message.contains("Duplicate entry") => {
            WorkforceError::Conflict(format!("Employee already exists: {message}"))
        }
        other => other,
    }
}

async fn find_tracked(
    scope: &dyn RepositoryScope<Employee>,
    national_id_number: &str,
    cancel: &CancellationToken,
) -> WorkforceResult<Option<Employee>> {
    let predicate = Predicate::eq(EmployeeField::NationalIdNumber, national_id_number);
    let found = until_cancelled(cancel, scope.find(&predicate, false)).await?;
    Ok(found.into_iter().next())
}

/// Creates an employee.
pub struct CreateEmployeeHandler {
    factory: Arc<dyn RepositoryFactory<Employee>>,
}

impl CreateEmployeeHandler {
    #[must_use]
    pub fn new(factory: Arc<dyn RepositoryFactory<Employee>>) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl CommandHandler<CreateEmployeeCommand, EmployeeResponse> for CreateEmployeeHandler {
    async fn handle(
        &self,
        command: CreateEmployeeCommand,
        cancel: &CancellationToken,
    ) -> WorkforceResult<Option<EmployeeResponse>> {
        command.validate_request()?;
        ensure_active(cancel)?;

        let employee = command.into_employee();
        debug!(
            business_entity_id = employee.business_entity_id,
            national_id_number = %employee.national_id_number,
            "Creating employee"
        );

        let scope = self.factory.scope();
        let clash = Predicate::eq(EmployeeField::BusinessEntityId, employee.business_entity_id).or(
            Predicate::eq(EmployeeField::NationalIdNumber, employee.national_id_number.as_str()),
        );
        if !until_cancelled(cancel, scope.find(&clash, true)).await?.is_empty() {
            return Err(WorkforceError::conflict(format!(
                "Employee {} or national ID {} already exists",
                employee.business_entity_id, employee.national_id_number
            )));
        }

        scope.add(employee.clone());
        ensure_active(cancel)?;
        scope.commit().await.map_err(map_duplicate)?;

        info!(business_entity_id = employee.business_entity_id, "Employee created");
        Ok(Some(employee.into()))
    }
}

/// Applies a partial update to an employee.
pub struct UpdateEmployeeHandler {
    factory: Arc<dyn RepositoryFactory<Employee>>,
}

impl UpdateEmployeeHandler {
    #[must_use]
    pub fn new(factory: Arc<dyn RepositoryFactory<Employee>>) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl CommandHandler<UpdateEmployeeCommand, EmployeeResponse> for UpdateEmployeeHandler {
    async fn handle(
        &self,
        command: UpdateEmployeeCommand,
        cancel: &CancellationToken,
    ) -> WorkforceResult<Option<EmployeeResponse>> {
        command.changes.validate_request()?;
        ensure_active(cancel)?;

        let scope = self.factory.scope();
        let Some(mut employee) = find_tracked(scope.as_ref(), &command.national_id_number, cancel).await? else {
            debug!(national_id_number = %command.national_id_number, "No employee to update");
            return Ok(None);
        };

        let before = employee.clone();
        command.changes.apply_to(&mut employee);
        if employee == before {
            debug!(business_entity_id = employee.business_entity_id, "Update changes nothing");
            return Ok(Some(employee.into()));
        }

        employee.touch();
        scope.update(employee.clone());
        ensure_active(cancel)?;
        let affected = scope.commit().await.map_err(map_duplicate)?;

        info!(business_entity_id = employee.business_entity_id, affected, "Employee updated");
        Ok(Some(employee.into()))
    }
}

/// Deletes an employee.
pub struct DeleteEmployeeHandler {
    factory: Arc<dyn RepositoryFactory<Employee>>,
}

impl DeleteEmployeeHandler {
    #[must_use]
    pub fn new(factory: Arc<dyn RepositoryFactory<Employee>>) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl CommandHandler<DeleteEmployeeCommand, EmployeeResponse> for DeleteEmployeeHandler {
    async fn handle(
        &self,
        command: DeleteEmployeeCommand,
        cancel: &CancellationToken,
    ) -> WorkforceResult<Option<EmployeeResponse>> {
        ensure_active(cancel)?;

        let scope = self.factory.scope();
        let Some(employee) = find_tracked(scope.as_ref(), &command.national_id_number, cancel).await? else {
            return Ok(None);
        };

        scope.delete(employee.clone());
        ensure_active(cancel)?;
        scope.commit().await?;

        info!(business_entity_id = employee.business_entity_id, "Employee deleted");
        Ok(Some(employee.into()))
    }
}
