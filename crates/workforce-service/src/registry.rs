//! Handler registration.
//!
//! Every request type the API dispatches is registered here exactly once,
//! at startup.

use crate::cache::{CacheAside, CacheInterface};
use crate::dto::{
    CreateEmployeeCommand, DeleteEmployeeCommand, EmployeePageResponse, EmployeeResponse, GetEmployeeQuery,
    ListEmployeesQuery, UpdateEmployeeCommand,
};
use crate::employee::{
    CreateEmployeeHandler, DeleteEmployeeHandler, GetEmployeeHandler, ListEmployeesHandler, UpdateEmployeeHandler,
};
use std::sync::Arc;
use std::time::Duration;
use workforce_core::messaging::{CommandRegistry, QueryRegistry};
use workforce_core::{Employee, WorkforceResult};
use workforce_repository::{ReadRepository, RepositoryFactory};

/// Builds the query registry. Employee lookups by national ID go through
/// the cache.
///
/// # Errors
/// `HandlerAlreadyRegistered` if a pair is registered twice.
pub fn query_registry(
    repository: Arc<dyn ReadRepository<Employee>>,
    cache: Arc<dyn CacheInterface>,
    ttl: Option<Duration>,
) -> WorkforceResult<QueryRegistry> {
    let get = CacheAside::new(GetEmployeeHandler::new(Arc::clone(&repository)), cache, ttl);

    Ok(QueryRegistry::builder()
        .register::<GetEmployeeQuery, EmployeeResponse, _>(get)?
        .register::<ListEmployeesQuery, EmployeePageResponse, _>(ListEmployeesHandler::new(repository))?
        .build())
}

/// Builds the command registry.
///
/// # Errors
/// `HandlerAlreadyRegistered` if a pair is registered twice.
pub fn command_registry(factory: Arc<dyn RepositoryFactory<Employee>>) -> WorkforceResult<CommandRegistry> {
    Ok(CommandRegistry::builder()
        .register::<CreateEmployeeCommand, EmployeeResponse, _>(CreateEmployeeHandler::new(Arc::clone(&factory)))?
        .register::<UpdateEmployeeCommand, EmployeeResponse, _>(UpdateEmployeeHandler::new(Arc::clone(&factory)))?
        .register::<DeleteEmployeeCommand, EmployeeResponse, _>(DeleteEmployeeHandler::new(factory))?
        .build())
}
