//! Employee query handlers.

use crate::dto::{EmployeePageResponse, EmployeeResponse, GetEmployeeQuery, ListEmployeesQuery};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use workforce_core::messaging::{ensure_active, until_cancelled, CancellationToken, QueryHandler};
use workforce_core::{Employee, EmployeeField, Page, Predicate, ValidateExt, WorkforceResult};
use workforce_repository::ReadRepository;

/// Finds one employee by national ID number.
pub struct GetEmployeeHandler {
    repository: Arc<dyn ReadRepository<Employee>>,
}

impl GetEmployeeHandler {
    #[must_use]
    pub fn new(repository: Arc<dyn ReadRepository<Employee>>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl QueryHandler<GetEmployeeQuery, EmployeeResponse> for GetEmployeeHandler {
    async fn handle(
        &self,
        query: GetEmployeeQuery,
        cancel: &CancellationToken,
    ) -> WorkforceResult<Option<EmployeeResponse>> {
        query.validate_request()?;
        ensure_active(cancel)?;
        debug!(national_id_number = %query.national_id_number, "Looking up employee");

        let predicate = Predicate::eq(EmployeeField::NationalIdNumber, query.national_id_number.as_str());
        let found = until_cancelled(cancel, self.repository.find(&predicate, true)).await?;

        Ok(found.into_iter().next().map(EmployeeResponse::from))
    }
}

/// Pages through employees, optionally filtered by `current_flag`.
pub struct ListEmployeesHandler {
    repository: Arc<dyn ReadRepository<Employee>>,
}

impl ListEmployeesHandler {
    #[must_use]
    pub fn new(repository: Arc<dyn ReadRepository<Employee>>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl QueryHandler<ListEmployeesQuery, EmployeePageResponse> for ListEmployeesHandler {
    async fn handle(
        &self,
        query: ListEmployeesQuery,
        cancel: &CancellationToken,
    ) -> WorkforceResult<Option<EmployeePageResponse>> {
        ensure_active(cancel)?;

        let rows = match query.current {
            Some(current) => {
                let predicate = Predicate::eq(EmployeeField::CurrentFlag, current);
                until_cancelled(cancel, self.repository.find(&predicate, true)).await?
            }
            None => until_cancelled(cancel, self.repository.find_all(true)).await?,
        };

        let page = Page::slice(rows, query.page);
        info!(
            page = page.page,
            size = page.size,
            total = page.total_elements,
            "Listed employees"
        );
        Ok(Some(page.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seeded_store, CountingRepository};
    use workforce_core::{PageRequest, WorkforceError};

    fn get_handler() -> (GetEmployeeHandler, Arc<CountingRepository>) {
        let repo = Arc::new(CountingRepository::new(seeded_store()));
        (GetEmployeeHandler::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_get_finds_by_national_id() {
        let (handler, repo) = get_handler();
        let found = handler
            .handle(GetEmployeeQuery::new("14417807"), &CancellationToken::new())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.business_entity_id, 1);
        assert_eq!(found.national_id_number, "14417807");
        assert_eq!(repo.calls(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let (handler, _) = get_handler();
        let found = handler
            .handle(GetEmployeeQuery::new("nonexistent"), &CancellationToken::new())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_get_blank_id_fails_before_repository() {
        let (handler, repo) = get_handler();
        let err = handler
            .handle(GetEmployeeQuery::new("  "), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, WorkforceError::Validation(_)));
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_get_cancelled_before_start() {
        let (handler, repo) = get_handler();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = handler
            .handle(GetEmployeeQuery::new("14417807"), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkforceError::Cancelled));
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_list_pages_in_identity_order() {
        let handler = ListEmployeesHandler::new(Arc::new(CountingRepository::new(seeded_store())));
        let query = ListEmployeesQuery {
            page: PageRequest::new(0, 2),
            current: None,
        };

        let page = handler.handle(query, &CancellationToken::new()).await.unwrap().unwrap();
        let ids: Vec<i32> = page.employees.iter().map(|e| e.business_entity_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_list_filters_current_flag() {
        let handler = ListEmployeesHandler::new(Arc::new(CountingRepository::new(seeded_store())));
        let query = ListEmployeesQuery {
            page: PageRequest::default(),
            current: Some(false),
        };

        let page = handler.handle(query, &CancellationToken::new()).await.unwrap().unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.employees[0].national_id_number, "509647174");
    }
}
