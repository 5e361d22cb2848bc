//! # Workforce Service
//!
//! Application layer of the Workforce HR API: employee query and command
//! handlers, the registries that bind them to request types, the
//! cache-aside decorator and authentication.

pub mod auth_service;
pub mod cache;
pub mod dto;
pub mod employee;
pub mod mappers;
pub mod registry;

pub use auth_service::*;
pub use cache::*;
pub use dto::*;
pub use employee::*;
pub use registry::*;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::dto::CreateEmployeeCommand;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;
    use workforce_core::{Employee, Predicate, WorkforceResult};
    use workforce_repository::{InMemoryRepository, InMemoryStore, ReadRepository};

    pub(crate) fn employee(id: i32, national_id: &str) -> Employee {
        Employee {
            business_entity_id: id,
            national_id_number: national_id.to_string(),
            login_id: format!("adventure-works\\user{id}"),
            organization_level: Some(2),
            job_title: "Design Engineer".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1977, 3, 4).unwrap(),
            marital_status: "M".to_string(),
            gender: "F".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2008, 1, 6).unwrap(),
            salaried_flag: true,
            vacation_hours: 5,
            sick_leave_hours: 22,
            current_flag: true,
            rowguid: Uuid::new_v4(),
            modified_date: NaiveDate::from_ymd_opt(2014, 6, 30)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    pub(crate) fn seeded_store() -> InMemoryStore<Employee> {
        let mut retired = employee(3, "509647174");
        retired.current_flag = false;
        InMemoryStore::with_rows([employee(1, "14417807"), employee(2, "245797967"), retired])
    }

    pub(crate) fn create_command() -> CreateEmployeeCommand {
        CreateEmployeeCommand {
            business_entity_id: 300,
            national_id_number: "771234567".to_string(),
            login_id: "adventure-works\\jane0".to_string(),
            organization_level: Some(3),
            job_title: "Production Technician - WC60".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            marital_status: "S".to_string(),
            gender: "F".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            salaried_flag: false,
            vacation_hours: 10,
            sick_leave_hours: 20,
            current_flag: true,
        }
    }

    /// Read repository that counts every call reaching it.
    pub(crate) struct CountingRepository {
        inner: InMemoryRepository<Employee>,
        calls: AtomicUsize,
    }

    impl CountingRepository {
        pub(crate) fn new(store: InMemoryStore<Employee>) -> Self {
            Self {
                inner: store.repository(),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn hit(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ReadRepository<Employee> for CountingRepository {
        async fn find_all(&self, as_no_tracking: bool) -> WorkforceResult<Vec<Employee>> {
            self.hit();
            self.inner.find_all(as_no_tracking).await
        }

        async fn find_by_id(&self, id: &i32, as_no_tracking: bool) -> WorkforceResult<Option<Employee>> {
            self.hit();
            self.inner.find_by_id(id, as_no_tracking).await
        }

        async fn find(
            &self,
            predicate: &Predicate<workforce_core::EmployeeField>,
            as_no_tracking: bool,
        ) -> WorkforceResult<Vec<Employee>> {
            self.hit();
            self.inner.find(predicate, as_no_tracking).await
        }
    }
}
