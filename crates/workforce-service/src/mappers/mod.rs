//! Entity-DTO mappers.

use crate::dto::{EmployeePageResponse, EmployeeResponse};
use workforce_core::{Employee, Page};

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            business_entity_id: employee.business_entity_id,
            national_id_number: employee.national_id_number,
            login_id: employee.login_id,
            organization_level: employee.organization_level,
            job_title: employee.job_title,
            birth_date: employee.birth_date,
            marital_status: employee.marital_status,
            gender: employee.gender,
            hire_date: employee.hire_date,
            salaried_flag: employee.salaried_flag,
            vacation_hours: employee.vacation_hours,
            sick_leave_hours: employee.sick_leave_hours,
            current_flag: employee.current_flag,
            rowguid: employee.rowguid,
            modified_date: employee.modified_date,
        }
    }
}

impl From<&Employee> for EmployeeResponse {
    fn from(employee: &Employee) -> Self {
        Self::from(employee.clone())
    }
}

/// Converts a page of employees to the list response.
impl From<Page<Employee>> for EmployeePageResponse {
    fn from(page: Page<Employee>) -> Self {
        Self {
            employees: page.content.into_iter().map(EmployeeResponse::from).collect(),
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
        }
    }
}
