//! Employee requests and responses.

use crate::cache::{cache_keys, CacheableQuery};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};
use workforce_core::messaging::{Command, Query};
use workforce_core::rules::{not_blank, one_of};
use workforce_core::{Employee, PageRequest};

fn valid_marital_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, &["M", "S"])
}

fn valid_gender(value: &str) -> Result<(), ValidationError> {
    one_of(value, &["M", "F"])
}

/// Looks up one employee by national ID number.
#[derive(Debug, Clone, Validate)]
pub struct GetEmployeeQuery {
    #[validate(custom(function = "not_blank", message = "EmployeeId Cannot be null/empty"))]
    pub national_id_number: String,
}

impl GetEmployeeQuery {
    #[must_use]
    pub fn new(national_id_number: impl Into<String>) -> Self {
        Self {
            national_id_number: national_id_number.into(),
        }
    }
}

impl Query for GetEmployeeQuery {
    const NAME: &'static str = "GetEmployeeQuery";
}

impl CacheableQuery for GetEmployeeQuery {
    fn cache_key(&self) -> String {
        cache_keys::employee_by_national_id(&self.national_id_number)
    }
}

/// Query-string filters of the employee list.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEmployeesParams {
    /// Page number (0-indexed).
    pub page: Option<usize>,
    /// Page size (1-100, default 20).
    pub size: Option<usize>,
    /// Only current (`true`) or former (`false`) employees.
    pub current: Option<bool>,
}

/// Lists employees a page at a time, ordered by business entity id.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListEmployeesQuery {
    pub page: PageRequest,
    pub current: Option<bool>,
}

impl From<ListEmployeesParams> for ListEmployeesQuery {
    fn from(params: ListEmployeesParams) -> Self {
        Self {
            page: PageRequest::new(
                params.page.unwrap_or(0),
                params.size.unwrap_or(PageRequest::DEFAULT_SIZE),
            ),
            current: params.current,
        }
    }
}

impl Query for ListEmployeesQuery {
    const NAME: &'static str = "ListEmployeesQuery";
}

/// Creates an employee record.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEmployeeCommand {
    #[validate(range(min = 1, message = "BusinessEntityId must be positive"))]
    pub business_entity_id: i32,

    #[validate(
        custom(function = "not_blank", message = "EmployeeId Cannot be null/empty"),
        length(max = 15, message = "NationalIDNumber cannot exceed 15 characters")
    )]
    pub national_id_number: String,

    #[validate(custom(function = "not_blank", message = "LoginId is required"), length(max = 256))]
    pub login_id: String,

    pub organization_level: Option<i16>,

    #[validate(custom(function = "not_blank", message = "JobTitle is required"), length(max = 50))]
    pub job_title: String,

    #[schema(value_type = String, format = Date)]
    pub birth_date: NaiveDate,

    #[validate(custom(function = "valid_marital_status", message = "MaritalStatus must be M or S"))]
    pub marital_status: String,

    #[validate(custom(function = "valid_gender", message = "Gender must be M or F"))]
    pub gender: String,

    #[schema(value_type = String, format = Date)]
    pub hire_date: NaiveDate,

    #[serde(default = "default_true")]
    pub salaried_flag: bool,

    #[validate(range(min = -40, max = 240, message = "VacationHours must be between -40 and 240"))]
    #[serde(default)]
    pub vacation_hours: i16,

    #[validate(range(min = 0, max = 120, message = "SickLeaveHours must be between 0 and 120"))]
    #[serde(default)]
    pub sick_leave_hours: i16,

    #[serde(default = "default_true")]
    pub current_flag: bool,
}

const fn default_true() -> bool {
    true
}

impl CreateEmployeeCommand {
    /// Builds the new entity with a fresh `rowguid` and modification time.
    #[must_use]
    pub fn into_employee(self) -> Employee {
        let mut employee = Employee {
            business_entity_id: self.business_entity_id,
            national_id_number: self.national_id_number.trim().to_string(),
            login_id: self.login_id,
            organization_level: self.organization_level,
            job_title: self.job_title,
            birth_date: self.birth_date,
            marital_status: self.marital_status,
            gender: self.gender,
            hire_date: self.hire_date,
            salaried_flag: self.salaried_flag,
            vacation_hours: self.vacation_hours,
            sick_leave_hours: self.sick_leave_hours,
            current_flag: self.current_flag,
            rowguid: Uuid::new_v4(),
            modified_date: NaiveDateTime::default(),
        };
        employee.touch();
        employee
    }
}

impl Command for CreateEmployeeCommand {
    const NAME: &'static str = "CreateEmployeeCommand";
}

/// Fields of an employee that may be changed; absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployeeRequest {
    #[validate(custom(function = "not_blank", message = "LoginId cannot be blank"), length(max = 256))]
    pub login_id: Option<String>,

    pub organization_level: Option<i16>,

    #[validate(custom(function = "not_blank", message = "JobTitle cannot be blank"), length(max = 50))]
    pub job_title: Option<String>,

    #[validate(custom(function = "valid_marital_status", message = "MaritalStatus must be M or S"))]
    pub marital_status: Option<String>,

    #[validate(custom(function = "valid_gender", message = "Gender must be M or F"))]
    pub gender: Option<String>,

    pub salaried_flag: Option<bool>,

    #[validate(range(min = -40, max = 240, message = "VacationHours must be between -40 and 240"))]
    pub vacation_hours: Option<i16>,

    #[validate(range(min = 0, max = 120, message = "SickLeaveHours must be between 0 and 120"))]
    pub sick_leave_hours: Option<i16>,

    pub current_flag: Option<bool>,
}

impl UpdateEmployeeRequest {
    /// Copies the provided fields onto the entity.
    pub fn apply_to(self, employee: &mut Employee) {
        if let Some(login_id) = self.login_id {
            employee.login_id = login_id;
        }
        if let Some(level) = self.organization_level {
            employee.organization_level = Some(level);
        }
        if let Some(job_title) = self.job_title {
            employee.job_title = job_title;
        }
        if let Some(marital_status) = self.marital_status {
            employee.marital_status = marital_status;
        }
        if let Some(gender) = self.gender {
            employee.gender = gender;
        }
        if let Some(salaried) = self.salaried_flag {
            employee.salaried_flag = salaried;
        }
        if let Some(hours) = self.vacation_hours {
            employee.vacation_hours = hours;
        }
        if let Some(hours) = self.sick_leave_hours {
            employee.sick_leave_hours = hours;
        }
        if let Some(current) = self.current_flag {
            employee.current_flag = current;
        }
    }
}

/// Updates the employee with the given national ID number.
#[derive(Debug, Clone)]
pub struct UpdateEmployeeCommand {
    pub national_id_number: String,
    pub changes: UpdateEmployeeRequest,
}

impl Command for UpdateEmployeeCommand {
    const NAME: &'static str = "UpdateEmployeeCommand";
}

/// Deletes the employee with the given national ID number.
#[derive(Debug, Clone)]
pub struct DeleteEmployeeCommand {
    pub national_id_number: String,
}

impl Command for DeleteEmployeeCommand {
    const NAME: &'static str = "DeleteEmployeeCommand";
}

/// Employee response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeResponse {
    pub business_entity_id: i32,
    pub national_id_number: String,
    pub login_id: String,
    pub organization_level: Option<i16>,
    pub job_title: String,
    #[schema(value_type = String, format = Date)]
    pub birth_date: NaiveDate,
    pub marital_status: String,
    pub gender: String,
    #[schema(value_type = String, format = Date)]
    pub hire_date: NaiveDate,
    pub salaried_flag: bool,
    pub vacation_hours: i16,
    pub sick_leave_hours: i16,
    pub current_flag: bool,
    pub rowguid: Uuid,
    #[schema(value_type = String, format = DateTime)]
    pub modified_date: NaiveDateTime,
}

/// A page of employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmployeePageResponse {
    pub employees: Vec<EmployeeResponse>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_command;
    use workforce_core::ValidateExt;

    #[test]
    fn test_blank_national_id_rejected() {
        for value in ["", "   ", "\t"] {
            let err = GetEmployeeQuery::new(value).validate_request().unwrap_err();
            assert!(err.to_string().contains("EmployeeId Cannot be null/empty"));
        }
        assert!(GetEmployeeQuery::new("14417807").validate_request().is_ok());
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(GetEmployeeQuery::new("14417807").cache_key(), "NationalIDNumber14417807");
    }

    #[test]
    fn test_list_params_are_clamped() {
        let query = ListEmployeesQuery::from(ListEmployeesParams {
            page: Some(2),
            size: Some(1000),
            current: Some(true),
        });
        assert_eq!(query.page, PageRequest::new(2, 100));
        assert_eq!(query.current, Some(true));

        let defaults = ListEmployeesQuery::from(ListEmployeesParams::default());
        assert_eq!(defaults.page, PageRequest::default());
    }

    #[test]
    fn test_create_command_validation() {
        assert!(create_command().validate().is_ok());

        let mut invalid = create_command();
        invalid.gender = "X".to_string();
        invalid.national_id_number = "1234567890123456".to_string();
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("gender"));
        assert!(fields.contains_key("national_id_number"));
    }

    #[test]
    fn test_into_employee_assigns_identity_fields() {
        let employee = create_command().into_employee();
        assert_eq!(employee.business_entity_id, 300);
        assert!(!employee.rowguid.is_nil());
        assert!(employee.modified_date > NaiveDateTime::default());
    }

    #[test]
    fn test_update_applies_only_provided_fields() {
        let mut employee = create_command().into_employee();
        let before = employee.clone();

        UpdateEmployeeRequest {
            job_title: Some("Production Supervisor - WC60".to_string()),
            vacation_hours: Some(48),
            ..Default::default()
        }
        .apply_to(&mut employee);

        assert_eq!(employee.job_title, "Production Supervisor - WC60");
        assert_eq!(employee.vacation_hours, 48);
        assert_eq!(employee.login_id, before.login_id);
        assert_eq!(employee.gender, before.gender);
    }

    #[test]
    fn test_update_validation_skips_absent_fields() {
        assert!(UpdateEmployeeRequest::default().validate().is_ok());
        let invalid = UpdateEmployeeRequest {
            marital_status: Some("D".to_string()),
            ..Default::default()
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_update_enumerated_fields_are_checked() {
        let valid = UpdateEmployeeRequest {
            marital_status: Some("S".to_string()),
            gender: Some("M".to_string()),
            ..Default::default()
        };
        assert!(valid.validate().is_ok());

        let invalid = UpdateEmployeeRequest {
            marital_status: Some("X".to_string()),
            gender: Some("U".to_string()),
            ..Default::default()
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("marital_status"));
        assert!(fields.contains_key("gender"));
    }
}
