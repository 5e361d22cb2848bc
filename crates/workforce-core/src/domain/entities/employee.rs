//! Employee entity.

use crate::{Entity, Field, Value};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An employee record of the human resources schema.
///
/// `business_entity_id` is the surrogate identity; `national_id_number` is
/// the natural key callers look employees up by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub business_entity_id: i32,
    pub national_id_number: String,
    pub login_id: String,
    pub organization_level: Option<i16>,
    pub job_title: String,
    pub birth_date: NaiveDate,
    /// `M` = married, `S` = single.
    pub marital_status: String,
    /// `M` = male, `F` = female.
    pub gender: String,
    pub hire_date: NaiveDate,
    /// Whether the job is salaried (exempt from overtime).
    pub salaried_flag: bool,
    pub vacation_hours: i16,
    pub sick_leave_hours: i16,
    /// `false` once the employee is no longer active.
    pub current_flag: bool,
    pub rowguid: Uuid,
    pub modified_date: NaiveDateTime,
}

impl Employee {
    /// Refreshes the modification timestamp.
    pub fn touch(&mut self) {
        self.modified_date = chrono::Utc::now().naive_utc();
    }
}

/// Addressable columns of [`Employee`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeField {
    BusinessEntityId,
    NationalIdNumber,
    LoginId,
    OrganizationLevel,
    JobTitle,
    BirthDate,
    MaritalStatus,
    Gender,
    HireDate,
    SalariedFlag,
    VacationHours,
    SickLeaveHours,
    CurrentFlag,
    Rowguid,
    ModifiedDate,
}

impl Field for EmployeeField {
    const ALL: &'static [Self] = &[
        Self::BusinessEntityId,
        Self::NationalIdNumber,
        Self::LoginId,
        Self::OrganizationLevel,
        Self::JobTitle,
        Self::BirthDate,
        Self::MaritalStatus,
        Self::Gender,
        Self::HireDate,
        Self::SalariedFlag,
        Self::VacationHours,
        Self::SickLeaveHours,
        Self::CurrentFlag,
        Self::Rowguid,
        Self::ModifiedDate,
    ];

    fn column(self) -> &'static str {
        match self {
            Self::BusinessEntityId => "business_entity_id",
            Self::NationalIdNumber => "national_id_number",
            Self::LoginId => "login_id",
            Self::OrganizationLevel => "organization_level",
            Self::JobTitle => "job_title",
            Self::BirthDate => "birth_date",
            Self::MaritalStatus => "marital_status",
            Self::Gender => "gender",
            Self::HireDate => "hire_date",
            Self::SalariedFlag => "salaried_flag",
            Self::VacationHours => "vacation_hours",
            Self::SickLeaveHours => "sick_leave_hours",
            Self::CurrentFlag => "current_flag",
            Self::Rowguid => "rowguid",
            Self::ModifiedDate => "modified_date",
        }
    }
}

impl Entity for Employee {
    type Id = i32;
    type Field = EmployeeField;

    const NAME: &'static str = "Employee";
    const KEY: EmployeeField = EmployeeField::BusinessEntityId;
    const UNIQUE: &'static [(&'static str, EmployeeField)] = &[
        ("uk_employee_national_id_number", EmployeeField::NationalIdNumber),
        ("uk_employee_login_id", EmployeeField::LoginId),
        ("uk_employee_rowguid", EmployeeField::Rowguid),
    ];

    fn id(&self) -> i32 {
        self.business_entity_id
    }

    fn value_of(&self, field: EmployeeField) -> Value {
        match field {
            EmployeeField::BusinessEntityId => self.business_entity_id.into(),
            EmployeeField::NationalIdNumber => self.national_id_number.as_str().into(),
            EmployeeField::LoginId => self.login_id.as_str().into(),
            EmployeeField::OrganizationLevel => self.organization_level.into(),
            EmployeeField::JobTitle => self.job_title.as_str().into(),
            EmployeeField::BirthDate => self.birth_date.into(),
            EmployeeField::MaritalStatus => self.marital_status.as_str().into(),
            EmployeeField::Gender => self.gender.as_str().into(),
            EmployeeField::HireDate => self.hire_date.into(),
            EmployeeField::SalariedFlag => self.salaried_flag.into(),
            EmployeeField::VacationHours => self.vacation_hours.into(),
            EmployeeField::SickLeaveHours => self.sick_leave_hours.into(),
            EmployeeField::CurrentFlag => self.current_flag.into(),
            EmployeeField::Rowguid => self.rowguid.into(),
            EmployeeField::ModifiedDate => self.modified_date.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Predicate;

    fn ken() -> Employee {
        Employee {
            business_entity_id: 1,
            national_id_number: "295847284".to_string(),
            login_id: "adventure-works\\ken0".to_string(),
            organization_level: None,
            job_title: "Chief Executive Officer".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1969, 1, 29).unwrap(),
            marital_status: "S".to_string(),
            gender: "M".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2009, 1, 14).unwrap(),
            salaried_flag: true,
            vacation_hours: 99,
            sick_leave_hours: 69,
            current_flag: true,
            rowguid: Uuid::nil(),
            modified_date: NaiveDate::from_ymd_opt(2014, 6, 30)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_values_follow_column_order() {
        let values = ken().values();
        assert_eq!(values.len(), EmployeeField::ALL.len());
        assert_eq!(values[0], (EmployeeField::BusinessEntityId, Value::Int(1)));
        assert_eq!(values[3], (EmployeeField::OrganizationLevel, Value::Null));
    }

    #[test]
    fn test_predicate_by_natural_key() {
        let employee = ken();
        assert!(Predicate::eq(EmployeeField::NationalIdNumber, "295847284").matches(&employee));
        assert!(!Predicate::eq(EmployeeField::NationalIdNumber, "14417807").matches(&employee));
        assert!(Predicate::is_null(EmployeeField::OrganizationLevel).matches(&employee));
    }

    #[test]
    fn test_touch_updates_modified_date() {
        let mut employee = ken();
        let before = employee.modified_date;
        employee.touch();
        assert!(employee.modified_date > before);
    }
}
