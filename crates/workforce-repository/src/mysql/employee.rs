//! `employee` table mapping.

use super::SqlEntity;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::FromRow;
use uuid::Uuid;
use workforce_core::{Employee, WorkforceError, WorkforceResult};

/// Database row representation of an employee.
#[derive(Debug, FromRow)]
pub struct EmployeeRow {
    business_entity_id: i32,
    national_id_number: String,
    login_id: String,
    organization_level: Option<i16>,
    job_title: String,
    birth_date: NaiveDate,
    marital_status: String,
    gender: String,
    hire_date: NaiveDate,
    salaried_flag: bool,
    vacation_hours: i16,
    sick_leave_hours: i16,
    current_flag: bool,
    rowguid: String, // CHAR(36)
    modified_date: NaiveDateTime,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = WorkforceError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        let rowguid = Uuid::parse_str(&row.rowguid)
            .map_err(|e| WorkforceError::Internal(format!("Invalid UUID in database: {e}")))?;

        Ok(Employee {
            business_entity_id: row.business_entity_id,
            national_id_number: row.national_id_number,
            login_id: row.login_id,
            organization_level: row.organization_level,
            job_title: row.job_title,
            birth_date: row.birth_date,
            marital_status: row.marital_status,
            gender: row.gender,
            hire_date: row.hire_date,
            salaried_flag: row.salaried_flag,
            vacation_hours: row.vacation_hours,
            sick_leave_hours: row.sick_leave_hours,
            current_flag: row.current_flag,
            rowguid,
            modified_date: row.modified_date,
        })
    }
}

impl SqlEntity for Employee {
    const TABLE: &'static str = "employee";
    type Row = EmployeeRow;

    fn from_row(row: EmployeeRow) -> WorkforceResult<Self> {
        Employee::try_from(row)
    }
}
