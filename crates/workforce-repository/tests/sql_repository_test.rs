//! MySQL repository integration tests.
//!
//! Run with `cargo test -p workforce-repository -- --ignored` on a host with Docker.

mod common;

use chrono::NaiveDate;
use common::TestDatabase;
use uuid::Uuid;
use workforce_core::{Employee, EmployeeField, Predicate, WorkforceError};
use workforce_repository::{
    ReadRepository, Repository, RepositoryFactory, SqlRepository, SqlRepositoryFactory, UnitOfWork,
};

fn employee(id: i32, national_id: &str, level: Option<i16>) -> Employee {
    Employee {
        business_entity_id: id,
        national_id_number: national_id.to_string(),
        login_id: format!("adventure-works\\user{id}"),
        organization_level: level,
        job_title: "Research and Development Engineer".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1984, 11, 30).unwrap(),
        marital_status: "S".to_string(),
        gender: "M".to_string(),
        hire_date: NaiveDate::from_ymd_opt(2009, 2, 8).unwrap(),
        salaried_flag: false,
        vacation_hours: 62,
        sick_leave_hours: 51,
        current_flag: true,
        rowguid: Uuid::new_v4(),
        modified_date: NaiveDate::from_ymd_opt(2014, 6, 30)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
    }
}

async fn seed(db: &TestDatabase) {
    let repo = SqlRepository::<Employee>::new(db.pool());
    repo.add(employee(1, "14417807", Some(3)));
    repo.add(employee(2, "253022876", None));
    assert_eq!(repo.commit().await.unwrap(), 2);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_by_natural_key_round_trips_columns() {
    let db = TestDatabase::new().await;
    seed(&db).await;

    let repo = SqlRepository::<Employee>::new(db.pool());
    let found = repo
        .find(&Predicate::eq(EmployeeField::NationalIdNumber, "14417807"), true)
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].business_entity_id, 1);
    assert_eq!(found[0].organization_level, Some(3));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_tracking_modes_agree_and_nulls_follow_sql() {
    let db = TestDatabase::new().await;
    seed(&db).await;

    let repo = SqlRepository::<Employee>::new(db.pool());
    assert_eq!(repo.find_all(true).await.unwrap(), repo.find_all(false).await.unwrap());

    let not_three = repo
        .find(&!Predicate::eq(EmployeeField::OrganizationLevel, 3), true)
        .await
        .unwrap();
    assert!(not_three.is_empty());

    let unset = repo
        .find(&Predicate::is_null(EmployeeField::OrganizationLevel), true)
        .await
        .unwrap();
    assert_eq!(unset.len(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_and_delete_through_factory_scope() {
    let db = TestDatabase::new().await;
    seed(&db).await;
    let factory = SqlRepositoryFactory::<Employee>::new(db.pool());

    let scope = factory.scope();
    let mut loaded = scope.find_by_id(&2, false).await.unwrap().unwrap();
    loaded.job_title = "Senior Tool Designer".to_string();
    scope.update(loaded);
    assert_eq!(scope.commit().await.unwrap(), 1);

    let scope = factory.scope();
    let reloaded = scope.find_by_id(&2, false).await.unwrap().unwrap();
    assert_eq!(reloaded.job_title, "Senior Tool Designer");
    scope.delete(reloaded);
    assert_eq!(scope.commit().await.unwrap(), 1);
    assert!(scope.find_by_id(&2, true).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_failed_commit_rolls_back_whole_batch() {
    let db = TestDatabase::new().await;
    seed(&db).await;

    let repo = SqlRepository::<Employee>::new(db.pool());
    repo.add(employee(3, "509647174", None));
    repo.add(employee(4, "14417807", None));

    let err = repo.commit().await.unwrap_err();
    assert!(matches!(err, WorkforceError::Database(_)));
    assert!(repo.has_pending_changes());
    assert_eq!(repo.find_all(true).await.unwrap().len(), 2);
}
