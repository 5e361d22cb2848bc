//! Validated JSON extractor.
//!
//! `ValidatedJson<T>` deserializes the body and runs `validator` rules on
//! it. Malformed JSON and rule violations are both answered with 400; rule
//! violations carry one detail entry per failing field.

use crate::responses::error_response;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};
use workforce_core::{field_errors, ErrorResponse, FieldError};

/// JSON extractor that validates the deserialized value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection type for validated JSON extraction.
pub enum ValidatedJsonRejection {
    JsonError(JsonRejection),
    ValidationError(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    code: "INVALID_JSON".to_string(),
                    message: format!("Invalid JSON: {}", rejection.body_text()),
                    details: None,
                    trace_id: None,
                },
            ),
            Self::ValidationError(errors) => error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    code: "VALIDATION_ERROR".to_string(),
                    message: "Request validation failed".to_string(),
                    details: None,
                    trace_id: None,
                }
                .with_details(convert_validation_errors(&errors)),
            ),
        }
    }
}

/// Flattens validator errors, prefixing nested struct and list fields.
fn convert_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields = field_errors(errors);

    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Struct(nested) => {
                fields.extend(convert_validation_errors(nested).into_iter().map(|e| FieldError {
                    field: format!("{field}.{}", e.field),
                    ..e
                }));
            }
            ValidationErrorsKind::List(items) => {
                for (index, item) in items {
                    fields.extend(convert_validation_errors(item).into_iter().map(|e| FieldError {
                        field: format!("{field}[{index}].{}", e.field),
                        ..e
                    }));
                }
            }
            ValidationErrorsKind::Field(_) => {}
        }
    }

    fields
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value.validate().map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Hours {
        #[validate(range(min = 0, max = 120, message = "SickLeaveHours must be between 0 and 120"))]
        sick_leave_hours: i16,
        #[validate(length(min = 1, message = "JobTitle is required"))]
        job_title: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Wrapper {
        #[validate(length(min = 1))]
        reason: String,
        #[validate(nested)]
        hours: Hours,
    }

    #[test]
    fn test_single_field() {
        let errors = Hours {
            sick_leave_hours: 500,
            job_title: "Buyer".to_string(),
        }
        .validate()
        .unwrap_err();

        let fields = convert_validation_errors(&errors);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "sick_leave_hours");
        assert_eq!(fields[0].message, "SickLeaveHours must be between 0 and 120");
    }

    #[test]
    fn test_multiple_fields_sorted() {
        let errors = Hours {
            sick_leave_hours: -1,
            job_title: String::new(),
        }
        .validate()
        .unwrap_err();

        let names: Vec<String> = convert_validation_errors(&errors).into_iter().map(|e| e.field).collect();
        assert_eq!(names, vec!["job_title", "sick_leave_hours"]);
    }

    #[test]
    fn test_nested_fields_are_prefixed() {
        let errors = Wrapper {
            reason: "transfer".to_string(),
            hours: Hours {
                sick_leave_hours: 10,
                job_title: String::new(),
            },
        }
        .validate()
        .unwrap_err();

        let fields = convert_validation_errors(&errors);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "hours.job_title");
    }
}
