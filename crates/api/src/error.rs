use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Validation(_) => "validation_error",
            ApiError::Internal(_) => "internal_error",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!("Internal error: {}", detail);
        }

        let status = self.status();
        let code = self.code();
        let message = match self {
            // Internal details stay in the logs, not the response
            ApiError::Internal(_) => "An internal error occurred".to_string(),
            ApiError::NotFound(m)
            | ApiError::Conflict(m)
            | ApiError::Validation(m)
            | ApiError::ServiceUnavailable(m) => m,
        };

        (
            status,
            Json(ErrorBody {
                error: code,
                message,
            }),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db) => match db.code().as_deref() {
                // unique_violation: the assignment slot is already taken
                Some("23505") => ApiError::Conflict("Resource already exists".into()),
                // foreign_key_violation: the referenced row is gone
                Some("23503") => ApiError::NotFound("Referenced resource not found".into()),
                _ => ApiError::Internal(format!("Database error: {}", db)),
            },
            other => ApiError::Internal(format!("Database error: {}", other)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
            })
            .collect();
        // field_errors is a map, sort for a stable message
        messages.sort();

        let message = match messages.len() {
            1 => messages.remove(0),
            n => format!("{} validation errors: {}", n, messages.join("; ")),
        };

        ApiError::Validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use validator::Validate;

    #[test]
    fn test_status_and_code_per_variant() {
        let cases = [
            (
                ApiError::NotFound("x".into()),
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                ApiError::Conflict("x".into()),
                StatusCode::CONFLICT,
                "conflict",
            ),
            (
                ApiError::Validation("x".into()),
                StatusCode::BAD_REQUEST,
                "validation_error",
            ),
            (
                ApiError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
            ),
            (
                ApiError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(error.status(), status);
            assert_eq!(error.code(), code);
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            error: "conflict",
            message: "Donation is already reserved".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error": "conflict",
                "message": "Donation is already reserved",
            })
        );
    }

    #[test]
    fn test_display_includes_detail() {
        assert_eq!(
            ApiError::NotFound("Donation not found".into()).to_string(),
            "Not found: Donation not found"
        );
        assert_eq!(
            ApiError::Conflict("held by another food bank".into()).to_string(),
            "Conflict: held by another food bank"
        );
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        match error {
            ApiError::NotFound(msg) => assert_eq!(msg, "Resource not found"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_from_validation_errors_single_message() {
        let request = domain::models::donation::CreateDonationRequest {
            establishment_id: 1,
            product_name: "Bread".to_string(),
            description: None,
            quantity: 0,
            unit: "loaves".to_string(),
            expiration_date: chrono::Utc::now() + chrono::Duration::days(1),
            photo_url: None,
        };
        let error: ApiError = request.validate().unwrap_err().into();
        match error {
            ApiError::Validation(msg) => {
                assert_eq!(msg, "Quantity must be greater than zero");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_from_validation_errors_combines_messages() {
        let request = domain::models::donation::CreateDonationRequest {
            establishment_id: 1,
            product_name: "Bread".to_string(),
            description: None,
            quantity: 0,
            unit: "loaves".to_string(),
            expiration_date: chrono::Utc::now() - chrono::Duration::days(1),
            photo_url: None,
        };
        let error: ApiError = request.validate().unwrap_err().into();
        match error {
            ApiError::Validation(msg) => {
                assert!(msg.starts_with("2 validation errors:"), "{msg}");
                assert!(msg.contains("Quantity must be greater than zero"));
                assert!(msg.contains("Expiration date cannot be in the past"));
            }
            _ => panic!("Expected Validation error"),
        }
    }
}
