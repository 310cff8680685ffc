use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::{describe_violations, FieldViolation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    NotFound,
    Validation,
    Internal,
}

/// Error body returned by the creators backend.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_record(violations: &[FieldViolation]) -> Self {
        Self::new(ErrorCode::Validation, describe_violations(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CreatorDraft;

    #[test]
    fn error_body_uses_snake_case_codes() {
        let json = serde_json::to_value(ApiError::new(ErrorCode::NotFound, "creator 4 not found"))
            .expect("json");
        assert_eq!(json["code"], "not_found");
        assert_eq!(json["message"], "creator 4 not found");
    }

    #[test]
    fn invalid_record_lists_each_violation() {
        let violations = CreatorDraft::empty().validate().expect_err("invalid");
        let err = ApiError::invalid_record(&violations);
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(
            err.message,
            "name is required; url is required; description is required"
        );
    }
}
