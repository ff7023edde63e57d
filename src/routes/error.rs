use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

use crate::error::{AuthError, LedgerError, ParseError, SessionError, ValidationError};

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Log the cause and answer with a generic 500.
    pub fn internal(err: impl fmt::Debug) -> Self {
        error!("Internal error: {:?}", err);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Terjadi kesalahan pada server.",
        )
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "status": "error",
                "message": self.message
            })),
        )
            .into_response()
    }
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::RoomNotFound(_)
            | ValidationError::TenantNotFound(_)
            | ValidationError::PaymentNotFound(_) => Self::not_found(err.to_string()),
            ValidationError::DuplicateRoom(_) => Self::conflict(err.to_string()),
            ValidationError::InvalidProofLink(_) | ValidationError::DateOverflow => {
                Self::bad_request(err.to_string())
            }
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Parse(e) => e.into(),
            LedgerError::Validation(e) => e.into(),
            LedgerError::Forbidden(capability) => {
                warn!(%capability, "capability denied");
                Self::forbidden(err.to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::unauthorized(err.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Auth(e) => e.into(),
            SessionError::Ledger(e) => e.into(),
        }
    }
}

// Body atau path yang tidak bisa dibaca tetap pakai format error yang sama
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(status = %rejection.status(), "rejected request body");
        Self::bad_request(format!("Request tidak valid: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        warn!(status = %rejection.status(), "rejected request path");
        Self::bad_request(format!("Request tidak valid: {}", rejection.body_text()))
    }
}
