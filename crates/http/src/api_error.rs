//! Typed API error for HTTP handlers.
//!
//! Converts service-layer errors into the standard error envelope
//! `{success: false, error: {code, message}, meta}` with a stable machine
//! code mapped to an HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quento_auth::AuthError;
use quento_analyzer::AnalyzerError;
use quento_service::ServiceError;
use quento_storage::StorageError;

use crate::envelope::Meta;

/// API error carrying the stable machine code and a human-readable message.
#[derive(Debug)]
pub enum ApiError {
    /// 401 UNAUTHORIZED — authentication failed or missing.
    Unauthorized(String),
    /// 401 INVALID_TOKEN — token present but unusable.
    InvalidToken(String),
    /// 403 FORBIDDEN — authenticated but not allowed.
    Forbidden(String),
    /// 404 NOT_FOUND.
    NotFound(String),
    /// 400 VALIDATION_ERROR.
    Validation(String),
    /// 409 USER_EXISTS.
    UserExists(String),
    /// 429 RATE_LIMITED.
    RateLimited { retry_after: u64 },
    /// 503 AI_UNAVAILABLE — upstream completion provider down.
    AiUnavailable(String),
    /// 500 INTERNAL_ERROR — details logged, not exposed.
    Internal(String),
}

impl ApiError {
    const fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::UserExists(_) => (StatusCode::CONFLICT, "USER_EXISTS"),
            Self::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            Self::AiUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "AI_UNAVAILABLE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Unauthorized(msg)
            | Self::InvalidToken(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::AiUnavailable(msg) => msg.clone(),
            Self::UserExists(email) => format!("User with email {email} already exists"),
            Self::RateLimited { retry_after } => {
                format!("Rate limit exceeded, retry after {retry_after}s")
            },
            Self::Internal(_) => "internal server error".to_owned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(error = %detail, "internal server error");
        }
        let (status, code) = self.status_and_code();
        let body = serde_json::json!({
            "success": false,
            "error": {"code": code, "message": self.message()},
            "meta": Meta::default(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { .. } => Self::NotFound(err.to_string()),
            ServiceError::Storage(StorageError::NotFound { .. }) => {
                Self::NotFound(err.to_string())
            },
            ServiceError::Storage(ref storage) if storage.is_duplicate() => {
                Self::Validation(err.to_string())
            },
            ServiceError::UserExists(email) => Self::UserExists(email),
            ServiceError::InvalidInput(msg) => Self::Validation(msg),
            ServiceError::Analyzer(AnalyzerError::InvalidUrl(msg)) => {
                Self::Validation(format!("invalid website URL: {msg}"))
            },
            ServiceError::Auth(auth) => match auth {
                AuthError::InvalidCredentials | AuthError::Inactive => {
                    Self::Unauthorized(auth.to_string())
                },
                AuthError::InvalidToken(_) | AuthError::WrongTokenType | AuthError::Jwks(_) => {
                    Self::InvalidToken(auth.to_string())
                },
                AuthError::WeakPassword(msg) => Self::Validation(msg.to_owned()),
                AuthError::Hashing(detail) => Self::Internal(detail),
            },
            ServiceError::Llm(llm) => Self::AiUnavailable(llm.to_string()),
            ServiceError::Storage(_) | ServiceError::Analyzer(_) | ServiceError::Serialization(_) => {
                Self::Internal(err.to_string())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_statuses() {
        let cases = [
            (ApiError::Unauthorized(String::new()), 401, "UNAUTHORIZED"),
            (ApiError::InvalidToken(String::new()), 401, "INVALID_TOKEN"),
            (ApiError::Forbidden(String::new()), 403, "FORBIDDEN"),
            (ApiError::NotFound(String::new()), 404, "NOT_FOUND"),
            (ApiError::Validation(String::new()), 400, "VALIDATION_ERROR"),
            (ApiError::UserExists(String::new()), 409, "USER_EXISTS"),
            (ApiError::RateLimited { retry_after: 60 }, 429, "RATE_LIMITED"),
            (ApiError::AiUnavailable(String::new()), 503, "AI_UNAVAILABLE"),
            (ApiError::Internal(String::new()), 500, "INTERNAL_ERROR"),
        ];
        for (err, status, code) in cases {
            let (s, c) = err.status_and_code();
            assert_eq!(s.as_u16(), status);
            assert_eq!(c, code);
        }
    }

    #[test]
    fn service_not_found_maps_to_404() {
        let err: ApiError =
            ServiceError::NotFound { entity: "conversation", id: "x".to_owned() }.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn weak_password_maps_to_validation() {
        let err: ApiError =
            ServiceError::Auth(AuthError::WeakPassword("needs a number")).into();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn internal_error_hides_detail() {
        let err = ApiError::Internal("secret detail".to_owned());
        assert_eq!(err.message(), "internal server error");
    }
}
