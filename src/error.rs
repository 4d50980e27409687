use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Error taxonomy for the whole data/workflow layer.
///
/// Every failure is local to one operation; collections are only written
/// back after the in-memory computation succeeded, so none of these leave
/// the store in a corrupt state.
#[derive(Debug, Display)]
pub enum ServiceError {
    #[display(fmt = "{} not found", _0)]
    NotFound(String),

    #[display(fmt = "{} already exists", _0)]
    DuplicateId(String),

    #[display(fmt = "{}", _0)]
    Forbidden(String),

    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "storage error: {}", _0)]
    Storage(String),
}

impl ServiceError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ServiceError::NotFound(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ServiceError::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ServiceError::Forbidden(msg.into())
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::DuplicateId(_) => StatusCode::CONFLICT,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ServiceError::Storage(msg) = self {
            tracing::error!(error = %msg, "storage failure");
            // Do not leak paths or serde detail to clients
            return HttpResponse::InternalServerError().json(json!({
                "error": "Internal Server Error"
            }));
        }

        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string()
        }))
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self {
        ServiceError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Storage(e.to_string())
    }
}
