use std::fmt;

use actix_web::{error, http::StatusCode, HttpResponse};
use dbctl_core::error::OrchestrationError;
use tracing::error;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug)]
pub struct ApiError(pub OrchestrationError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<OrchestrationError> for ApiError {
    fn from(e: OrchestrationError) -> Self {
        error!("request failed: {e}");
        ApiError(e)
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            OrchestrationError::Validation(_) => StatusCode::BAD_REQUEST,
            OrchestrationError::NotFound(_) => StatusCode::NOT_FOUND,
            OrchestrationError::Duplicate(_) => StatusCode::CONFLICT,
            OrchestrationError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OrchestrationError::AgentTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            OrchestrationError::AgentRetryableFailure(_) => StatusCode::BAD_GATEWAY,
            OrchestrationError::AgentFatalFailure(_) => StatusCode::BAD_GATEWAY,
            OrchestrationError::JobFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            OrchestrationError::LocalCommitFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OrchestrationError::PartialSyncFailure { .. } => StatusCode::MULTI_STATUS,
            OrchestrationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OrchestrationError::DbError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.0.to_string() }))
    }
}
