use axum::{http::StatusCode, response::Json};
use compute::ComputeError;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

/// Message shown when a prediction is requested for a site name without a station id.
pub const MISSING_SITE_MESSAGE: &str = "Station ID missing — cannot predict.";

pub fn unknown_site_message(name: &str) -> String {
    format!("Unknown site '{}'", name)
}

pub fn error_response(status: StatusCode, code: &str, error: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
            success: false,
        }),
    )
}

/// Like `compute_error_response`, but an unknown site reads as a failed prediction.
pub fn prediction_error_response(err: ComputeError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        ComputeError::MissingSite(name) => {
            warn!("Prediction requested for unknown site: {}", name);
            error_response(StatusCode::NOT_FOUND, "MISSING_SITE", MISSING_SITE_MESSAGE)
        }
        other => compute_error_response(other),
    }
}

/// Maps a compute failure to its HTTP status and stable error code.
pub fn compute_error_response(err: ComputeError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        ComputeError::MissingSite(name) => {
            warn!("Unknown site requested: {}", name);
            error_response(StatusCode::NOT_FOUND, "MISSING_SITE", unknown_site_message(&name))
        }
        ComputeError::InvalidRequest(reason) => {
            warn!("Rejected request: {}", reason);
            error_response(StatusCode::BAD_REQUEST, "INVALID_REQUEST", reason)
        }
        ComputeError::SchemaMismatch(_) | ComputeError::ModelMismatch(_) => {
            error!("Model failure: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "MODEL_ERROR", err.to_string())
        }
        other => {
            error!("Computation failed: {}", other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "COMPUTE_ERROR", other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_site_is_not_found() {
        let (status, Json(body)) = compute_error_response(ComputeError::MissingSite("Nowhere".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "MISSING_SITE");
        assert_eq!(body.error, "Unknown site 'Nowhere'");
        assert!(!body.success);
    }

    #[test]
    fn test_missing_site_during_prediction_cannot_predict() {
        let (status, Json(body)) = prediction_error_response(ComputeError::MissingSite("Nowhere".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "MISSING_SITE");
        assert_eq!(body.error, MISSING_SITE_MESSAGE);
    }

    #[test]
    fn test_prediction_errors_fall_back_to_compute_mapping() {
        let (status, Json(body)) = prediction_error_response(ComputeError::ModelMismatch("bad".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "MODEL_ERROR");
    }

    #[test]
    fn test_invalid_request_is_bad_request() {
        let (status, Json(body)) =
            compute_error_response(ComputeError::InvalidRequest("cannot plot O2 against itself".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "INVALID_REQUEST");
    }

    #[test]
    fn test_model_failures_are_server_errors() {
        let (status, Json(body)) = compute_error_response(ComputeError::ModelMismatch("bad".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "MODEL_ERROR");
    }
}
