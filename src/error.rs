use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures talking to the REST backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend rejected the credentials")]
    Unauthorized,
    #[error("backend refused access")]
    Forbidden,
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("backend answered {status}")]
    Status { status: u16 },
    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),
}

/// Errors returned by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("authentication required")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized | AppError::Backend(BackendError::Unauthorized) => (
                StatusCode::UNAUTHORIZED,
                "Session expirée, veuillez vous reconnecter".to_string(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Backend(BackendError::Forbidden) => (
                StatusCode::FORBIDDEN,
                "Accès réservé aux organisateurs".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Backend(BackendError::Rejected { message, .. }) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Backend(BackendError::NotFound(what)) => {
                (StatusCode::NOT_FOUND, format!("Introuvable: {}", what))
            }
            AppError::Backend(err) => {
                tracing::error!("Backend call failed: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    "Le service est momentanément indisponible".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}
