use actix_web::HttpResponse;
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::errors::StorageError;

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound { .. } => AppError::NotFound(e.to_string()),
            StorageError::Cancelled { .. } => AppError::Timeout,
            StorageError::Connection(_)
            | StorageError::Query { .. }
            | StorageError::Transaction { .. } => {
                log::error!("storage failure: {}", e);
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Timeout => HttpResponse::GatewayTimeout().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Internal(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })),
        }
    }
}

/// Fatal conditions that stop the service before it starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Connection(#[from] StorageError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("order with id 1 not found".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn bad_request_returns_400() {
        let resp = AppError::BadRequest("invalid price".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn timeout_returns_504() {
        assert_eq!(
            AppError::Timeout.error_response().status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_error_display() {
        assert_eq!(
            AppError::Internal("msg".to_string()).to_string(),
            "Internal error: msg"
        );
    }

    #[test]
    fn storage_not_found_maps_to_app_not_found() {
        let app_err: AppError = StorageError::NotFound {
            entity: "product",
            id: 3,
        }
        .into();
        assert!(matches!(app_err, AppError::NotFound(ref msg) if msg == "product with id 3 not found"));
    }

    #[test]
    fn storage_cancelled_maps_to_timeout() {
        let app_err: AppError = StorageError::Cancelled {
            op: "list orders".to_string(),
        }
        .into();
        assert!(matches!(app_err, AppError::Timeout));
    }

    #[test]
    fn storage_query_maps_to_internal() {
        let app_err: AppError = StorageError::query("insert order", "connection reset").into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
