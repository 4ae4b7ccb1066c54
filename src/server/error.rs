//! Error-to-HTTP response conversion for dashboard handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use clipforge_common::Error;
use serde_json::json;

/// Wrapper so handlers can return `Result<T, AppError>` and use `?` on
/// store calls.
pub struct AppError {
    inner: Error,
}

impl AppError {
    pub fn new(inner: Error) -> Self {
        Self { inner }
    }
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        }

        let code = match &self.inner {
            Error::NotFound { .. } => "not_found",
            Error::Validation(_) => "validation_error",
            Error::Provider { .. } => "provider_error",
            Error::Storage(_) => "storage_error",
            Error::Io { .. } => "io_error",
            Error::Serialization(_) => "serialization_error",
        };

        let body = match &self.inner {
            Error::NotFound { entity, id } => json!({
                "error": format!("{} not found", capitalize(entity)),
                "code": code,
                "id": id,
            }),
            other => json!({
                "error": other.to_string(),
                "code": code,
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
