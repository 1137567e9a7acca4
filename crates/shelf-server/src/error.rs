use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shelf_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    Store(#[from] StoreError),

    /// The request could not be extracted (bad path, query or body).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// HTTP status reported for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Store(err) => match err {
                StoreError::PromptNotFound(_)
                | StoreError::RecycleItemNotFound(_)
                | StoreError::VersionNotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::InvalidId { .. } | StoreError::InvalidVersionRef(_) => {
                    StatusCode::BAD_REQUEST
                }
                StoreError::ParentMissing { .. } | StoreError::AlreadyExists(_) => {
                    StatusCode::CONFLICT
                }
                StoreError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                StoreError::Serialization(_) | StoreError::Io(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Rejected { status, .. } => *status,
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

macro_rules! from_rejection {
    ($($rejection:ty),*) => {$(
        impl From<$rejection> for ServerError {
            fn from(rejection: $rejection) -> Self {
                Self::Rejected {
                    status: rejection.status(),
                    message: rejection.body_text(),
                }
            }
        }
    )*};
}

from_rejection!(JsonRejection, PathRejection, QueryRejection);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let cases = [
            (StoreError::PromptNotFound("p".into()), StatusCode::NOT_FOUND),
            (
                StoreError::VersionNotFound { id: "p".into(), index: 3 },
                StatusCode::NOT_FOUND,
            ),
            (
                StoreError::InvalidId { id: "..".into(), reason: "dots".into() },
                StatusCode::BAD_REQUEST,
            ),
            (
                StoreError::ParentMissing { prompt_id: "p".into() },
                StatusCode::CONFLICT,
            ),
            (
                StoreError::TooLarge { what: "text", actual: 9, limit: 1 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                StoreError::Serialization("bad".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ServerError::from(err).status(), status);
        }
    }

    #[test]
    fn response_carries_status() {
        let err = ServerError::from(StoreError::RecycleItemNotFound("r".into()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
