use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::path::PathBuf;

use crate::render;

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid form: {0}")]
    Validation(String),

    #[error("No course selected")]
    CourseNotSelected,

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ReviewError>;

impl ReviewError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReviewError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ReviewError::NotFound(_) => StatusCode::NOT_FOUND,
            ReviewError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ReviewError::CourseNotSelected => StatusCode::CONFLICT,
            ReviewError::Parse { .. } | ReviewError::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the reviewer. IO failures stay generic, details go to the log.
    pub fn public_message(&self) -> String {
        match self {
            ReviewError::Io { .. } => "Unexpected error while handling the request".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, Html(render::error_page(&self.public_message()))).into_response()
    }
}
