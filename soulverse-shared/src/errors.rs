use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::clients::StoreError;
use crate::types::ApiErrorResponse;

/// Broad failure categories every error code falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed or missing input.
    InvalidArgument,
    /// A referenced entity does not exist.
    NotFound,
    /// The operation would violate a guard, e.g. liking twice.
    InvalidState,
    /// Unexpected store or runtime failure.
    Internal,
}

impl ErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument | Self::InvalidState => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Application error codes following the pattern E{service}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E2xxx: Profile service errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    ValidationError,
    StoreUnavailable,

    // Profile service (E2xxx)
    ProfileNotFound,
    UserNotFound,
    CommentNotFound,
    MissingIdentifier,
    InvalidIdentifier,
    MissingFields,
    CommentAlreadyLiked,
    CommentNotLiked,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::ValidationError => "E0002",
            Self::StoreUnavailable => "E0007",

            // Profile service
            Self::ProfileNotFound => "E2001",
            Self::UserNotFound => "E2002",
            Self::CommentNotFound => "E2003",
            Self::MissingIdentifier => "E2004",
            Self::InvalidIdentifier => "E2005",
            Self::MissingFields => "E2006",
            Self::CommentAlreadyLiked => "E2007",
            Self::CommentNotLiked => "E2008",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StoreUnavailable => ErrorKind::Internal,
            Self::ValidationError | Self::MissingIdentifier | Self::InvalidIdentifier
            | Self::MissingFields => ErrorKind::InvalidArgument,
            Self::ProfileNotFound | Self::UserNotFound | Self::CommentNotFound => ErrorKind::NotFound,
            Self::CommentAlreadyLiked | Self::CommentNotLiked => ErrorKind::InvalidState,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known { code: ErrorCode, message: String },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Known { code, .. } => code.kind(),
            AppError::Store(_) => ErrorKind::Internal,
        }
    }

    /// The concrete code, if this error carries one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            AppError::Known { code, .. } => Some(*code),
            AppError::Store(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message } => {
                let status = code.status_code();
                if status.is_server_error() {
                    tracing::error!(code = code.code(), "{message}");
                } else {
                    tracing::warn!(code = code.code(), status = status.as_u16(), "{message}");
                }
                (status, ApiErrorResponse::new(code.code(), message))
            }
            AppError::Store(err) => {
                tracing::error!(error = %err, "store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new(ErrorCode::StoreUnavailable.code(), err.to_string()),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
