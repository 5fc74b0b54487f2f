// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for the HTTP API.
//!
//! Every failure leaves the server as a JSON body `{"error": "..."}` with the
//! matching status code.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use daystreak_core::CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// API errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The `x-user-id` header is absent or empty.
    #[error("Missing x-user-id header")]
    MissingUser,

    /// The caller is not on the allow-list.
    #[error("User not allowed")]
    Forbidden,

    /// Path, query or body could not be decoded.
    #[error("{0}")]
    BadRequest(String),

    /// Domain or persistence operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingUser => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Core(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::MissingUser.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::BadRequest("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CoreError::invalid_date("x")).status(),
            StatusCode::BAD_REQUEST
        );
        let db = CoreError::DatabaseError {
            operation: "query".to_string(),
            details: "locked".to_string(),
        };
        assert_eq!(
            ApiError::from(db).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_match_wire_contract() {
        assert_eq!(ApiError::MissingUser.to_string(), "Missing x-user-id header");
        assert_eq!(ApiError::Forbidden.to_string(), "User not allowed");
    }
}
