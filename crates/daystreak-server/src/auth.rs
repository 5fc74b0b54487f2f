// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Request identity.
//!
//! Callers identify themselves with the `x-user-id` header. There is no
//! authentication beyond an optional allow-list: when the list is empty any
//! non-empty id is accepted.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::error::ApiError;
use crate::routes::AppState;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Users permitted to call the API.
#[derive(Debug, Clone, Default)]
pub struct AllowList(Arc<HashSet<String>>);

impl AllowList {
    /// Build from a list of ids; an empty list admits everyone.
    pub fn new(ids: impl IntoIterator<Item = String>) -> Self {
        Self(Arc::new(ids.into_iter().collect()))
    }

    /// True when no restriction applies.
    pub fn is_open(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `user_id` may call the API.
    pub fn permits(&self, user_id: &str) -> bool {
        self.is_open() || self.0.contains(user_id)
    }
}

/// Authenticated caller, placed in request extensions by [`require_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(pub String);

impl UserId {
    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Middleware rejecting requests without an acceptable `x-user-id`.
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or(ApiError::MissingUser)?
        .to_string();

    if !state.allowed_users.permits(&user_id) {
        debug!(user_id = %user_id, "Rejected user not on allow-list");
        return Err(ApiError::Forbidden);
    }

    req.extensions_mut().insert(UserId(user_id));
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserId>()
            .cloned()
            .ok_or(ApiError::MissingUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_allow_list_is_open() {
        let list = AllowList::default();
        assert!(list.is_open());
        assert!(list.permits("anyone"));
    }

    #[test]
    fn test_allow_list_restricts() {
        let list = AllowList::new(["alice".to_string(), "bob".to_string()]);
        assert!(!list.is_open());
        assert!(list.permits("alice"));
        assert!(!list.permits("mallory"));
    }
}
