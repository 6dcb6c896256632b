//! Requester identity extractor
//!
//! The messaging front-end forwards the user's identity in headers:
//! `X-Requester-Id` (required) and `X-Requester-Name` (optional).

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::AppError;

use crate::core::ServerState;

pub const REQUESTER_ID_HEADER: &str = "x-requester-id";
pub const REQUESTER_NAME_HEADER: &str = "x-requester-name";

/// Identity of the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub id: String,
    pub name: Option<String>,
}

impl Requester {
    /// `"{id}:{name}"` as stored in audit columns
    pub fn label(&self) -> String {
        shared::util::actor_label(&self.id, self.name.as_deref())
    }
}

fn header(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl FromRequestParts<ServerState> for Requester {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(requester) = parts.extensions.get::<Requester>() {
            return Ok(requester.clone());
        }

        let Some(id) = header(parts, REQUESTER_ID_HEADER) else {
            tracing::warn!(uri = %parts.uri, "Request without requester identity");
            return Err(AppError::not_authenticated());
        };

        let requester = Requester {
            id,
            name: header(parts, REQUESTER_NAME_HEADER),
        };
        parts.extensions.insert(requester.clone());
        Ok(requester)
    }
}
