//! Error types for the Contoso Banking service.
//!
//! This module defines the central `Error` enum, which captures every
//! reportable failure of the lookup collaborators, the pacing controller and
//! the startup integrity check. It implements [`IntoResponse`] so handlers can
//! return `Result<_, Error>` and have failures rendered as a JSON body of the
//! form `{"detail": "..."}` with an appropriate status code.
//!
//! ## Error Cases
//! - `NotFound`: A lookup key matched nothing.
//! - `InvalidArgument`: A request parameter is outside its accepted bounds
//!   (e.g. a pacing delay above the ceiling). Always raised before any
//!   streaming side effect.
//! - `Integrity`: The seeded data is inconsistent (a profile references an
//!   account with no balance record).
//! - `ChannelError`: An internal communication failure between tasks.
//!
//! A client disconnecting mid-stream is *not* an error: it is a normal
//! terminal state of a streaming session.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the banking service.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// A lookup key matched no record.
    #[error("{what} not found")]
    NotFound { what: String },

    /// A request parameter was outside its accepted range.
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The seeded directory and ledger disagree.
    #[error("Data integrity error: {reason}")]
    Integrity { reason: String },

    /// Internal channel send/receive failure.
    #[error("Channel error: {context}")]
    ChannelError { context: String },
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// HTTP status the error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::InvalidArgument { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Integrity { .. } | Error::ChannelError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            Error::NotFound { what } => format!("{what} not found"),
            Error::InvalidArgument { reason } => reason,
            // Internal details stay in the logs.
            Error::Integrity { .. } | Error::ChannelError { .. } => {
                "Internal server error".to_string()
            }
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_kind_to_its_status() {
        assert_eq!(Error::not_found("User").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::invalid_argument("delay_ms too large").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::Integrity {
                reason: "acc001".into()
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_reads_naturally() {
        assert_eq!(Error::not_found("Account").to_string(), "Account not found");
    }
}
