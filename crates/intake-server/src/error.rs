use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use intake_core::{SubmissionKind, ValidationError};
use intake_store::error::StoreError;
use std::time::Duration;
use thiserror::Error;

use crate::response::error_body;

/// The store could not complete an upsert. Always fatal to the request.
#[derive(Debug, Error)]
pub enum StorageFailure {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
    #[error("store task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("rejected: {0}")]
    Rejected(#[from] ValidationError),
    #[error("{kind} storage failed: {source}")]
    Storage {
        kind: SubmissionKind,
        #[source]
        source: StorageFailure,
    },
}

impl IntakeError {
    pub fn status(&self) -> StatusCode {
        match self {
            IntakeError::Rejected(_) => StatusCode::BAD_REQUEST,
            IntakeError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing text. Storage details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            IntakeError::Rejected(reason) => reason.to_string(),
            IntakeError::Storage { kind, .. } => generic_failure_message(*kind).to_string(),
        }
    }
}

pub fn generic_failure_message(kind: SubmissionKind) -> &'static str {
    match kind {
        SubmissionKind::Recruitment => "An error occurred while processing your request",
        SubmissionKind::Registration => "An error occurred during registration",
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        error_body(self.status(), self.public_message())
    }
}
