// ABOUTME: Error types for GitHub deployment API calls.
// ABOUTME: Wraps transport failures and malformed deployment responses.

use crate::http::HttpError;

#[derive(Debug, thiserror::Error)]
pub enum CodeHostError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("deployment response did not include an id")]
    MissingRecordId,
}
