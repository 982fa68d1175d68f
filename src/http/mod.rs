// ABOUTME: JSON-over-HTTP plumbing shared by both external service clients.
// ABOUTME: Re-exports the request builder, client, and transport error types.

mod client;
mod error;

pub use client::{
    ApiClient, ApiRequest, ApiResponse, DEFAULT_REQUEST_TIMEOUT, RequestBody,
};
pub use error::{HttpError, HttpErrorKind};
