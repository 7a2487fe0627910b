//! Error types for the todo API client and store.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the todo does not exist" from "the server returned an unexpected status."
//! All other non-2xx responses land in `HttpError` with the raw status code
//! and body for debugging. `Network` covers requests that never produced a
//! response at all.

/// Errors returned by `TodoClient` parse methods, transports, and the store.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404 (or 401 from older backends): the todo does
    /// not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than not-found.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request could not be delivered or the response could not be read.
    #[error("network failure: {0}")]
    Network(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// Store configuration was missing or invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}
