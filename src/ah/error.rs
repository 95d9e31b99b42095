//! Error type for Albert Heijn API operations.

use thiserror::Error;

/// Errors raised by [`AhClient`](super::AhClient).
///
/// Authentication failures surface from construction. Everything else comes out of
/// [`AhClient::graphql`](super::AhClient::graphql) and is subject to the per-operation
/// catch policy of the catalog methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or protocol failure, including timeouts.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] wreq::Error),

    /// The server answered with a non-success status.
    #[error("Request to {url} failed with status: {status}")]
    Status { status: u16, url: String },

    /// The token endpoint answered without an `access_token`.
    #[error("No access token received")]
    MissingToken,

    /// A query was issued before authentication.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The response carried a non-empty `errors` array.
    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    /// The response body was not the expected JSON.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}
