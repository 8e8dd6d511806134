//! Gateway error types.

use thiserror::Error;

/// Errors raised while setting up the HTTP collaborators.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A configured base URL cannot be used.
    #[error("Invalid {service} base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// Which collaborator the URL belongs to.
        service: &'static str,
        /// URL as configured.
        url: String,
        /// Why it was refused.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl GatewayError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidBaseUrl { .. } => "INVALID_BASE_URL",
            Self::Client(_) => "HTTP_CLIENT_ERROR",
        }
    }
}
