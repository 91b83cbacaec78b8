//! Search error types
//!
//! Errors that can occur while resolving airports or searching flights.
//! Zero results is never one of them: an empty list is a valid answer.

use thiserror::Error;

/// Errors raised by the airport resolver, the flight search executor and the
/// provider they call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Caller supplied malformed or inconsistent input (empty query, bad date,
    /// trip type and dates that do not agree)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The provider rejected the credential, or no credential is configured
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Timeout, connection failure, rate limiting or a provider 5xx
    #[error("Flight data provider unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The provider answered with something that does not match its contract
    #[error("Unexpected response from flight data provider: {0}")]
    UpstreamContractViolation(String),
}

impl SearchError {
    /// Whether the caller may try the same request again
    pub fn is_retryable(&self) -> bool {
        matches!(self, SearchError::UpstreamUnavailable(_))
    }

    /// Stable snake_case name of the error kind, used in API payloads
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::InvalidInput(_) => "invalid_input",
            SearchError::Authentication(_) => "authentication_error",
            SearchError::UpstreamUnavailable(_) => "upstream_unavailable",
            SearchError::UpstreamContractViolation(_) => "upstream_contract_violation",
        }
    }
}
