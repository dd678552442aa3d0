//! Provider error types.

use std::time::Duration;

/// Errors a route provider can report.
///
/// None of these reach the caller of the planner: the aggregator logs them
/// and treats the provider as having contributed no routes.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Provider could not be reached or refused the request
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Provider did not answer within the allotted time
    #[error("provider timed out after {0:?}")]
    Timeout(Duration),

    /// Provider answered with data we could not read
    #[error("invalid provider payload: {message}")]
    InvalidPayload { message: String },

    /// Reading local provider data failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
