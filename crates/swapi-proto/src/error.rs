use thiserror::Error;

/// Everything that can go wrong talking to the remote API.
///
/// Callers that show errors to the user collapse all variants into one
/// generic message; the variants exist for logging.
#[derive(Debug, Error)]
pub enum SwapiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
}
