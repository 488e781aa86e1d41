/// Errors that can occur while fetching the departure board.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The request could not be sent or the response body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// The response status code.
        status: reqwest::StatusCode,
        /// The response body, possibly empty.
        body: String,
    },

    /// The response body was not a JSON list of departures.
    #[error("unexpected response format: {0}")]
    Json(#[from] serde_json::Error),
}
