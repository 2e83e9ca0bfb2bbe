use thiserror::Error;

/// Errors returned by the generation client and the fan-out.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Credentials are missing or still the placeholder value. Fatal for the
    /// whole batch and never retried.
    #[error("generation backend not configured: {0}")]
    Configuration(String),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error during {context}: {source}")]
    Http {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-2xx status.
    #[error("API returned {status} during {context}: {body}")]
    Api {
        context: String,
        status: u16,
        body: String,
    },

    /// The API answered 2xx but the body was not the expected shape.
    #[error("malformed response during {context}: {reason}")]
    MalformedResponse { context: String, reason: String },
}

impl GenerationError {
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, GenerationError::Configuration(_))
    }
}
