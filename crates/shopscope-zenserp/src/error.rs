use thiserror::Error;

/// Errors returned by the Zenserp API client.
#[derive(Debug, Error)]
pub enum ZenserpError {
    /// No API key was configured. Surfaced at construction time, before any
    /// request is sent.
    #[error("API key is missing")]
    MissingApiKey,

    /// The configured base URL could not be parsed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Zenserp answered with a non-2xx status. `body` carries the upstream
    /// payload, parsed as JSON when possible and wrapped as a raw string
    /// otherwise, so callers can relay it verbatim.
    #[error("Zenserp API error: HTTP {status}")]
    Status {
        status: u16,
        body: serde_json::Value,
    },

    /// A 2xx response whose body could not be parsed as JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
