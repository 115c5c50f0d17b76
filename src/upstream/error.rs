use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Upstream request to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("Network request failed for {0}")]
    Transport(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}: {body}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse forecast response from {0}")]
    Parse(String, #[source] serde_json::Error),

    #[error("Forecast response from {url} contained no hourly data: {detail}")]
    EmptyForecast { url: String, detail: String },

    #[error("Invalid timestamp '{value}' in forecast response from {url}")]
    InvalidTimestamp { url: String, value: String },
}

/// The three ways an upstream call can fail. All of them lead to the same
/// synthetic fallback; the kind is kept for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamFailureKind {
    Timeout,
    Parse,
    Transport,
}

impl UpstreamError {
    pub fn kind(&self) -> UpstreamFailureKind {
        match self {
            UpstreamError::Timeout { .. } => UpstreamFailureKind::Timeout,
            UpstreamError::Transport(_, source) if source.is_timeout() => {
                UpstreamFailureKind::Timeout
            }
            UpstreamError::Transport(..) | UpstreamError::HttpStatus { .. } => {
                UpstreamFailureKind::Transport
            }
            UpstreamError::Parse(..)
            | UpstreamError::EmptyForecast { .. }
            | UpstreamError::InvalidTimestamp { .. } => UpstreamFailureKind::Parse,
        }
    }
}

impl fmt::Display for UpstreamFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpstreamFailureKind::Timeout => "timeout",
            UpstreamFailureKind::Parse => "parse",
            UpstreamFailureKind::Transport => "transport",
        };
        f.write_str(name)
    }
}
