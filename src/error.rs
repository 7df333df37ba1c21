// error.rs - Error Types
// Errors raised while loading configuration and while talking to the video API.

use thiserror::Error;

/// Startup configuration problems. Any of these stops the bot before it connects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set in the environment or botconfig.txt")]
    Missing(&'static str),

    #[error("{0} is still set to its placeholder value")]
    Placeholder(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Failures of a single remote call to the video API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} endpoint returned HTTP {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// True when the API answered but reported an error status (quota, bad key, ...).
    pub fn is_status(&self) -> bool {
        matches!(self, FetchError::Status { .. })
    }
}
