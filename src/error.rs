use thiserror::Error;

#[derive(Error, Debug)]
pub enum CircleStatsError {
    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A build the API flags as failed contains no action matching the
    /// failure predicate. Carries the decoded step list for diagnostics.
    #[error("no failing action found in build {build_num}")]
    NoFailingAction {
        build_num: u64,
        steps: serde_json::Value,
    },
}

pub type Result<T> = std::result::Result<T, CircleStatsError>;
