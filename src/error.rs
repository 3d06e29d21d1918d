use thiserror::Error;

/// Errors raised by the harness library. Transport and service failures
/// are not errors here: they travel inside `ActionResult` so the menu can
/// report them and keep going.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Argument {index} has an error")]
    Argument { index: usize },

    #[error("Invalid service URL {0}")]
    BaseUrl(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Unable to parse response body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
