use thiserror::Error;

/// Anything that prevents this run from getting fresh numbers.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("stats endpoint answered with status {0}")]
    Status(u16),

    #[error("failed to parse stats payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("plugin {0} not found in stats")]
    PluginMissing(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize store artifact: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("message rejected: {0}")]
    Rejected(String),
}

/// Errors that abort a run. Everything else is logged and carried in the outcome.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("no data this run: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to persist stats: {0}")]
    Store(#[from] StoreError),
}
