use thiserror::Error;

/// Failures of the fetch call itself.
#[derive(Debug, Error)]
pub enum DataSourceError {
    /// Network failure, timeout, or a non-success HTTP status.
    #[error("Request failed: {0}")]
    Request(String),

    /// The body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The provider answered with an error payload (unknown symbol, rate limit, ...).
    #[error("Provider error: {0}")]
    Provider(String),
}

impl From<reqwest::Error> for DataSourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DataSourceError::Parse(err.to_string())
        } else {
            DataSourceError::Request(err.to_string())
        }
    }
}

/// Everything that can stop a single analysis request.
/// All variants are per-request; none of them leave the service unusable.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no price bars returned for {ticker}")]
    EmptyInput { ticker: String },

    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error("moving average window must be at least one bar (got {0})")]
    InvalidWindow(usize),
}
