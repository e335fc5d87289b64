use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The start date: '{start_date}' is greater than the end date: '{end_date}'")]
    StartDateAfterEndDate {
        start_date: String,
        end_date: String,
    },

    #[error("Field '{field}' does not match schema: expected {expected}, got {got}")]
    SchemaMismatch {
        field: String,
        expected: &'static str,
        got: String,
    },

    #[error("Field '{field}' is not part of the pipeline schema")]
    UnknownField { field: String },

    #[error("API responded with error: {0}")]
    ApiFailure(#[from] reqwest::Error),

    #[error("Failed to parse URL: {0}")]
    UrlParsingFailed(#[from] url::ParseError),

    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("{message}")]
    NoData { message: String },
}
