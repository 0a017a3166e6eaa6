use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),
}
