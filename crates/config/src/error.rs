#![forbid(unsafe_code)]

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read config: {0}")]
    Figment(#[from] figment::Error),

    #[error("missing required parameter: {0}")]
    Missing(&'static str),

    #[error("invalid {0} value: must be a positive number of minutes")]
    NotPositive(&'static str),
}
