// In crates/api-client/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build the API client: {0}")]
    ClientBuildError(String),
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
    #[error("API error: code {code}, msg: {msg}")]
    ApiError { code: String, msg: String },
    #[error("Unexpected HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("Malformed chart response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for core_types::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::MalformedResponse(msg) => core_types::Error::Format(msg),
            other => core_types::Error::Provider(other.to_string()),
        }
    }
}
