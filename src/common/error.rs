use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid service url {value:?}: {source}")]
    InvalidServiceUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported service url scheme: {0}")]
    UnsupportedScheme(String),
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Failures talking to the rendering service. Always handled at the call
/// site that issued the request.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} responded with {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to encode {field} for {endpoint}: {source}")]
    Encode {
        endpoint: &'static str,
        field: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

/// Local input problems caught before anything is dispatched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please upload a script file")]
    MissingScript,
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ValidationError::InvalidInput(errors.to_string())
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("a render is already in flight")]
    Busy,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Error generating video")]
    Failed(#[from] ServiceError),
    #[error("render cancelled")]
    Cancelled,
    #[error("session is not active")]
    Inactive,
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("no video has been generated yet")]
    NoVideo,
    #[error("failed to write download: {0}")]
    Io(#[from] std::io::Error),
}
