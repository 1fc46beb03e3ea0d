use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("no stable release found in the Go release feed")]
    NoStableRelease,

    #[error("Invalid Go version {0:?}")]
    InvalidVersion(String),
}
