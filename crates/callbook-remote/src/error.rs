use callbook_core::CredentialsError;
use callbook_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("{0}")]
    Unavailable(String),
    #[error("invalid credentials: {0}")]
    Credentials(#[from] CredentialsError),
    #[error("sign-in rejected: {0}")]
    SignIn(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[cfg(feature = "firestore")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "firestore")]
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, RemoteError>;

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Parse(err.to_string())
    }
}

impl From<RemoteError> for StoreError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Parse(message) => StoreError::Schema(message),
            other => StoreError::unavailable(crate::firestore::BACKEND_NAME, other.to_string()),
        }
    }
}
