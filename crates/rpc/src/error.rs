/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors enum mapping global custom errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Invalid method.")]
    InvalidMethod,
    #[error("Failed to build http client: {0}")]
    HttpClient(String),
}
