//! A bunch of wrap errors.
use chordfs_core::error::Error as CoreError;

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors enum mapping global custom errors.
/// The error type can be expressed in decimal, where the high decs represent
/// the error category and the low decs represent the error type.
/// Errors raised by the ring itself keep the code of [CoreError] on the wire.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
#[repr(u32)]
pub enum Error {
    #[error("Connect remote rpc server failed: {0}.")]
    RemoteRpcError(String) = 100,
    #[error("Invalid method.")]
    InvalidMethod = 101,
    #[error("Internal rpc services error: {0}.")]
    InternalRpcError(#[from] jsonrpc_core::Error) = 102,
    #[error("Invalid address: {0}")]
    InvalidAddress(String) = 501,
    #[error("Invalid logging level: {0}")]
    InvalidLoggingLevel(String) = 502,
    #[error("Failed to bind {0}: {1}")]
    BindError(String, std::io::Error) = 600,
    #[error("Http server error: {0}")]
    HttpServerError(#[from] hyper::Error) = 601,
    #[error("Create File Error: {0}")]
    CreateFileError(String) = 900,
    #[error("Open File Error: {0}")]
    OpenFileError(String) = 901,
    #[error("Cannot find home directory")]
    HomeDirError = 903,
    #[error("Cannot find parent directory")]
    ParentDirError = 904,
    #[error("Serde json error: {0}")]
    SerdeJsonError(#[from] serde_json::Error) = 1000,
    #[error("Serde yaml error: {0}")]
    SerdeYamlError(#[from] serde_yaml::Error) = 1001,
    #[error("Core error: {0}")]
    CoreError(#[from] CoreError) = 1102,
}

impl Error {
    fn discriminant(&self) -> u32 {
        // SAFETY: Because `Self` is marked `repr(u32)`, its layout is a `repr(C)` `union`
        // between `repr(C)` structs, each of which has the `u32` discriminant as its first
        // field, so we can read the discriminant without offsetting the pointer.
        // ref: https://doc.rust-lang.org/std/mem/fn.discriminant.html
        unsafe { *<*const _>::from(self).cast::<u32>() }
    }

    pub fn code(&self) -> u32 {
        self.discriminant()
    }

    /// Code sent to the caller. Ring errors travel with their own code so the
    /// remote side can rebuild them, see [CoreError::from_remote].
    pub fn wire_code(&self) -> i64 {
        match self {
            Error::CoreError(e) => e.code(),
            e => e.code().into(),
        }
    }
}

impl From<Error> for jsonrpc_core::Error {
    fn from(e: Error) -> Self {
        let e = match e {
            Error::InternalRpcError(e) => return e,
            e => e,
        };
        Self {
            code: jsonrpc_core::ErrorCode::ServerError(e.wire_code()),
            message: e.to_string(),
            data: None,
        }
    }
}

impl From<chordfs_rpc::error::Error> for Error {
    fn from(e: chordfs_rpc::error::Error) -> Self {
        match e {
            chordfs_rpc::error::Error::InvalidMethod => Error::InvalidMethod,
            e => Error::RemoteRpcError(e.to_string()),
        }
    }
}
