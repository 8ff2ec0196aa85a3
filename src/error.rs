use thiserror::Error;

/// Result type for configencryption operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the configencryption library
#[derive(Error, Debug)]
pub enum Error {
    /// No registered encryption plugin matches the configuration identifier
    #[error("Encryption plugin not found for data id: {0}")]
    PluginNotFound(String),

    /// Named filter is absent from the filter chain
    #[error("Filter not found: {0}")]
    FilterNotFound(String),

    /// Errors related to key management service operations
    #[error("KMS error: {0}")]
    Kms(String),

    /// Block engine input is not a multiple of the cipher block size
    #[error("Input length {len} is not a multiple of the cipher block size {block_size}")]
    BlockSize { len: usize, block_size: usize },

    /// Errors related to base64 or UTF-8 decoding of keys and content
    #[error("Codec error: {0}")]
    Codec(String),

    /// Invalid argument error
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Codec(format!("base64 decode: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Codec(format!("invalid UTF-8: {}", err))
    }
}
