use thiserror::Error;

/// Configuration errors raised while reading environment variables.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("Missing required environment variable: {0}")]
    MissingVariable(String),
    /// An environment variable is present but cannot be parsed.
    #[error("Invalid value for {variable}: {value:?}")]
    InvalidValue {
        /// Variable name.
        variable: String,
        /// The offending raw value.
        value: String,
    },
}
