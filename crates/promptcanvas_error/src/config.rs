//! Configuration error types.

/// What went wrong while loading coordinator or client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// Configuration file could not be read
    #[display("Failed to read config file: {_0}")]
    FileRead(String),
    /// Configuration file is not valid TOML for the expected shape
    #[display("Failed to parse config: {_0}")]
    Parse(String),
    /// An environment variable held a value of the wrong shape
    #[display("Invalid value for {name}: {value}")]
    InvalidEnv {
        /// Variable name
        name: String,
        /// Raw value found in the environment
        value: String,
    },
}

/// Configuration error with location tracking.
///
/// # Examples
///
/// ```
/// use promptcanvas_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::Parse("expected a table".into()));
/// assert!(format!("{}", err).contains("expected a table"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    kind: ConfigErrorKind,
    line: u32,
    file: &'static str,
}

impl ConfigError {
    /// Create a new configuration error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ConfigErrorKind {
        &self.kind
    }
}
