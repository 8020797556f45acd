//! Error types for the promptcanvas workspace.
//!
//! Every error records the file and line where it was raised. Generation
//! failures never escape the coordinator as `Err`; they are rendered into the
//! Response card of the stack that produced them. The types here exist for the
//! client layer, configuration loading and strict board operations.

mod board;
mod config;
mod client;

pub use board::{BoardError, BoardErrorKind};
pub use config::{ConfigError, ConfigErrorKind};
pub use client::{ClientError, ClientErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum PromptCanvasErrorKind {
    /// Generation client error
    #[display("{_0}")]
    Client(ClientError),
    /// Stack board lookup error
    #[display("{_0}")]
    Board(BoardError),
    /// Configuration error
    #[display("{_0}")]
    Config(ConfigError),
}

/// Promptcanvas error with kind discrimination.
#[derive(Debug)]
pub struct PromptCanvasError(Box<PromptCanvasErrorKind>);

impl PromptCanvasError {
    /// Create a new error from a kind.
    pub fn new(kind: PromptCanvasErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PromptCanvasErrorKind {
        &self.0
    }
}

impl std::fmt::Display for PromptCanvasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Promptcanvas Error: {}", self.0)
    }
}

impl std::error::Error for PromptCanvasError {}

impl<T> From<T> for PromptCanvasError
where
    T: Into<PromptCanvasErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for promptcanvas operations.
pub type PromptCanvasResult<T> = std::result::Result<T, PromptCanvasError>;
