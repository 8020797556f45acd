//! Generation client error types.

/// Failure conditions of a generation request against a model server.
///
/// The `Display` text of a kind is what ends up in a stack's Response card, so
/// it is written for the person looking at the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ClientErrorKind {
    /// Host string could not be turned into a URL
    #[display("Invalid URL: {_0}")]
    InvalidUrl(String),
    /// The HTTP client itself could not be constructed
    #[display("Failed to create HTTP client: {_0}")]
    ClientBuild(String),
    /// Transport failure (connection refused, reset, timeout)
    #[display("Network error: {_0}")]
    Network(String),
    /// Server answered with a non-2xx status
    #[display("HTTP {status_code}: {message}")]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason phrase
        message: String,
    },
    /// Body was neither a JSON object nor newline-delimited JSON fragments
    #[display("Failed to decode response: {_0}")]
    Decode(String),
}

/// Generation client error with source location tracking.
///
/// # Examples
///
/// ```
/// use promptcanvas_error::{ClientError, ClientErrorKind};
///
/// let err = ClientError::new(ClientErrorKind::HttpStatus {
///     status_code: 404,
///     message: "model 'llama9' not found".to_string(),
/// });
/// assert!(format!("{}", err).contains("404"));
/// ```
#[derive(Debug, Clone)]
pub struct ClientError {
    /// The kind of error that occurred
    pub kind: ClientErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ClientError {
    /// Create a new ClientError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ClientErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// HTTP status code, when the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match &self.kind {
            ClientErrorKind::HttpStatus { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Client Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for ClientError {}
