//! Stack board error types.
//!
//! The lenient board operations swallow these; the `try_*` variants return them.

/// Structural lookup failures on the stack board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BoardErrorKind {
    /// No stack with the given id
    #[display("Stack not found: {_0}")]
    StackNotFound(String),
    /// Stack exists but holds no card with the given id
    #[display("Card {card} not found in stack {stack}")]
    CardNotFound {
        /// Card id
        card: String,
        /// Stack id
        stack: String,
    },
    /// Operation aimed at a card of another kind
    #[display("Card {card} is a {actual} card, not a {requested} card")]
    KindMismatch {
        /// Card id
        card: String,
        /// Kind of the card in the stack
        actual: String,
        /// Kind the operation needs, or the replacement's kind
        requested: String,
    },
    /// Reorder index outside the card sequence
    #[display("Index {index} out of range for stack of {len} cards")]
    IndexOutOfRange {
        /// Offending index
        index: usize,
        /// Number of cards in the stack
        len: usize,
    },
}

/// Board error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Board Error: {} at line {} in {}", kind, line, file)]
pub struct BoardError {
    kind: BoardErrorKind,
    line: u32,
    file: &'static str,
}

impl BoardError {
    /// Create a new board error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: BoardErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BoardErrorKind {
        &self.kind
    }

    /// True for the not-found kinds the lenient operations ignore.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            BoardErrorKind::StackNotFound(_) | BoardErrorKind::CardNotFound { .. }
        )
    }
}
