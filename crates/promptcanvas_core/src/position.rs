//! Canvas coordinates.

use serde::{Deserialize, Serialize};

/// A point on the canvas, in canvas units.
///
/// # Examples
///
/// ```
/// use promptcanvas_core::Position;
///
/// let origin = Position::new(100.0, 40.0);
/// let moved = origin.translated(Position::new(320.0, 0.0));
/// assert_eq!(moved, Position::new(420.0, 40.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Position {
    /// Creates a position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by `offset`.
    pub fn translated(self, offset: Position) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
        }
    }
}
